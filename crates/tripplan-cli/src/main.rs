mod config;
mod generate_cmd;
mod plan_cmds;
mod render;
mod serve_cmd;
#[cfg(test)]
mod test_util;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use tripplan_store::{FileStore, PlanStore};

use config::{CliOverrides, TripplanConfig};
use generate_cmd::GenerateArgs;

#[derive(Parser)]
#[command(name = "tripplan", about = "AI-assisted outing and trip itinerary planner")]
struct Cli {
    /// Plan store file (overrides TRIPPLAN_STORE_PATH env var)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Base URL share links point at (overrides TRIPPLAN_BASE_URL env var)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Language model to generate with (overrides TRIPPLAN_MODEL env var)
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a tripplan config file
    Init {
        /// OpenAI API key to store in the config file
        #[arg(long)]
        api_key: Option<String>,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Generate an outing (--date) or a multi-day trip (--start-date/--end-date)
    Generate(GenerateArgs),
    /// Saved plan management
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Serve the generation endpoint and shared plan pages over HTTP
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
        /// Port to listen on
        #[arg(long, default_value_t = 3000)]
        port: u16,
    },
}

#[derive(Subcommand)]
pub enum PlanCommands {
    /// Show a saved plan
    Show {
        /// Plan ID to show
        plan_id: String,
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// List share URLs of all saved plans
    List,
    /// Apply an edit command to a saved plan and save the result
    Edit {
        /// Plan ID to edit
        plan_id: String,
        /// Edit as JSON, e.g. '{"op":"move_day_up","index":1}'
        edit: String,
    },
}

/// Show only the ends of a secret.
fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

/// Execute the `tripplan init` command: write config file.
fn cmd_init(api_key: Option<String>, cli: &CliOverrides, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        generation: config::GenerationSection {
            api_key: api_key.clone(),
            model: cli.model.clone(),
            ..config::GenerationSection::default()
        },
        store: config::StoreSection {
            path: cli.store.clone(),
        },
        share: config::ShareSection {
            base_url: cli.base_url.clone(),
        },
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    match api_key.as_deref() {
        Some(key) => println!("  generation.api_key = {}", mask(key)),
        None => println!("  generation.api_key not set (falls back to {})", config::API_KEY_ENV),
    }
    if let Some(model) = &cfg.generation.model {
        println!("  generation.model = {model}");
    }
    if let Some(store) = &cfg.store.path {
        println!("  store.path = {}", store.display());
    }
    if let Some(base_url) = &cfg.share.base_url {
        println!("  share.base_url = {base_url}");
    }
    println!();
    println!("Next: run `tripplan generate --date <YYYY-MM-DD> --area <area>`.");

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let overrides = CliOverrides {
        model: cli.model,
        store: cli.store,
        base_url: cli.base_url,
    };

    match cli.command {
        Commands::Init { api_key, force } => {
            cmd_init(api_key, &overrides, force)?;
        }
        Commands::Generate(args) => {
            let resolved = TripplanConfig::resolve(&overrides)?;
            generate_cmd::run_generate(args, &resolved).await?;
        }
        Commands::Plan { command } => {
            let resolved = TripplanConfig::resolve(&overrides)?;
            let mut store = PlanStore::new(FileStore::open(resolved.store_config.path()));
            plan_cmds::run_plan_command(command, &mut store, &resolved.share_base_url)?;
        }
        Commands::Serve { bind, port } => {
            let resolved = TripplanConfig::resolve(&overrides)?;
            let state = serve_cmd::AppState::new(
                resolved.generator()?,
                PlanStore::new(FileStore::open(resolved.store_config.path())),
                resolved.share_base_url.clone(),
            );
            serve_cmd::run_serve(state, &bind, port).await?;
        }
    }

    Ok(())
}
