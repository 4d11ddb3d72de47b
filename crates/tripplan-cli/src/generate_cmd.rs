//! `tripplan generate` -- request a plan and optionally save it.
//!
//! Generation runs in-process against the configured responder, or against
//! a running `tripplan serve` when `--endpoint` is given.

use std::sync::Arc;

use anyhow::{Result, bail};
use clap::Args;

use tripplan_core::plan::{
    Criteria, GenerationClient, GenerationRequest, HttpTransport, LocalTransport, Transport,
};
use tripplan_core::session::PlannerSession;
use tripplan_store::{FileStore, PlanStore};

use crate::config::TripplanConfig;
use crate::render;

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Date of a single-day outing (YYYY-MM-DD)
    #[arg(long, conflicts_with_all = ["start_date", "end_date", "transportation"])]
    pub date: Option<String>,
    /// First day of a multi-day trip
    #[arg(long)]
    pub start_date: Option<String>,
    /// Last day of a multi-day trip
    #[arg(long)]
    pub end_date: Option<String>,
    /// How the trip is travelled (e.g. train, car)
    #[arg(long)]
    pub transportation: Option<String>,
    /// Area to plan around
    #[arg(long)]
    pub area: Option<String>,
    /// Interest to favour (repeatable)
    #[arg(long = "interest")]
    pub interests: Vec<String>,
    /// Per-person budget in yen
    #[arg(long)]
    pub budget: Option<String>,
    /// Base URL of a running tripplan server to generate through
    #[arg(long)]
    pub endpoint: Option<String>,
    /// Save the generated plan and print its share URL
    #[arg(long)]
    pub save: bool,
    /// Print the plan as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

impl GenerateArgs {
    /// Criteria as the endpoint would see them.
    pub fn criteria(&self) -> Criteria {
        Criteria::from_request(GenerationRequest {
            date: self.date.clone(),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            area: self.area.clone(),
            transportation: self.transportation.clone(),
            interests: self.interests.clone(),
            budget: self.budget.clone(),
        })
    }
}

pub async fn run_generate(args: GenerateArgs, config: &TripplanConfig) -> Result<()> {
    let transport: Arc<dyn Transport> = match args.endpoint.as_deref() {
        Some(endpoint) => Arc::new(HttpTransport::new(endpoint)),
        None => Arc::new(LocalTransport::new(config.generator()?)),
    };

    let session = PlannerSession::new(
        GenerationClient::new(transport),
        PlanStore::new(FileStore::open(config.store_config.path())),
        config.share_base_url.as_str(),
    );

    let criteria = args.criteria();
    eprintln!("Generating {} plan for {}...", criteria.plan_kind(), criteria.area());

    if !session.generate(&criteria).await {
        let message = session
            .message()
            .unwrap_or_else(|| "plan generation failed".to_string());
        bail!("{message}");
    }

    let Some(plan) = session.plan() else {
        bail!("plan generation produced no plan");
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print!("{}", render::plan_text(&plan));
    }

    if args.save {
        match session.save() {
            Some(url) => {
                println!();
                println!("Saved: {url}");
            }
            None => {
                let message = session
                    .message()
                    .unwrap_or_else(|| "failed to save plan".to_string());
                bail!("{message}");
            }
        }
    }

    Ok(())
}
