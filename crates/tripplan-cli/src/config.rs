//! Configuration file management for tripplan.
//!
//! Provides a TOML-based config file at `~/.config/tripplan/config.toml` and
//! a resolution chain: CLI flag > env var > config file > default.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use tripplan_core::plan::{DEFAULT_MODEL, DEFAULT_TEMPERATURE, GenerationSettings, PlanGenerator};
use tripplan_core::responder::{DEFAULT_BASE_URL, OpenAiResponder};
use tripplan_store::StoreConfig;

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const MODEL_ENV: &str = "TRIPPLAN_MODEL";
pub const OPENAI_BASE_URL_ENV: &str = "TRIPPLAN_OPENAI_BASE_URL";
pub const SHARE_BASE_URL_ENV: &str = "TRIPPLAN_BASE_URL";

/// Share links point here unless configured otherwise.
pub const DEFAULT_SHARE_BASE_URL: &str = "http://localhost:3000";

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub generation: GenerationSection,
    #[serde(default)]
    pub store: StoreSection,
    #[serde(default)]
    pub share: ShareSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GenerationSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// API root of the OpenAI-compatible service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StoreSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ShareSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the tripplan config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/tripplan` or
/// `~/.config/tripplan`, also on macOS.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("tripplan");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("tripplan")
}

/// Return the path to the tripplan config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    let path = config_path();
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

/// Serialize and write the config file, creating parent dirs as needed.
/// Sets file permissions to 0600 on Unix (the file may hold an API key).
pub fn save_config(config: &ConfigFile) -> Result<()> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Values given on the command line, each overriding everything else.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub model: Option<String>,
    pub store: Option<PathBuf>,
    pub base_url: Option<String>,
}

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct TripplanConfig {
    /// Only needed for in-process generation and `serve`.
    pub api_key: Option<String>,
    pub openai_base_url: String,
    pub settings: GenerationSettings,
    pub store_config: StoreConfig,
    pub share_base_url: String,
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl TripplanConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - API key: `OPENAI_API_KEY` > `generation.api_key`
    /// - Model: `--model` > `TRIPPLAN_MODEL` > `generation.model` > `gpt-4o-mini`
    /// - OpenAI base URL: `TRIPPLAN_OPENAI_BASE_URL` > `generation.base_url` > `https://api.openai.com`
    /// - Temperature: `generation.temperature` > `0.1`
    /// - Store path: `--store` > `TRIPPLAN_STORE_PATH` > `store.path` > data dir
    /// - Share base URL: `--base-url` > `TRIPPLAN_BASE_URL` > `share.base_url` > `http://localhost:3000`
    pub fn resolve(cli: &CliOverrides) -> Result<Self> {
        let file = match load_config() {
            Ok(cfg) => cfg,
            Err(e) if config_path().exists() => return Err(e),
            Err(_) => ConfigFile::default(),
        };

        let api_key = env_var(API_KEY_ENV).or(file.generation.api_key);

        let model = cli
            .model
            .clone()
            .or_else(|| env_var(MODEL_ENV))
            .or(file.generation.model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let openai_base_url = env_var(OPENAI_BASE_URL_ENV)
            .or(file.generation.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let temperature = file.generation.temperature.unwrap_or(DEFAULT_TEMPERATURE);

        let store_path = cli
            .store
            .clone()
            .or_else(|| env_var(StoreConfig::ENV_VAR).map(PathBuf::from))
            .or(file.store.path)
            .unwrap_or_else(StoreConfig::default_path);

        let share_base_url = cli
            .base_url
            .clone()
            .or_else(|| env_var(SHARE_BASE_URL_ENV))
            .or(file.share.base_url)
            .unwrap_or_else(|| DEFAULT_SHARE_BASE_URL.to_string());

        Ok(Self {
            api_key,
            openai_base_url,
            settings: GenerationSettings { model, temperature },
            store_config: StoreConfig::new(store_path),
            share_base_url,
        })
    }

    /// Build the in-process generator. Requires an API key.
    pub fn generator(&self) -> Result<Arc<PlanGenerator>> {
        let Some(api_key) = self.api_key.as_deref() else {
            bail!(
                "OpenAI API key not found; set {API_KEY_ENV} or run `tripplan init --api-key <key>`"
            );
        };
        let responder = OpenAiResponder::with_base_url(api_key, self.openai_base_url.as_str());
        Ok(Arc::new(PlanGenerator::new(
            Arc::new(responder),
            self.settings.clone(),
        )))
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    use crate::test_util::{EnvSnapshot, lock_env};

    const VARS: &[&str] = &[
        "XDG_CONFIG_HOME",
        API_KEY_ENV,
        MODEL_ENV,
        OPENAI_BASE_URL_ENV,
        SHARE_BASE_URL_ENV,
        StoreConfig::ENV_VAR,
    ];

    /// Point the config dir at an empty temp dir and clear every tripplan
    /// variable.
    fn isolated_env() -> (tempfile::TempDir, EnvSnapshot) {
        let tmp = tempfile::TempDir::new().unwrap();
        let snapshot = EnvSnapshot::take(VARS);
        for var in VARS {
            unsafe { std::env::remove_var(var) };
        }
        unsafe { std::env::set_var("XDG_CONFIG_HOME", tmp.path()) };
        (tmp, snapshot)
    }

    #[test]
    fn defaults_when_nothing_set() {
        let _lock = lock_env();
        let (_tmp, _env) = isolated_env();

        let config = TripplanConfig::resolve(&CliOverrides::default()).unwrap();
        assert_eq!(config.api_key, None);
        assert_eq!(config.settings.model, "gpt-4o-mini");
        assert!((config.settings.temperature - 0.1).abs() < f32::EPSILON);
        assert_eq!(config.openai_base_url, "https://api.openai.com");
        assert_eq!(config.share_base_url, "http://localhost:3000");
        assert_eq!(config.store_config.path(), StoreConfig::default_path());
    }

    #[test]
    fn config_file_values_used() {
        let _lock = lock_env();
        let (_tmp, _env) = isolated_env();

        let file = ConfigFile {
            generation: GenerationSection {
                api_key: Some("sk-file".to_string()),
                model: Some("gpt-4o".to_string()),
                base_url: None,
                temperature: Some(0.3),
            },
            store: StoreSection {
                path: Some(PathBuf::from("/tmp/tripplan-file.json")),
            },
            share: ShareSection {
                base_url: Some("https://trips.example.com".to_string()),
            },
        };
        save_config(&file).unwrap();

        let config = TripplanConfig::resolve(&CliOverrides::default()).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-file"));
        assert_eq!(config.settings.model, "gpt-4o");
        assert!((config.settings.temperature - 0.3).abs() < f32::EPSILON);
        assert_eq!(config.store_config.path(), PathBuf::from("/tmp/tripplan-file.json"));
        assert_eq!(config.share_base_url, "https://trips.example.com");
    }

    #[test]
    fn env_overrides_file_and_cli_overrides_env() {
        let _lock = lock_env();
        let (_tmp, _env) = isolated_env();

        let file = ConfigFile {
            generation: GenerationSection {
                api_key: Some("sk-file".to_string()),
                model: Some("gpt-4o".to_string()),
                ..GenerationSection::default()
            },
            ..ConfigFile::default()
        };
        save_config(&file).unwrap();

        unsafe { std::env::set_var(API_KEY_ENV, "sk-env") };
        unsafe { std::env::set_var(MODEL_ENV, "gpt-env") };
        unsafe { std::env::set_var(SHARE_BASE_URL_ENV, "http://env:3000") };

        let config = TripplanConfig::resolve(&CliOverrides::default()).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-env"));
        assert_eq!(config.settings.model, "gpt-env");
        assert_eq!(config.share_base_url, "http://env:3000");

        let cli = CliOverrides {
            model: Some("gpt-cli".to_string()),
            store: Some(PathBuf::from("/tmp/cli.json")),
            base_url: Some("http://cli:8080".to_string()),
        };
        let config = TripplanConfig::resolve(&cli).unwrap();
        assert_eq!(config.settings.model, "gpt-cli");
        assert_eq!(config.store_config.path(), PathBuf::from("/tmp/cli.json"));
        assert_eq!(config.share_base_url, "http://cli:8080");
    }

    #[test]
    fn malformed_config_file_is_an_error() {
        let _lock = lock_env();
        let (tmp, _env) = isolated_env();

        let dir = tmp.path().join("tripplan");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.toml"), "generation = 3").unwrap();

        let err = TripplanConfig::resolve(&CliOverrides::default()).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse config file"));
    }

    #[test]
    fn generator_requires_api_key() {
        let _lock = lock_env();
        let (_tmp, _env) = isolated_env();

        let config = TripplanConfig::resolve(&CliOverrides::default()).unwrap();
        let err = config.generator().unwrap_err();
        assert!(err.to_string().contains("OpenAI API key not found"));
    }

    #[cfg(unix)]
    #[test]
    fn save_config_sets_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let _lock = lock_env();
        let (_tmp, _env) = isolated_env();

        save_config(&ConfigFile::default()).unwrap();
        let meta = std::fs::metadata(config_path()).unwrap();
        assert_eq!(meta.permissions().mode() & 0o777, 0o600);
    }

    #[test]
    fn config_path_ends_with_expected_filename() {
        let path = config_path();
        assert!(
            path.ends_with("tripplan/config.toml"),
            "unexpected config path: {}",
            path.display()
        );
    }
}
