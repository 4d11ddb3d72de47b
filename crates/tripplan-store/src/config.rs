use std::path::{Path, PathBuf};

/// Plan store configuration.
///
/// The path is resolved by the caller; `TRIPPLAN_STORE_PATH` names the
/// environment override and `<data dir>/tripplan/store.json` the default.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path of the JSON file backing the key-value store.
    pub store_path: PathBuf,
}

impl StoreConfig {
    /// Environment variable that overrides the store path.
    pub const ENV_VAR: &str = "TRIPPLAN_STORE_PATH";

    /// File name used inside the data directory.
    pub const FILE_NAME: &str = "store.json";

    /// Build a config from an explicit path (useful for tests and CLI flags).
    pub fn new(store_path: impl Into<PathBuf>) -> Self {
        Self {
            store_path: store_path.into(),
        }
    }

    /// The per-user default location of the store file.
    ///
    /// Uses the platform data directory, or the current directory when no
    /// home directory can be determined.
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tripplan")
            .join(Self::FILE_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.store_path
    }
}
