// src/config/options.rs
use std::path::PathBuf;

use super::consts::*;

/// Run-wide settings. Everything per-row lives in the configuration table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunOptions {
    pub config_path: PathBuf,
    pub api_url: String,
    pub timeout_secs: u64,
    /// Log a failed fetch and move on instead of aborting the run.
    pub skip_failed_rows: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            api_url: s!(DEFAULT_API_URL),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            skip_failed_rows: false,
        }
    }
}

impl RunOptions {
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self { config_path: config_path.into(), ..Self::default() }
    }
}
