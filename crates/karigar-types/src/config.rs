//! Global configuration types for Karigar.
//!
//! `AppConfig` represents the top-level `karigar.toml`. All fields have
//! sensible defaults so an empty (or absent) file is a valid configuration.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the Karigar core.
///
/// Loaded from `~/.karigar/karigar.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Override for the data directory (defaults to `~/.karigar`).
    #[serde(default)]
    pub data_dir: Option<String>,

    /// Override for the SQLite database URL.
    #[serde(default)]
    pub database_url: Option<String>,

    /// How often an open conversation re-reads its thread, in seconds.
    #[serde(default = "default_chat_poll_interval_secs")]
    pub chat_poll_interval_secs: u64,
}

fn default_chat_poll_interval_secs() -> u64 {
    2
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            database_url: None,
            chat_poll_interval_secs: default_chat_poll_interval_secs(),
        }
    }
}
