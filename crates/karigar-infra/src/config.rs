//! Configuration loading.
//!
//! `AppConfig` lives in karigar-types; this module locates and reads the
//! file. A missing `karigar.toml` is not an error -- defaults apply.

use std::path::{Path, PathBuf};

use anyhow::Context;
use karigar_types::config::AppConfig;

const CONFIG_FILE: &str = "karigar.toml";

/// The data directory: `$KARIGAR_DATA_DIR`, falling back to `~/.karigar`.
pub fn default_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("KARIGAR_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".karigar")
}

/// Load `{data_dir}/karigar.toml`, defaulting when the file is absent.
pub async fn load_config(data_dir: &Path) -> anyhow::Result<AppConfig> {
    let path = data_dir.join(CONFIG_FILE);
    let contents = match tokio::fs::read_to_string(&path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(AppConfig::default()),
        Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
    };
    toml::from_str(&contents).with_context(|| format!("parsing {}", path.display()))
}
