use std::path::PathBuf;

use anyhow::Context;
use qms_config::QmsConfig;

use crate::cli::GlobalFlags;

/// Load `.env` (if any) and the layered config from the current directory.
pub fn load_config() -> anyhow::Result<QmsConfig> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded dotenv file"),
        Err(error) if error.not_found() => {}
        Err(error) => return Err(error).context("failed to load .env"),
    }
    QmsConfig::load().context("failed to load qms configuration")
}

/// `--data-dir` wins over `general.data_dir`.
pub fn resolve_data_dir(flags: &GlobalFlags, config: &QmsConfig) -> PathBuf {
    flags
        .data_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.general.data_dir))
}
