//! Service settings loaded from `settings.json`.

use std::fs;
use std::io;
use std::path::Path;

use log::{debug, info};
use overlay::ServiceConfig;
use thiserror::Error;

/// Settings error type.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] io::Error),
    #[error("invalid settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Parse a settings document. Missing keys keep their defaults.
pub fn parse(json: &str) -> Result<ServiceConfig, SettingsError> {
    Ok(serde_json::from_str(json)?)
}

/// Load settings from `path`, falling back to defaults when the file does
/// not exist.
pub fn load(path: &Path) -> Result<ServiceConfig, SettingsError> {
    match fs::read_to_string(path) {
        Ok(json) => {
            let config = parse(&json)?;
            info!("[settings] loaded {}", path.display());
            Ok(config)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("[settings] {} not found, using defaults", path.display());
            Ok(ServiceConfig::default())
        }
        Err(e) => Err(e.into()),
    }
}
