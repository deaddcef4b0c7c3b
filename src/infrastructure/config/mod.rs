// ============================================================
// APP CONFIG
// ============================================================
// Server settings: defaults -> data-cleaner.toml -> DATA_CLEANER_* env

use std::path::PathBuf;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::domain::error::{AppError, Result};

pub const CONFIG_FILE: &str = "data-cleaner.toml";
pub const ENV_PREFIX: &str = "DATA_CLEANER_";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Where raw uploads are staged
    pub uploads_dir: PathBuf,
    /// Where cleaned files are written for download
    pub outputs_dir: PathBuf,
    pub max_upload_bytes: usize,
    /// Fallback tracing filter when RUST_LOG is unset
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            uploads_dir: PathBuf::from("uploads"),
            outputs_dir: PathBuf::from("outputs"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load `.env`, then layer the config file and environment over defaults
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_figment(Self::figment())
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: AppConfig = figment
            .extract()
            .map_err(|e| AppError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(AppError::ConfigError("port must be non-zero".to_string()));
        }
        if self.max_upload_bytes == 0 {
            return Err(AppError::ConfigError(
                "max_upload_bytes must be greater than zero".to_string(),
            ));
        }
        if self.uploads_dir == self.outputs_dir {
            return Err(AppError::ConfigError(format!(
                "uploads_dir and outputs_dir must differ (both are {})",
                self.uploads_dir.display()
            )));
        }
        Ok(())
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}
