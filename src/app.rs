use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::application::CleaningPipeline;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::storage::StagingArea;
use crate::interfaces::http::start_server;

/// Load config, prepare staging directories, and serve until shutdown
pub async fn run() -> std::io::Result<()> {
    let config = AppConfig::load().map_err(|e| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    init_tracing(&config.log_filter);

    let staging = StagingArea::from_config(&config);
    staging.ensure_dirs().map_err(|err| {
        error!(
            error = %err,
            uploads_dir = %config.uploads_dir.display(),
            outputs_dir = %config.outputs_dir.display(),
            "Failed to create staging dirs"
        );
        std::io::Error::other(err.to_string())
    })?;

    info!(
        max_upload_bytes = config.max_upload_bytes,
        "Starting data cleaner"
    );
    start_server(&config, CleaningPipeline::new(), staging)?.await
}

fn init_tracing(fallback: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
