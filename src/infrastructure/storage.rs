// ============================================================
// STAGING AREA
// ============================================================
// On-disk uploads and cleaned outputs for the HTTP surface

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;

use crate::domain::error::{AppError, Result};
use crate::infrastructure::config::AppConfig;

const OUTPUT_PREFIX: &str = "cleaned_";

#[derive(Debug, Clone)]
pub struct StagingArea {
    uploads_dir: PathBuf,
    outputs_dir: PathBuf,
}

impl StagingArea {
    pub fn new(uploads_dir: impl Into<PathBuf>, outputs_dir: impl Into<PathBuf>) -> Self {
        Self {
            uploads_dir: uploads_dir.into(),
            outputs_dir: outputs_dir.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.uploads_dir, &config.outputs_dir)
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    pub fn outputs_dir(&self) -> &Path {
        &self.outputs_dir
    }

    /// Create both directories if missing
    pub fn ensure_dirs(&self) -> Result<()> {
        ensure_dir(&self.uploads_dir)?;
        ensure_dir(&self.outputs_dir)?;
        Ok(())
    }

    /// Persist a raw upload as `{uuid}_{safe_name}`
    pub fn save_upload(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self
            .uploads_dir
            .join(format!("{}_{}", Uuid::new_v4(), sanitize_filename(filename)));
        fs::write(&path, bytes)?;
        debug!(path = %path.display(), bytes = bytes.len(), "Staged upload");
        Ok(path)
    }

    /// Persist cleaned bytes and return the name to download them by
    pub fn save_output(&self, output_filename: &str, bytes: &[u8]) -> Result<String> {
        let name = format!(
            "{}{}_{}",
            OUTPUT_PREFIX,
            Uuid::new_v4(),
            sanitize_filename(output_filename)
        );
        let path = self.outputs_dir.join(&name);
        fs::write(&path, bytes)?;
        debug!(path = %path.display(), bytes = bytes.len(), "Stored cleaned output");
        Ok(name)
    }

    /// Read a stored output by bare name; anything path-like is refused
    pub fn read_output(&self, name: &str) -> Result<Vec<u8>> {
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(AppError::ValidationError(format!(
                "Invalid file name: {}",
                name
            )));
        }

        let path = self.outputs_dir.join(name);
        if !path.is_file() {
            return Err(AppError::NotFound(format!("File not found: {}", name)));
        }
        Ok(fs::read(path)?)
    }
}

/// Drop any directory part and replace spaces with underscores
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    if base.is_empty() || base == "." || base == ".." {
        return "upload".to_string();
    }
    base.replace(' ', "_")
}

fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
