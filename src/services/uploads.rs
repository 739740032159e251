//! Cover image storage.
//!
//! Files are opaque blobs keyed by a generated name (`{uuid}_{original}`);
//! the catalog only ever stores that name.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::{
    config::UploadsConfig,
    error::{AppError, AppResult},
};

#[derive(Clone)]
pub struct UploadsService {
    dir: PathBuf,
    allowed_extensions: Vec<String>,
}

impl UploadsService {
    pub fn new(config: &UploadsConfig) -> Self {
        Self {
            dir: PathBuf::from(&config.dir),
            allowed_extensions: config
                .allowed_extensions
                .iter()
                .map(|ext| ext.to_lowercase())
                .collect(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Whether `filename` carries one of the allowed extensions
    pub fn is_allowed(&self, filename: &str) -> bool {
        filename
            .rsplit_once('.')
            .map(|(_, ext)| self.allowed_extensions.contains(&ext.to_lowercase()))
            .unwrap_or(false)
    }

    /// Store `data` under a freshly generated name and return that name
    pub async fn store(&self, original_name: &str, data: &[u8]) -> AppResult<String> {
        // Only the final path component of the client-supplied name is kept
        let original = Path::new(original_name)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();

        if original.is_empty() {
            return Err(AppError::Validation("No selected file".to_string()));
        }
        if !self.is_allowed(original) {
            tracing::info!("Rejected upload {}", original);
            return Err(AppError::Validation(format!(
                "Invalid file type. Allowed: {}.",
                self.allowed_extensions.join(", ")
            )));
        }

        let stored = format!("{}_{}", Uuid::new_v4().simple(), original);

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to create upload directory: {}", e)))?;
        tokio::fs::write(self.dir.join(&stored), data)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to store upload: {}", e)))?;

        tracing::info!("Stored upload {}", stored);
        Ok(stored)
    }
}
