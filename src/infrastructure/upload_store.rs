use crate::domain::errors::UploadError;
use std::path::{Path, PathBuf};
use tracing::info;

/// Stores uploaded datasets in a fixed directory under their base file name.
///
/// An upload with the same name as an earlier one replaces it.
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolves the destination path for an uploaded file name, keeping only
    /// its final component.
    pub fn target_path(&self, file_name: &str) -> Result<PathBuf, UploadError> {
        let base = Path::new(file_name)
            .file_name()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| UploadError::InvalidName {
                name: file_name.to_string(),
            })?;
        Ok(self.dir.join(base))
    }

    pub async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, UploadError> {
        let path = self.target_path(file_name)?;
        let io_err = |e: std::io::Error| UploadError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        };

        tokio::fs::create_dir_all(&self.dir).await.map_err(io_err)?;
        tokio::fs::write(&path, bytes).await.map_err(io_err)?;

        info!(bytes = bytes.len(), "Stored upload at {:?}", path);
        Ok(path)
    }
}
