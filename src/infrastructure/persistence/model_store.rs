//! Filesystem persistence for the model artifact.
//!
//! The artifact is stored as JSON at a single fixed path. Writes go to a
//! sibling `.tmp` file and are renamed over the target, so a concurrent reader
//! sees either the previous or the new artifact.

use crate::domain::errors::{ModelLoadError, ModelSaveError};
use crate::domain::ml::ModelArtifact;
use crate::domain::ports::ModelStore;
use std::fs;
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub struct FsModelStore {
    file_path: PathBuf,
}

impl FsModelStore {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    fn display_path(&self) -> String {
        self.file_path.display().to_string()
    }
}

impl ModelStore for FsModelStore {
    fn load(&self) -> Result<ModelArtifact, ModelLoadError> {
        let file = fs::File::open(&self.file_path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ModelLoadError::NotFound {
                path: self.display_path(),
            },
            _ => ModelLoadError::Io {
                path: self.display_path(),
                reason: e.to_string(),
            },
        })?;

        let artifact: ModelArtifact =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| ModelLoadError::Corrupt {
                path: self.display_path(),
                reason: e.to_string(),
            })?;

        debug!(
            generation = artifact.generation,
            features = artifact.feature_count(),
            "Loaded model artifact from {:?}",
            self.file_path
        );
        Ok(artifact)
    }

    fn save(&self, artifact: &ModelArtifact) -> Result<(), ModelSaveError> {
        let content = serde_json::to_vec(artifact).map_err(|e| ModelSaveError::Serialize {
            reason: e.to_string(),
        })?;

        let io_err = |e: std::io::Error| ModelSaveError::Io {
            path: self.display_path(),
            reason: e.to_string(),
        };

        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let temp_path = self.file_path.with_extension("tmp");
        fs::write(&temp_path, content).map_err(io_err)?;
        fs::rename(&temp_path, &self.file_path).map_err(io_err)?;

        info!(
            generation = artifact.generation,
            "Saved model artifact to {:?}", self.file_path
        );
        Ok(())
    }

    fn location(&self) -> &Path {
        &self.file_path
    }
}
