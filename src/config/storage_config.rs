//! Storage configuration parsing from environment variables.
//!
//! Fixed locations of the model artifact and the upload directory.

use std::env;
use std::path::PathBuf;

pub const DEFAULT_MODEL_PATH: &str = "models/price-model.json";
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";

/// Storage environment configuration
#[derive(Debug, Clone, PartialEq)]
pub struct StorageEnvConfig {
    pub model_path: PathBuf,
    pub upload_dir: PathBuf,
}

impl Default for StorageEnvConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
        }
    }
}

impl StorageEnvConfig {
    pub fn from_env() -> Self {
        Self {
            model_path: env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_MODEL_PATH)),
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_UPLOAD_DIR)),
        }
    }
}
