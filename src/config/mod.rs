//! Configuration module for pricecast.
//!
//! This module provides structured configuration loading from environment variables,
//! organized by concern: Server, Storage, Training, and Observability.

mod observability_config;
mod server_config;
mod storage_config;
mod training_config;

pub use observability_config::ObservabilityEnvConfig;
pub use server_config::ServerEnvConfig;
pub use storage_config::{DEFAULT_MODEL_PATH, DEFAULT_UPLOAD_DIR, StorageEnvConfig};
pub use training_config::TrainingEnvConfig;

use anyhow::{Context, Result};

/// Main application configuration.
///
/// Passed into each component at construction; nothing reads the environment
/// after startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub server: ServerEnvConfig,
    pub storage: StorageEnvConfig,
    pub training: TrainingEnvConfig,
    pub observability: ObservabilityEnvConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            server: ServerEnvConfig::from_env().context("Failed to load server config")?,
            storage: StorageEnvConfig::from_env(),
            training: TrainingEnvConfig::from_env().context("Failed to load training config")?,
            observability: ObservabilityEnvConfig::from_env(),
        })
    }
}
