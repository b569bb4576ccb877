//! Training and inference configuration parsing from environment variables.

use crate::application::ml::training_pipeline::{
    DEFAULT_SPLIT_SEED, DEFAULT_TEST_FRACTION, FitSettings,
};
use crate::domain::ml::SolverKind;
use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

/// Training environment configuration
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingEnvConfig {
    pub split_seed: u64,
    pub test_fraction: f64,
    /// Solver for freshly bootstrapped models; retrains reuse the base model's
    pub solver: SolverKind,
    /// Standardize prediction inputs with the stored scaler (off by default)
    pub scale_prediction_input: bool,
}

impl Default for TrainingEnvConfig {
    fn default() -> Self {
        Self {
            split_seed: DEFAULT_SPLIT_SEED,
            test_fraction: DEFAULT_TEST_FRACTION,
            solver: SolverKind::default(),
            scale_prediction_input: false,
        }
    }
}

impl TrainingEnvConfig {
    pub fn from_env() -> Result<Self> {
        let split_seed = env::var("SPLIT_SEED")
            .unwrap_or_else(|_| DEFAULT_SPLIT_SEED.to_string())
            .parse::<u64>()
            .context("Failed to parse SPLIT_SEED")?;

        let test_fraction = env::var("TEST_FRACTION")
            .unwrap_or_else(|_| DEFAULT_TEST_FRACTION.to_string())
            .parse::<f64>()
            .context("Failed to parse TEST_FRACTION")?;
        if !(0.0..1.0).contains(&test_fraction) {
            anyhow::bail!("TEST_FRACTION must be in [0, 1), got {}", test_fraction);
        }

        let solver = SolverKind::from_str(
            &env::var("MODEL_SOLVER").unwrap_or_else(|_| "svd".to_string()),
        )?;

        let scale_prediction_input = env::var("SCALE_PREDICTION_INPUT")
            .unwrap_or_else(|_| "false".to_string())
            .parse::<bool>()
            .context("Failed to parse SCALE_PREDICTION_INPUT")?;

        Ok(Self {
            split_seed,
            test_fraction,
            solver,
            scale_prediction_input,
        })
    }

    pub fn fit_settings(&self) -> FitSettings {
        FitSettings {
            seed: self.split_seed,
            test_fraction: self.test_fraction,
            solver: self.solver,
        }
    }
}
