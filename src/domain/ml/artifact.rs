//! The persisted model: fitted regression, scaler and training metadata.

use super::evaluation::EvaluationReport;
use super::scaler::StandardScaler;
use crate::domain::errors::{PredictionError, PredictionInputError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::linear_regression::{
    LinearRegression, LinearRegressionParameters, LinearRegressionSolverName,
};
use std::fmt;

pub type RegressionModel = LinearRegression<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Least-squares solver used when fitting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverKind {
    Qr,
    #[default]
    Svd,
}

impl SolverKind {
    pub fn parameters(self) -> LinearRegressionParameters {
        let solver = match self {
            SolverKind::Qr => LinearRegressionSolverName::QR,
            SolverKind::Svd => LinearRegressionSolverName::SVD,
        };
        LinearRegressionParameters::default().with_solver(solver)
    }
}

impl std::str::FromStr for SolverKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "qr" => Ok(SolverKind::Qr),
            "svd" => Ok(SolverKind::Svd),
            _ => anyhow::bail!("Invalid solver: {}. Must be 'qr' or 'svd'", s),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct ModelArtifact {
    pub model: RegressionModel,
    pub solver: SolverKind,
    pub scaler: StandardScaler,
    pub feature_columns: Vec<String>,
    pub target_column: String,
    pub training_rows: usize,
    pub evaluation: Option<EvaluationReport>,
    /// Incremented by every retrain on top of this artifact
    pub generation: u64,
    pub trained_at: DateTime<Utc>,
}

impl ModelArtifact {
    pub fn feature_count(&self) -> usize {
        self.feature_columns.len()
    }

    /// Evaluates the model on a single feature vector.
    ///
    /// The stored scaler is only applied when `scale_input` is set; by default
    /// the raw vector goes straight into the model.
    pub fn predict_one(&self, features: &[f64], scale_input: bool) -> Result<f64, PredictionError> {
        if features.is_empty() {
            return Err(PredictionInputError::Empty.into());
        }
        if features.len() != self.feature_count() {
            return Err(PredictionInputError::ShapeMismatch {
                expected: self.feature_count(),
                actual: features.len(),
            }
            .into());
        }
        if let Some(index) = features.iter().position(|v| !v.is_finite()) {
            return Err(PredictionInputError::NonFinite { index }.into());
        }

        let row = if scale_input {
            self.scaler.transform_row(features)
        } else {
            features.to_vec()
        };

        let predictions = self.predict_rows(&[row])?;
        predictions
            .first()
            .copied()
            .ok_or_else(|| PredictionError::Model {
                reason: "no prediction returned".to_string(),
            })
    }

    /// Evaluates the model on already prepared rows.
    pub fn predict_rows(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, PredictionError> {
        let matrix = DenseMatrix::from_2d_vec(&rows.to_vec()).map_err(|e| PredictionError::Model {
            reason: format!("matrix creation failed: {}", e),
        })?;

        self.model
            .predict(&matrix)
            .map_err(|e| PredictionError::Model {
                reason: format!("prediction failed: {}", e),
            })
    }
}

impl fmt::Debug for ModelArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelArtifact")
            .field("solver", &self.solver)
            .field("feature_columns", &self.feature_columns)
            .field("target_column", &self.target_column)
            .field("training_rows", &self.training_rows)
            .field("evaluation", &self.evaluation)
            .field("generation", &self.generation)
            .field("trained_at", &self.trained_at)
            .finish_non_exhaustive()
    }
}
