//! Retrains the price model from a CSV dataset and persists it.
//!
//! Steps: read → validate `Date` → select target/features → seeded 80/20
//! split → standardize on the training rows → load base model → fit → score
//! on the evaluation rows → save.

use crate::domain::errors::{DatasetFormatError, TrainingError};
use crate::domain::ml::split::{select, train_eval_split};
use crate::domain::ml::{Dataset, EvaluationReport, ModelArtifact, SolverKind, StandardScaler};
use crate::domain::ports::ModelStore;
use crate::infrastructure::dataset_reader::CsvDatasetReader;
use chrono::Utc;
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::linear_regression::LinearRegression;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

pub const DEFAULT_SPLIT_SEED: u64 = 42;
pub const DEFAULT_TEST_FRACTION: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitSettings {
    pub seed: u64,
    pub test_fraction: f64,
    pub solver: SolverKind,
}

impl Default for FitSettings {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SPLIT_SEED,
            test_fraction: DEFAULT_TEST_FRACTION,
            solver: SolverKind::default(),
        }
    }
}

/// Scaled training and evaluation matrices plus the scaler fitted on them
#[derive(Debug, Clone)]
pub struct PreparedData {
    pub scaler: StandardScaler,
    pub x_train: Vec<Vec<f64>>,
    pub y_train: Vec<f64>,
    pub x_eval: Vec<Vec<f64>>,
    pub y_eval: Vec<f64>,
}

impl PreparedData {
    /// Splits the dataset and standardizes both subsets with parameters
    /// fitted on the training rows only.
    pub fn prepare(
        dataset: &Dataset,
        seed: u64,
        test_fraction: f64,
    ) -> Result<Self, DatasetFormatError> {
        let split = train_eval_split(dataset.len(), test_fraction, seed);
        if split.train.is_empty() {
            return Err(DatasetFormatError::EmptyTrainingSet {
                rows: dataset.len(),
                test_fraction,
            });
        }

        let x_train_raw = select(&dataset.features, &split.train);
        let x_eval_raw = select(&dataset.features, &split.eval);
        let scaler = StandardScaler::fit(&x_train_raw);

        Ok(Self {
            x_train: scaler.transform(&x_train_raw),
            y_train: select(&dataset.targets, &split.train),
            x_eval: scaler.transform(&x_eval_raw),
            y_eval: select(&dataset.targets, &split.eval),
            scaler,
        })
    }
}

/// Fits a linear model on prepared data and wraps it into an artifact.
pub fn fit_prepared(
    dataset: &Dataset,
    prepared: PreparedData,
    solver: SolverKind,
    generation: u64,
) -> Result<ModelArtifact, TrainingError> {
    // smartcore indexes past the matrix when rows <= columns (intercept included).
    let features = dataset.feature_count();
    if prepared.x_train.len() <= features {
        return Err(DatasetFormatError::TooFewTrainingRows {
            rows: prepared.x_train.len(),
            features,
        }
        .into());
    }

    // The QR solve panics on a singular R instead of returning an error.
    if solver == SolverKind::Qr && !has_full_column_rank(&prepared.x_train) {
        return Err(TrainingError::Fit {
            reason: "design matrix is rank deficient (constant or collinear features); \
                     the qr solver needs full column rank"
                .to_string(),
        });
    }

    let x_matrix = DenseMatrix::from_2d_vec(&prepared.x_train).map_err(|e| TrainingError::Fit {
        reason: format!("matrix error: {}", e),
    })?;

    let model = LinearRegression::fit(&x_matrix, &prepared.y_train, solver.parameters())
        .map_err(|e| TrainingError::Fit {
            reason: e.to_string(),
        })?;

    let mut artifact = ModelArtifact {
        model,
        solver,
        scaler: prepared.scaler,
        feature_columns: dataset.feature_columns.clone(),
        target_column: dataset.target_column.clone(),
        training_rows: prepared.y_train.len(),
        evaluation: None,
        generation,
        trained_at: Utc::now(),
    };

    if !prepared.x_eval.is_empty() {
        let predictions = artifact
            .predict_rows(&prepared.x_eval)
            .map_err(|e| TrainingError::Fit {
                reason: format!("evaluation failed: {}", e),
            })?;
        artifact.evaluation = EvaluationReport::score(&predictions, &prepared.y_eval);
    }

    if artifact
        .evaluation
        .is_some_and(|r| !r.rmse.is_finite())
    {
        return Err(TrainingError::Fit {
            reason: "fit produced non-finite predictions".to_string(),
        });
    }

    Ok(artifact)
}

const RANK_TOLERANCE: f64 = 1e-9;

/// Whether `[features | 1]` has linearly independent columns, by modified
/// Gram-Schmidt with a tolerance relative to each column's norm.
fn has_full_column_rank(rows: &[Vec<f64>]) -> bool {
    let n_rows = rows.len();
    let n_features = rows.first().map(|r| r.len()).unwrap_or(0);
    if n_rows <= n_features {
        return false;
    }

    let columns = (0..n_features)
        .map(|j| rows.iter().map(|r| r[j]).collect::<Vec<f64>>())
        .chain(std::iter::once(vec![1.0; n_rows]));

    let norm = |v: &[f64]| v.iter().map(|x| x * x).sum::<f64>().sqrt();
    let mut basis: Vec<Vec<f64>> = Vec::with_capacity(n_features + 1);

    for mut column in columns {
        let original = norm(&column);
        for q in &basis {
            let dot: f64 = q.iter().zip(column.iter()).map(|(a, b)| a * b).sum();
            for (c, qv) in column.iter_mut().zip(q.iter()) {
                *c -= dot * qv;
            }
        }
        let residual = norm(&column);
        if original == 0.0 || residual <= RANK_TOLERANCE * original {
            return false;
        }
        basis.push(column.iter().map(|c| c / residual).collect());
    }
    true
}

/// Prepares and fits an artifact. With a `base`, its solver is reused and the
/// generation advances; otherwise `settings.solver` starts generation 0.
pub fn fit_artifact(
    dataset: &Dataset,
    settings: &FitSettings,
    base: Option<&ModelArtifact>,
) -> Result<ModelArtifact, TrainingError> {
    let prepared = PreparedData::prepare(dataset, settings.seed, settings.test_fraction)?;
    let (solver, generation) = match base {
        Some(b) => (b.solver, b.generation + 1),
        None => (settings.solver, 0),
    };
    fit_prepared(dataset, prepared, solver, generation)
}

/// Summary of a successful retrain
#[derive(Debug, Clone, PartialEq)]
pub struct RetrainReport {
    pub artifact_path: PathBuf,
    pub generation: u64,
    pub training_rows: usize,
    pub evaluation: Option<EvaluationReport>,
}

pub struct TrainingPipeline {
    store: Arc<dyn ModelStore>,
    reader: CsvDatasetReader,
    settings: FitSettings,
}

impl TrainingPipeline {
    pub fn new(store: Arc<dyn ModelStore>, settings: FitSettings) -> Self {
        Self {
            store,
            reader: CsvDatasetReader,
            settings,
        }
    }

    /// Retrains the persisted model on `dataset_path` and returns the artifact path.
    pub fn retrain(&self, dataset_path: &Path) -> Result<PathBuf, TrainingError> {
        self.retrain_with_report(dataset_path)
            .map(|report| report.artifact_path)
    }

    pub fn retrain_with_report(&self, dataset_path: &Path) -> Result<RetrainReport, TrainingError> {
        info!("Retraining model from {:?}", dataset_path);

        let dataset = self.reader.read(dataset_path)?;
        let prepared =
            PreparedData::prepare(&dataset, self.settings.seed, self.settings.test_fraction)?;

        // The existing artifact is the base: its solver and generation carry forward.
        let base = self.store.load()?;
        if base.feature_columns != dataset.feature_columns {
            warn!(
                previous = ?base.feature_columns,
                current = ?dataset.feature_columns,
                "Feature columns differ from the current model"
            );
        }

        let artifact = fit_prepared(&dataset, prepared, base.solver, base.generation + 1)?;
        self.store.save(&artifact)?;

        if let Some(eval) = &artifact.evaluation {
            info!(
                rows = eval.rows,
                rmse = eval.rmse,
                mae = eval.mae,
                r2 = eval.r2,
                "Evaluation on held-out rows"
            );
        }
        info!(
            generation = artifact.generation,
            training_rows = artifact.training_rows,
            "Model retrained and saved as {:?}",
            self.store.location()
        );

        Ok(RetrainReport {
            artifact_path: self.store.location().to_path_buf(),
            generation: artifact.generation,
            training_rows: artifact.training_rows,
            evaluation: artifact.evaluation,
        })
    }
}
