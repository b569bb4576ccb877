use thiserror::Error;

/// Errors raised while reading or validating a training dataset
#[derive(Debug, Error)]
pub enum DatasetFormatError {
    #[error("failed to read dataset {path}: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("malformed dataset: {reason}")]
    Malformed { reason: String },

    #[error("missing Date column")]
    MissingDateColumn,

    #[error("unparseable date '{value}' in row {row}")]
    InvalidDate { row: usize, value: String },

    #[error("non-numeric value '{value}' in column '{column}' at row {row}")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },

    #[error("dataset has no data rows")]
    Empty,

    #[error("dataset has no feature columns besides Date and target '{target}'")]
    NoFeatureColumns { target: String },

    #[error("training subset is empty: {rows} rows with test fraction {test_fraction}")]
    EmptyTrainingSet { rows: usize, test_fraction: f64 },

    #[error("training subset has {rows} rows, need more than {features} for {features} features")]
    TooFewTrainingRows { rows: usize, features: usize },
}

/// Errors related to reading the persisted model artifact
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("model artifact not found at {path}")]
    NotFound { path: String },

    #[error("failed to read model artifact {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("failed to decode model artifact {path}: {reason}")]
    Corrupt { path: String, reason: String },
}

/// Errors related to writing the persisted model artifact
#[derive(Debug, Error)]
pub enum ModelSaveError {
    #[error("failed to serialize model artifact: {reason}")]
    Serialize { reason: String },

    #[error("failed to write model artifact {path}: {reason}")]
    Io { path: String, reason: String },
}

/// Errors raised when a feature vector does not fit the current model
#[derive(Debug, Error)]
pub enum PredictionInputError {
    #[error("expected {expected} features, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("feature vector is empty")]
    Empty,

    #[error("feature at index {index} is not a finite number")]
    NonFinite { index: usize },
}

/// Failures of a retrain run, one variant per pipeline stage
#[derive(Debug, Error)]
pub enum TrainingError {
    #[error(transparent)]
    Dataset(#[from] DatasetFormatError),

    #[error(transparent)]
    ModelLoad(#[from] ModelLoadError),

    #[error("model fit failed: {reason}")]
    Fit { reason: String },

    #[error(transparent)]
    ModelSave(#[from] ModelSaveError),
}

/// Failures of a single prediction request
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error(transparent)]
    ModelLoad(#[from] ModelLoadError),

    #[error(transparent)]
    Input(#[from] PredictionInputError),

    #[error("model evaluation failed: {reason}")]
    Model { reason: String },
}

/// Errors related to storing uploaded dataset files
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("invalid upload file name '{name}'")]
    InvalidName { name: String },

    #[error("failed to store upload {path}: {reason}")]
    Io { path: String, reason: String },
}
