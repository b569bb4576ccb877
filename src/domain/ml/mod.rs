// Dataset parsing and column roles
pub mod dataset;

// Fit quality metrics
pub mod evaluation;

// Persisted model artifact
pub mod artifact;

// Feature standardization
pub mod scaler;

// Seeded train/evaluation partition
pub mod split;

pub use artifact::{ModelArtifact, RegressionModel, SolverKind};
pub use dataset::Dataset;
pub use evaluation::EvaluationReport;
pub use scaler::StandardScaler;
