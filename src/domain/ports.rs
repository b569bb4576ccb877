use crate::domain::errors::{ModelLoadError, ModelSaveError};
use crate::domain::ml::ModelArtifact;
use std::path::Path;

/// Single point of access to the persisted model artifact.
///
/// Implementations own one fixed location; `save` overwrites it.
pub trait ModelStore: Send + Sync {
    fn load(&self) -> Result<ModelArtifact, ModelLoadError>;

    fn save(&self, artifact: &ModelArtifact) -> Result<(), ModelSaveError>;

    /// Where the artifact lives, reported back to callers after a retrain
    fn location(&self) -> &Path;
}
