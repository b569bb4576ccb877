use crate::domain::errors::PredictionError;
use crate::domain::ports::ModelStore;
use std::sync::Arc;
use tracing::{debug, warn};

/// Serves point predictions from the currently persisted model.
///
/// The model is loaded from the store on every call, so a retrain is picked up
/// by the next request without a restart.
pub struct PredictionService {
    store: Arc<dyn ModelStore>,
    scale_input: bool,
}

impl PredictionService {
    pub fn new(store: Arc<dyn ModelStore>, scale_input: bool) -> Self {
        if scale_input {
            debug!("Prediction inputs will be standardized with the stored scaler");
        }
        Self { store, scale_input }
    }

    pub fn predict(&self, features: &[f64]) -> Result<f64, PredictionError> {
        let artifact = self.store.load()?;

        match artifact.predict_one(features, self.scale_input) {
            Ok(prediction) => {
                debug!(
                    generation = artifact.generation,
                    prediction, "Prediction served"
                );
                Ok(prediction)
            }
            Err(e) => {
                warn!("Prediction rejected: {}", e);
                Err(e)
            }
        }
    }

    pub fn name(&self) -> &str {
        "SmartCore Linear Regression"
    }
}
