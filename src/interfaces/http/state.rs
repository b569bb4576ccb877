use crate::application::ml::{PredictionService, TrainingPipeline};
use crate::config::Config;
use crate::domain::ports::ModelStore;
use crate::infrastructure::observability::Metrics;
use crate::infrastructure::{FsModelStore, UploadStore};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared state for HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<TrainingPipeline>,
    pub predictor: Arc<PredictionService>,
    pub uploads: Arc<UploadStore>,
    pub metrics: Metrics,
    /// Serializes retrains so only one writer touches the artifact at a time.
    pub retrain_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(config: &Config, store: Arc<dyn ModelStore>, metrics: Metrics) -> Self {
        Self {
            pipeline: Arc::new(TrainingPipeline::new(
                store.clone(),
                config.training.fit_settings(),
            )),
            predictor: Arc::new(PredictionService::new(
                store,
                config.training.scale_prediction_input,
            )),
            uploads: Arc::new(UploadStore::new(&config.storage.upload_dir)),
            metrics,
            retrain_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Wires the filesystem model store at `config.storage.model_path`.
    pub fn from_config(config: &Config, metrics: Metrics) -> Self {
        let store: Arc<dyn ModelStore> = Arc::new(FsModelStore::new(&config.storage.model_path));
        Self::new(config, store, metrics)
    }
}
