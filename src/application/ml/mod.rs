pub mod prediction_service;
pub mod training_pipeline;

pub use prediction_service::PredictionService;
pub use training_pipeline::{FitSettings, RetrainReport, TrainingPipeline};
