// Model retraining and prediction services
pub mod ml;
