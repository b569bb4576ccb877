use crate::domain::errors::{PredictionError, TrainingError};
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

pub const NO_FILE_PART: &str = "No file part";
pub const NO_SELECTED_FILE: &str = "No selected file";

/// Body of every non-prediction response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// An error rendered as `{"message": ...}` with a status code
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn retrain_failed(status: StatusCode, detail: impl std::fmt::Display) -> Self {
        Self::new(status, format!("Error retraining model: {}", detail))
    }
}

impl From<TrainingError> for ApiError {
    fn from(err: TrainingError) -> Self {
        let status = match err {
            TrainingError::Dataset(_) => StatusCode::UNPROCESSABLE_ENTITY,
            TrainingError::ModelLoad(_) | TrainingError::Fit { .. } | TrainingError::ModelSave(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self::retrain_failed(status, err)
    }
}

impl From<PredictionError> for ApiError {
    fn from(err: PredictionError) -> Self {
        match err {
            PredictionError::ModelLoad(e) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error loading model: {}", e),
            ),
            PredictionError::Input(e) => Self::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Error making prediction: {}", e),
            ),
            PredictionError::Model { .. } => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error making prediction: {}", err),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(MessageResponse {
                message: self.message,
            }),
        )
            .into_response()
    }
}
