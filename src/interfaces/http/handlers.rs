//! HTTP request handlers

use super::error::{ApiError, MessageResponse, NO_FILE_PART, NO_SELECTED_FILE};
use super::state::AppState;
use crate::infrastructure::observability::metrics::{OUTCOME_FAILURE, OUTCOME_SUCCESS};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{error, info, warn};

/// Multipart field carrying the dataset file
pub const DATASET_FIELD: &str = "dataset";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PredictRequest {
    pub features: Vec<f64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PredictResponse {
    pub prediction: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Store an uploaded CSV and retrain the model on it
pub async fn retrain(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut multipart = multipart.map_err(|e| {
        warn!("Retrain request is not multipart: {}", e);
        ApiError::bad_request(NO_FILE_PART)
    })?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some(DATASET_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?;
        upload = Some((file_name, data));
        break;
    }

    let Some((file_name, data)) = upload else {
        return Err(ApiError::bad_request(NO_FILE_PART));
    };
    if file_name.is_empty() {
        return Err(ApiError::bad_request(NO_SELECTED_FILE));
    }

    info!("Received dataset: {} ({} bytes)", file_name, data.len());

    // Held from the upload write until the artifact is saved, so a same-named
    // upload cannot replace the file a running retrain is reading.
    let _guard = state.retrain_lock.lock().await;

    let dataset_path = state.uploads.save(&file_name, &data).await.map_err(|e| {
        error!("Failed to store upload: {}", e);
        ApiError::retrain_failed(StatusCode::INTERNAL_SERVER_ERROR, e)
    })?;

    let started = Instant::now();
    let pipeline = state.pipeline.clone();
    let result = tokio::task::spawn_blocking(move || pipeline.retrain_with_report(&dataset_path))
        .await
        .map_err(|e| {
            error!("Retrain task failed: {}", e);
            state
                .metrics
                .record_retrain(OUTCOME_FAILURE, started.elapsed().as_secs_f64());
            ApiError::retrain_failed(StatusCode::INTERNAL_SERVER_ERROR, "training task aborted")
        })?;
    let elapsed = started.elapsed().as_secs_f64();

    match result {
        Ok(report) => {
            state.metrics.record_retrain(OUTCOME_SUCCESS, elapsed);
            state
                .metrics
                .set_model_summary(report.generation, report.evaluation.as_ref());
            Ok(Json(MessageResponse {
                message: format!(
                    "Model retrained and saved as '{}'",
                    report.artifact_path.display()
                ),
            }))
        }
        Err(e) => {
            state.metrics.record_retrain(OUTCOME_FAILURE, elapsed);
            error!("Retrain failed: {}", e);
            Err(e.into())
        }
    }
}

/// Predict a price from a feature vector
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| {
        ApiError::new(e.status(), format!("Invalid request body: {}", e.body_text()))
    })?;

    let started = Instant::now();
    let predictor = state.predictor.clone();
    let result = tokio::task::spawn_blocking(move || predictor.predict(&request.features))
        .await
        .map_err(|e| {
            error!("Prediction task failed: {}", e);
            ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error making prediction: prediction task aborted",
            )
        })?;
    let elapsed = started.elapsed().as_secs_f64();

    match result {
        Ok(prediction) => {
            state.metrics.record_prediction(OUTCOME_SUCCESS, elapsed);
            Ok(Json(PredictResponse { prediction }))
        }
        Err(e) => {
            state.metrics.record_prediction(OUTCOME_FAILURE, elapsed);
            Err(e.into())
        }
    }
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
