//! pricecast server - HTTP façade over the price regression model
//!
//! # Usage
//! ```sh
//! MODEL_PATH=models/price-model.json PORT=5001 cargo run --bin server
//! ```
//!
//! # Environment Variables
//! - `MODEL_PATH` - Model artifact location (default: models/price-model.json)
//! - `UPLOAD_DIR` - Directory for uploaded datasets (default: uploads)
//! - `BIND_ADDRESS` / `PORT` - Listen address (default: 0.0.0.0:5001)
//! - `OBSERVABILITY_ENABLED` - Enable metrics reporting (default: true)
//! - `OBSERVABILITY_INTERVAL` - Interval in seconds between metric outputs (default: 60)

use anyhow::{Context, Result};
use pricecast::config::Config;
use pricecast::infrastructure::observability::{Metrics, MetricsReporter};
use pricecast::interfaces::http::{self, AppState};
use tracing::{Level, info, warn};
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    info!("pricecast server {} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: model={:?}, uploads={:?}, seed={}, test_fraction={}",
        config.storage.model_path,
        config.storage.upload_dir,
        config.training.split_seed,
        config.training.test_fraction
    );

    std::fs::create_dir_all(&config.storage.upload_dir).with_context(|| {
        format!(
            "Failed to create upload directory {:?}",
            config.storage.upload_dir
        )
    })?;

    if !config.storage.model_path.exists() {
        warn!(
            "Model artifact not found at {:?}. Predictions and retrains will fail until one is created with `train_model`.",
            config.storage.model_path
        );
    }
    if config.training.scale_prediction_input {
        info!("Prediction inputs are standardized with the stored scaler");
    }

    let metrics = Metrics::new()?;
    let state = AppState::from_config(&config, metrics.clone());
    info!("Predictor: {}", state.predictor.name());

    if config.observability.enabled {
        let interval = config.observability.interval_seconds;
        let reporter = MetricsReporter::new(metrics, interval);

        tokio::spawn(async move {
            reporter.run().await;
        });

        info!("Metrics reporter started (interval: {}s)", interval);
    } else {
        info!("Metrics reporting disabled.");
    }

    http::serve(&config.server, state).await
}
