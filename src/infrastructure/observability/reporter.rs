//! Push-based metrics reporter for pricecast
//!
//! Periodically outputs a metrics snapshot as structured JSON to stdout.

use crate::infrastructure::observability::metrics::{Metrics, OUTCOME_FAILURE, OUTCOME_SUCCESS};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Metrics snapshot for JSON output
#[derive(Serialize)]
pub struct MetricsSnapshot {
    pub timestamp: String,
    pub uptime_seconds: u64,
    pub version: String,
    pub retrains: OutcomeCounts,
    pub predictions: OutcomeCounts,
    pub model: ModelSnapshot,
}

#[derive(Serialize)]
pub struct OutcomeCounts {
    pub success: u64,
    pub failure: u64,
}

#[derive(Serialize)]
pub struct ModelSnapshot {
    pub generation: u64,
    pub evaluation_rmse: f64,
    pub evaluation_r2: f64,
}

/// Outputs metrics as structured JSON logs on a configurable interval.
pub struct MetricsReporter {
    metrics: Metrics,
    start_time: Instant,
    interval: Duration,
}

impl MetricsReporter {
    pub fn new(metrics: Metrics, interval_seconds: u64) -> Self {
        Self {
            metrics,
            start_time: Instant::now(),
            interval: Duration::from_secs(interval_seconds.max(1)),
        }
    }

    /// Run the reporter in a loop, outputting metrics periodically
    pub async fn run(self) {
        info!(
            "MetricsReporter: Starting push-based metrics (interval: {:?})",
            self.interval
        );

        loop {
            tokio::time::sleep(self.interval).await;

            let snapshot = self.collect_snapshot();
            match serde_json::to_string(&snapshot) {
                Ok(json) => {
                    // Prefixed so logs can be filtered
                    println!("METRICS_JSON:{}", json);
                    info!(
                        "Retrains: {} ok / {} failed | Predictions: {} ok / {} failed | Uptime: {}s",
                        snapshot.retrains.success,
                        snapshot.retrains.failure,
                        snapshot.predictions.success,
                        snapshot.predictions.failure,
                        snapshot.uptime_seconds
                    );
                }
                Err(e) => warn!("Failed to serialize metrics: {}", e),
            }
            debug!("Prometheus exposition:\n{}", self.metrics.render());
        }
    }

    fn collect_snapshot(&self) -> MetricsSnapshot {
        let uptime = self.start_time.elapsed().as_secs();
        self.metrics.uptime_seconds.set(uptime as f64);

        MetricsSnapshot {
            timestamp: chrono::Utc::now().to_rfc3339(),
            uptime_seconds: uptime,
            version: env!("CARGO_PKG_VERSION").to_string(),
            retrains: OutcomeCounts {
                success: self.metrics.retrain_count(OUTCOME_SUCCESS),
                failure: self.metrics.retrain_count(OUTCOME_FAILURE),
            },
            predictions: OutcomeCounts {
                success: self.metrics.prediction_count(OUTCOME_SUCCESS),
                failure: self.metrics.prediction_count(OUTCOME_FAILURE),
            },
            model: ModelSnapshot {
                generation: self.metrics.model_generation.get() as u64,
                evaluation_rmse: self.metrics.evaluation_rmse.get(),
                evaluation_r2: self.metrics.evaluation_r2.get(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_snapshot_collection() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        metrics.record_retrain(OUTCOME_FAILURE, 0.1);
        metrics.record_prediction(OUTCOME_SUCCESS, 0.001);
        let reporter = MetricsReporter::new(metrics, 60);

        let snapshot = reporter.collect_snapshot();

        assert_eq!(snapshot.retrains.failure, 1);
        assert_eq!(snapshot.retrains.success, 0);
        assert_eq!(snapshot.predictions.success, 1);
        assert!(!snapshot.timestamp.is_empty());
    }

    #[test]
    fn test_exposition_includes_snapshot_gauges() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        metrics.record_retrain(OUTCOME_SUCCESS, 0.3);
        let reporter = MetricsReporter::new(metrics, 60);

        reporter.collect_snapshot();
        let exposition = reporter.metrics.render();

        assert!(exposition.contains("pricecast_uptime_seconds"));
        assert!(exposition.contains("pricecast_retrains_total{outcome=\"success\"} 1"));
    }

    #[test]
    fn test_snapshot_serialization() {
        let snapshot = MetricsSnapshot {
            timestamp: "2026-01-10T10:00:00Z".to_string(),
            uptime_seconds: 3600,
            version: "0.1.0".to_string(),
            retrains: OutcomeCounts {
                success: 4,
                failure: 1,
            },
            predictions: OutcomeCounts {
                success: 120,
                failure: 3,
            },
            model: ModelSnapshot {
                generation: 4,
                evaluation_rmse: 1.25,
                evaluation_r2: 0.97,
            },
        };

        let json = serde_json::to_string(&snapshot).expect("Failed to serialize");
        assert!(json.contains("\"generation\":4"));
        assert!(json.contains("120"));
    }
}
