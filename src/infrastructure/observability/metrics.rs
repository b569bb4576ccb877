//! Prometheus metrics definitions for pricecast
//!
//! All metrics use the `pricecast_` prefix.

use crate::domain::ml::EvaluationReport;
use prometheus::{
    CounterVec, Gauge, Histogram, HistogramOpts, Opts, Registry, TextEncoder,
    core::{AtomicF64, GenericGauge},
};
use std::sync::Arc;

pub const OUTCOME_SUCCESS: &str = "success";
pub const OUTCOME_FAILURE: &str = "failure";

/// Prometheus metrics for the model service
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    /// Retrain requests by outcome
    pub retrains_total: CounterVec,
    /// Prediction requests by outcome
    pub predictions_total: CounterVec,
    /// Wall time of a retrain run
    pub training_duration_seconds: Histogram,
    /// Wall time of a prediction
    pub prediction_latency_seconds: Histogram,
    /// Generation of the last artifact written by this process
    pub model_generation: GenericGauge<AtomicF64>,
    /// RMSE on the evaluation subset of the last retrain
    pub evaluation_rmse: GenericGauge<AtomicF64>,
    /// R² on the evaluation subset of the last retrain
    pub evaluation_r2: GenericGauge<AtomicF64>,
    /// Uptime in seconds
    pub uptime_seconds: GenericGauge<AtomicF64>,
}

impl Metrics {
    /// Create a new Metrics instance with all gauges and counters registered
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let retrains_total = CounterVec::new(
            Opts::new("pricecast_retrains_total", "Retrain requests by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(retrains_total.clone()))?;

        let predictions_total = CounterVec::new(
            Opts::new(
                "pricecast_predictions_total",
                "Prediction requests by outcome",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(predictions_total.clone()))?;

        let training_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "pricecast_training_duration_seconds",
                "Retrain wall time in seconds",
            )
            .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        )?;
        registry.register(Box::new(training_duration_seconds.clone()))?;

        let prediction_latency_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "pricecast_prediction_latency_seconds",
                "Prediction latency in seconds",
            )
            .buckets(vec![
                0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25,
            ]),
        )?;
        registry.register(Box::new(prediction_latency_seconds.clone()))?;

        let model_generation = Gauge::with_opts(Opts::new(
            "pricecast_model_generation",
            "Generation of the last artifact written",
        ))?;
        registry.register(Box::new(model_generation.clone()))?;

        let evaluation_rmse = Gauge::with_opts(Opts::new(
            "pricecast_evaluation_rmse",
            "RMSE on the held-out rows of the last retrain",
        ))?;
        registry.register(Box::new(evaluation_rmse.clone()))?;

        let evaluation_r2 = Gauge::with_opts(Opts::new(
            "pricecast_evaluation_r2",
            "R squared on the held-out rows of the last retrain",
        ))?;
        registry.register(Box::new(evaluation_r2.clone()))?;

        let uptime_seconds = Gauge::with_opts(Opts::new(
            "pricecast_uptime_seconds",
            "Server uptime in seconds",
        ))?;
        registry.register(Box::new(uptime_seconds.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            retrains_total,
            predictions_total,
            training_duration_seconds,
            prediction_latency_seconds,
            model_generation,
            evaluation_rmse,
            evaluation_r2,
            uptime_seconds,
        })
    }

    /// Render all metrics in Prometheus text format
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder
            .encode_to_string(&metric_families)
            .unwrap_or_default()
    }

    pub fn record_retrain(&self, outcome: &str, seconds: f64) {
        self.retrains_total.with_label_values(&[outcome]).inc();
        self.training_duration_seconds.observe(seconds);
    }

    pub fn record_prediction(&self, outcome: &str, seconds: f64) {
        self.predictions_total.with_label_values(&[outcome]).inc();
        self.prediction_latency_seconds.observe(seconds);
    }

    pub fn set_model_summary(&self, generation: u64, evaluation: Option<&EvaluationReport>) {
        self.model_generation.set(generation as f64);
        if let Some(eval) = evaluation {
            self.evaluation_rmse.set(eval.rmse);
            self.evaluation_r2.set(eval.r2);
        }
    }

    pub fn retrain_count(&self, outcome: &str) -> u64 {
        self.retrains_total.with_label_values(&[outcome]).get() as u64
    }

    pub fn prediction_count(&self, outcome: &str) -> u64 {
        self.predictions_total.with_label_values(&[outcome]).get() as u64
    }
}
