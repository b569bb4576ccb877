//! Fits a fresh price model from a CSV dataset and writes the artifact the
//! server loads and retrains.

use anyhow::{Context, Result};
use clap::Parser;
use pricecast::application::ml::FitSettings;
use pricecast::application::ml::training_pipeline::fit_artifact;
use pricecast::config::{StorageEnvConfig, TrainingEnvConfig};
use pricecast::domain::ml::SolverKind;
use pricecast::domain::ports::ModelStore;
use pricecast::infrastructure::{CsvDatasetReader, FsModelStore};
use std::path::PathBuf;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to training data CSV (Date column required, last column is the target)
    #[arg(long)]
    input: PathBuf,

    /// Path to output model file (defaults to MODEL_PATH or models/price-model.json)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Seed for the train/evaluation shuffle
    #[arg(long)]
    seed: Option<u64>,

    /// Share of rows held out for evaluation
    #[arg(long)]
    test_fraction: Option<f64>,

    /// Least-squares solver: qr or svd
    #[arg(long)]
    solver: Option<SolverKind>,

    /// Overwrite an existing artifact
    #[arg(long)]
    force: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let args = Args::parse();
    let storage = StorageEnvConfig::from_env();
    let training = TrainingEnvConfig::from_env()?;

    let defaults = training.fit_settings();
    let settings = FitSettings {
        seed: args.seed.unwrap_or(defaults.seed),
        test_fraction: args.test_fraction.unwrap_or(defaults.test_fraction),
        solver: args.solver.unwrap_or(defaults.solver),
    };
    if !(0.0..1.0).contains(&settings.test_fraction) {
        anyhow::bail!(
            "--test-fraction must be in [0, 1), got {}",
            settings.test_fraction
        );
    }

    let model_path = args.output.unwrap_or(storage.model_path);
    if model_path.exists() && !args.force {
        anyhow::bail!(
            "Model artifact already exists at {:?}. Use --force to overwrite, or retrain through the server.",
            model_path
        );
    }

    info!("Loading training data from {:?}", args.input);
    let dataset = CsvDatasetReader
        .read(&args.input)
        .with_context(|| format!("Failed to load dataset {:?}", args.input))?;
    info!(
        "Dataset: {} rows, features={:?}, target={}",
        dataset.len(),
        dataset.feature_columns,
        dataset.target_column
    );

    info!(
        "Training Linear Regression (solver: {:?}, seed: {}, test fraction: {})...",
        settings.solver, settings.seed, settings.test_fraction
    );
    let artifact = fit_artifact(&dataset, &settings, None).context("Training failed")?;

    match &artifact.evaluation {
        Some(eval) => info!(
            "OOS Test (n={}): RMSE={:.6}, MAE={:.6}, R²={:.4}",
            eval.rows, eval.rmse, eval.mae, eval.r2
        ),
        None => info!("No evaluation rows held out."),
    }

    let store = FsModelStore::new(&model_path);
    store.save(&artifact).context("Failed to save model")?;
    info!(
        "Done. Model trained on {} samples saved to {:?}.",
        artifact.training_rows, model_path
    );
    Ok(())
}
