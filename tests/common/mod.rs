#![allow(dead_code)]

use pricecast::application::ml::FitSettings;
use pricecast::application::ml::training_pipeline::fit_artifact;
use pricecast::domain::ml::{Dataset, SolverKind};
use pricecast::domain::ports::ModelStore;
use pricecast::infrastructure::FsModelStore;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A unique scratch directory, removed on drop.
pub struct TestDir {
    pub path: PathBuf,
}

impl TestDir {
    pub fn new(label: &str) -> Self {
        let unique_id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "pricecast_it_{}_{}_{}_{}",
            label,
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos())
                .unwrap_or(0),
            unique_id
        ));
        fs::create_dir_all(&path).expect("Failed to create test temp dir");
        Self { path }
    }

    pub fn join(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.join(name);
        fs::write(&path, content).expect("Failed to write test file");
        path
    }
}

impl Drop for TestDir {
    fn drop(&mut self) {
        fs::remove_dir_all(&self.path).ok();
    }
}

/// `Date,X1,X2,Price` rows with Price = 3*X1 + 2*X2 + 5
pub fn price_csv(rows: usize) -> String {
    let mut csv = String::from("Date,X1,X2,Price\n");
    for i in 0..rows {
        let x1 = i as f64 * 1.5;
        let x2 = ((i * 7) % 5) as f64;
        csv.push_str(&format!(
            "2024-01-{:02},{},{},{}\n",
            i + 1,
            x1,
            x2,
            3.0 * x1 + 2.0 * x2 + 5.0
        ));
    }
    csv
}

/// Like [`price_csv`] with a different slope, so a retrain visibly moves predictions
pub fn shifted_price_csv(rows: usize) -> String {
    let mut csv = String::from("Date,X1,X2,Price\n");
    for i in 0..rows {
        let x1 = i as f64;
        let x2 = ((i * 3) % 4) as f64;
        csv.push_str(&format!(
            "2024-02-{:02} 12:00:00,{},{},{}\n",
            i + 1,
            x1,
            x2,
            -2.0 * x1 + 0.5 * x2 + 40.0
        ));
    }
    csv
}

pub fn parse_csv(content: &str) -> Dataset {
    let mut lines = content.lines();
    let headers: Vec<String> = lines
        .next()
        .unwrap_or_default()
        .split(',')
        .map(str::to_string)
        .collect();
    let records: Vec<Vec<String>> = lines
        .map(|l| l.split(',').map(str::to_string).collect())
        .collect();
    Dataset::from_records(&headers, &records).expect("fixture dataset is valid")
}

/// Writes an initial artifact, as the `train_model` binary would.
pub fn seed_model(model_path: &Path) {
    seed_model_with_solver(model_path, SolverKind::default());
}

pub fn seed_model_with_solver(model_path: &Path, solver: SolverKind) {
    let settings = FitSettings {
        solver,
        ..FitSettings::default()
    };
    let artifact = fit_artifact(&parse_csv(&price_csv(10)), &settings, None)
        .expect("seed fit succeeds");
    FsModelStore::new(model_path)
        .save(&artifact)
        .expect("seed save succeeds");
}
