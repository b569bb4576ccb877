mod common;

use common::{TestDir, price_csv, seed_model, seed_model_with_solver, shifted_price_csv};
use pricecast::application::ml::{FitSettings, PredictionService, TrainingPipeline};
use pricecast::domain::errors::{
    DatasetFormatError, ModelLoadError, PredictionError, PredictionInputError, TrainingError,
};
use pricecast::domain::ml::SolverKind;
use pricecast::domain::ports::ModelStore;
use pricecast::infrastructure::FsModelStore;
use std::fs;
use std::sync::Arc;

fn services(dir: &TestDir) -> (Arc<FsModelStore>, TrainingPipeline, PredictionService) {
    let store = Arc::new(FsModelStore::new(dir.join("models/price-model.json")));
    let pipeline = TrainingPipeline::new(store.clone(), FitSettings::default());
    let predictor = PredictionService::new(store.clone(), false);
    (store, pipeline, predictor)
}

#[test]
fn test_retrain_then_predict_scenario() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_test_writer()
        .try_init();

    let dir = TestDir::new("flow");
    let (store, pipeline, predictor) = services(&dir);
    seed_model(store.location());

    let dataset = dir.write("prices.csv", &price_csv(10));
    let artifact_path = pipeline.retrain(&dataset).expect("retrain succeeds");
    assert_eq!(artifact_path, store.location());

    let prediction = predictor.predict(&[2.0, 3.0]).expect("prediction succeeds");
    assert!(prediction.is_finite());
}

#[test]
fn test_retrain_advances_generation_and_records_evaluation() {
    let dir = TestDir::new("generation");
    let (store, pipeline, _) = services(&dir);
    seed_model(store.location());
    assert_eq!(store.load().unwrap().generation, 0);

    let dataset = dir.write("prices.csv", &shifted_price_csv(20));
    let report = pipeline.retrain_with_report(&dataset).unwrap();

    assert_eq!(report.generation, 1);
    assert_eq!(report.training_rows, 16);
    let eval = report.evaluation.expect("held-out rows are scored");
    assert_eq!(eval.rows, 4);
    assert!(eval.rmse < 1e-6);

    let artifact = store.load().unwrap();
    assert_eq!(artifact.generation, 1);
    assert_eq!(artifact.target_column, "Price");
}

#[test]
fn test_retrain_replaces_model_behaviour() {
    let dir = TestDir::new("replace");
    let (store, pipeline, predictor) = services(&dir);
    seed_model(store.location());

    let before = predictor.predict(&[1.0, 1.0]).unwrap();
    pipeline
        .retrain(&dir.write("shifted.csv", &shifted_price_csv(12)))
        .unwrap();
    let after = predictor.predict(&[1.0, 1.0]).unwrap();

    assert!((before - after).abs() > 1e-6);
}

#[test]
fn test_missing_date_leaves_model_untouched() {
    let dir = TestDir::new("nodate");
    let (store, pipeline, _) = services(&dir);
    seed_model(store.location());
    let original = fs::read(store.location()).unwrap();

    let dataset = dir.write("bad.csv", "X1,X2,Price\n1,2,3\n4,5,6\n");
    let err = pipeline.retrain(&dataset).unwrap_err();

    assert!(matches!(
        err,
        TrainingError::Dataset(DatasetFormatError::MissingDateColumn)
    ));
    assert_eq!(err.to_string(), "missing Date column");
    assert_eq!(fs::read(store.location()).unwrap(), original);
}

#[test]
fn test_unparseable_date_is_dataset_error() {
    let dir = TestDir::new("baddate");
    let (store, pipeline, _) = services(&dir);
    seed_model(store.location());

    let dataset = dir.write("bad.csv", "Date,X1,Price\n2024-01-01,1,3\nsoon,2,4\n");
    let err = pipeline.retrain(&dataset).unwrap_err();
    assert!(matches!(
        err,
        TrainingError::Dataset(DatasetFormatError::InvalidDate { row: 2, .. })
    ));
}

#[test]
fn test_retrain_requires_existing_model() {
    let dir = TestDir::new("nobase");
    let (store, pipeline, _) = services(&dir);

    let dataset = dir.write("prices.csv", &price_csv(10));
    let err = pipeline.retrain(&dataset).unwrap_err();

    assert!(matches!(
        err,
        TrainingError::ModelLoad(ModelLoadError::NotFound { .. })
    ));
    assert!(!store.location().exists());
}

#[test]
fn test_retrain_is_deterministic() {
    let dir_a = TestDir::new("determ_a");
    let dir_b = TestDir::new("determ_b");
    let (store_a, pipeline_a, predictor_a) = services(&dir_a);
    let (store_b, pipeline_b, predictor_b) = services(&dir_b);
    seed_model(store_a.location());
    seed_model(store_b.location());

    let csv = shifted_price_csv(25);
    pipeline_a.retrain(&dir_a.write("d.csv", &csv)).unwrap();
    pipeline_b.retrain(&dir_b.write("d.csv", &csv)).unwrap();

    let a = store_a.load().unwrap();
    let b = store_b.load().unwrap();
    assert_eq!(a.scaler, b.scaler);
    assert_eq!(a.evaluation, b.evaluation);
    assert_eq!(
        predictor_a.predict(&[3.0, 1.0]).unwrap(),
        predictor_b.predict(&[3.0, 1.0]).unwrap()
    );
}

#[test]
fn test_predict_wrong_length_is_input_error() {
    let dir = TestDir::new("shape");
    let (store, _, predictor) = services(&dir);
    seed_model(store.location());

    let err = predictor.predict(&[1.0, 2.0, 3.0]).unwrap_err();
    assert!(matches!(
        err,
        PredictionError::Input(PredictionInputError::ShapeMismatch {
            expected: 2,
            actual: 3
        })
    ));
}

#[test]
fn test_predict_without_model_is_load_error() {
    let dir = TestDir::new("nomodel");
    let (_, _, predictor) = services(&dir);

    let err = predictor.predict(&[1.0, 2.0]).unwrap_err();
    assert!(matches!(
        err,
        PredictionError::ModelLoad(ModelLoadError::NotFound { .. })
    ));
}

#[test]
fn test_tiny_datasets_fail_without_touching_model() {
    let dir = TestDir::new("tiny");
    let (store, pipeline, _) = services(&dir);
    seed_model(store.location());
    let original = fs::read(store.location()).unwrap();

    for rows in [1, 2, 3] {
        let dataset = dir.write(&format!("tiny_{}.csv", rows), &price_csv(rows));
        let err = pipeline.retrain(&dataset).unwrap_err();
        assert!(
            matches!(
                err,
                TrainingError::Dataset(
                    DatasetFormatError::EmptyTrainingSet { .. }
                        | DatasetFormatError::TooFewTrainingRows { .. }
                )
            ),
            "{} rows: {}",
            rows,
            err
        );
        assert_eq!(fs::read(store.location()).unwrap(), original);
    }
}

#[test]
fn test_qr_model_rejects_constant_feature() {
    let dir = TestDir::new("qr_constant");
    let (store, pipeline, _) = services(&dir);
    seed_model_with_solver(store.location(), SolverKind::Qr);
    let original = fs::read(store.location()).unwrap();

    let mut csv = String::from("Date,X1,X2,Price\n");
    for i in 0..12 {
        csv.push_str(&format!("2024-03-{:02},{},7,{}\n", i + 1, i, 2 * i + 1));
    }
    let err = pipeline.retrain(&dir.write("constant.csv", &csv)).unwrap_err();

    assert!(matches!(err, TrainingError::Fit { .. }), "{}", err);
    assert_eq!(fs::read(store.location()).unwrap(), original);
}

#[test]
fn test_svd_model_fits_constant_feature() {
    let dir = TestDir::new("svd_constant");
    let (store, pipeline, predictor) = services(&dir);
    seed_model(store.location());

    let mut csv = String::from("Date,X1,X2,Price\n");
    for i in 0..12 {
        csv.push_str(&format!("2024-03-{:02},{},7,{}\n", i + 1, i, 2 * i + 1));
    }
    pipeline.retrain(&dir.write("constant.csv", &csv)).unwrap();

    assert_eq!(store.load().unwrap().generation, 1);
    assert!(predictor.predict(&[3.0, 7.0]).unwrap().is_finite());
}
