#![allow(dead_code)]

use std::path::Path;

use titanic_predictor::core::forest::ForestParams;
use titanic_predictor::{
    LocalStorage, Predictor, TrainingConfig, TrainingEngine, TrainingPipeline, TrainingReport,
};

pub const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/titanic_sample.csv");

pub fn training_config(dataset: &str, seed: u64) -> TrainingConfig {
    TrainingConfig {
        dataset_path: dataset.to_string(),
        artifact_path: "models/titanic_model.json".to_string(),
        forest: ForestParams {
            random_seed: seed,
            ..ForestParams::default()
        },
        monitor: false,
    }
}

/// Train on the fixture inside `dir`, returning the run report.
pub async fn train_fixture(dir: &Path, seed: u64) -> TrainingReport {
    let pipeline = TrainingPipeline::new(LocalStorage::new(dir), training_config(FIXTURE, seed));
    TrainingEngine::new(pipeline).run().await.unwrap()
}

pub async fn trained_predictor(dir: &Path) -> Predictor {
    let report = train_fixture(dir, 42).await;
    Predictor::load(&LocalStorage::new(dir), &report.artifact_path)
        .await
        .unwrap()
}
