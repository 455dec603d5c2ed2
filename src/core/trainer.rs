use crate::adapters::dataset::read_dataset;
use crate::core::artifact::{ModelArtifact, TrainingSummary};
use crate::core::forest::{ForestParams, RandomForest};
use crate::core::preprocess::Preprocessor;
use crate::domain::model::{Dataset, FeatureVector};
use crate::domain::ports::{Classifier, Pipeline, Storage, TrainingSettings};
use crate::utils::error::{PredictorError, Result};

/// Fit preprocessing and the forest on a dataset and package the result.
pub fn fit_artifact(dataset: Dataset, params: ForestParams) -> Result<ModelArtifact> {
    if dataset.is_empty() {
        return Err(PredictorError::data_format("dataset contains no rows"));
    }

    let preprocessor = Preprocessor::fit(dataset.records.iter().map(|r| &r.passenger))?;
    let x: Vec<FeatureVector> = dataset
        .records
        .iter()
        .map(|r| preprocessor.transform(&r.passenger))
        .collect();
    let y: Vec<bool> = dataset.records.iter().map(|r| r.survived).collect();

    let mut forest = RandomForest::new(params);
    forest.fit(&x, &y)?;
    tracing::debug!(model = forest.name(), trees = forest.n_trees(), "Fitted classifier");

    let correct = x
        .iter()
        .zip(&y)
        .map(|(sample, label)| forest.predict(sample).map(|p| p == *label))
        .collect::<Result<Vec<bool>>>()?
        .into_iter()
        .filter(|&hit| hit)
        .count();
    let training_accuracy = correct as f64 / x.len() as f64;

    let summary = TrainingSummary {
        rows: dataset.len(),
        positives: dataset.positives(),
        training_accuracy,
        oob_accuracy: forest.oob_accuracy(),
        dropped_columns: dataset.dropped_columns,
        feature_importances: forest.feature_importances().to_vec(),
    };

    Ok(ModelArtifact::new(*preprocessor.fill_values(), forest, summary))
}

pub struct TrainingPipeline<S: Storage, C: TrainingSettings> {
    storage: S,
    config: C,
}

impl<S: Storage, C: TrainingSettings> TrainingPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: TrainingSettings> Pipeline for TrainingPipeline<S, C> {
    async fn extract(&self) -> Result<Dataset> {
        tracing::debug!("Reading dataset from: {}", self.config.dataset_path());
        let bytes = self.storage.read_file(self.config.dataset_path()).await?;
        let dataset = read_dataset(&bytes)?;

        tracing::info!(
            rows = dataset.len(),
            positives = dataset.positives(),
            dropped = ?dataset.dropped_columns,
            "Dataset loaded"
        );
        Ok(dataset)
    }

    async fn transform(&self, data: Dataset) -> Result<ModelArtifact> {
        let params = self.config.forest_params();
        tracing::debug!(?params, "Fitting random forest");

        // CPU 密集，移出 async runtime
        tokio::task::spawn_blocking(move || fit_artifact(data, params))
            .await
            .map_err(|e| PredictorError::Training {
                message: format!("training task failed: {}", e),
            })?
    }

    async fn load(&self, artifact: ModelArtifact) -> Result<String> {
        let output_path = self.config.artifact_path().to_string();
        let bytes = artifact.to_json_vec()?;

        tracing::debug!("Writing artifact ({} bytes) to {}", bytes.len(), output_path);
        self.storage.write_file(&output_path, &bytes).await?;

        Ok(output_path)
    }
}
