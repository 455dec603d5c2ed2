use crate::core::artifact::ModelArtifact;
use crate::core::preprocess::Preprocessor;
use crate::domain::model::{PassengerRecord, PredictionResult};
use crate::domain::ports::{Classifier, Storage};
use crate::domain::request::PassengerRequest;
use crate::utils::error::{PredictorError, Result};

/// Loaded, read-only model. Built once at startup and shared by every request.
#[derive(Debug)]
pub struct Predictor {
    artifact: ModelArtifact,
    preprocessor: Preprocessor,
    source: String,
}

impl Predictor {
    pub fn from_artifact(artifact: ModelArtifact, source: impl Into<String>) -> Self {
        let preprocessor = Preprocessor::from_fill_values(artifact.fill_values);
        Self {
            artifact,
            preprocessor,
            source: source.into(),
        }
    }

    /// Read and decode the artifact at `path`. Any failure is reported as
    /// `ModelUnavailable`; the raw bytes are dropped once decoded.
    pub async fn load<S: Storage>(storage: &S, path: &str) -> Result<Self> {
        let artifact = {
            let bytes = storage
                .read_file(path)
                .await
                .map_err(|e| PredictorError::model_unavailable(path, e))?;
            ModelArtifact::from_json_slice(path, &bytes)?
        };

        tracing::info!(
            artifact = %path,
            trained_at = %artifact.trained_at,
            n_trees = artifact.forest.n_trees(),
            training_rows = artifact.training_summary.rows,
            "Model artifact loaded"
        );
        Ok(Self::from_artifact(artifact, path))
    }

    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn predict(&self, request: &PassengerRequest) -> Result<PredictionResult> {
        let record = request.to_record()?;
        self.predict_record(&record)
    }

    pub fn predict_record(&self, record: &PassengerRecord) -> Result<PredictionResult> {
        let features = self.preprocessor.transform(record);
        let probability = self.artifact.forest.predict_proba(&features)?;
        Ok(PredictionResult {
            survived: probability >= 0.5,
            probability,
        })
    }
}
