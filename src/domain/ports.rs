use crate::core::artifact::ModelArtifact;
use crate::core::forest::ForestParams;
use crate::domain::model::{Dataset, FeatureVector};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait TrainingSettings: Send + Sync {
    fn dataset_path(&self) -> &str;
    fn artifact_path(&self) -> &str;
    fn forest_params(&self) -> ForestParams;
}

/// Binary classifier over encoded passengers.
pub trait Classifier: Send + Sync {
    fn fit(&mut self, x: &[FeatureVector], y: &[bool]) -> Result<()>;

    /// Probability of the positive class.
    fn predict_proba(&self, x: &FeatureVector) -> Result<f64>;

    fn predict(&self, x: &FeatureVector) -> Result<bool> {
        Ok(self.predict_proba(x)? >= 0.5)
    }

    fn name(&self) -> &str {
        "classifier"
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Dataset>;
    async fn transform(&self, data: Dataset) -> Result<ModelArtifact>;
    async fn load(&self, artifact: ModelArtifact) -> Result<String>;
}
