use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::forest::RandomForest;
use crate::core::preprocess::FillValues;
use crate::domain::model::FEATURE_NAMES;
use crate::utils::error::{PredictorError, Result};

pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub rows: usize,
    pub positives: usize,
    pub training_accuracy: f64,
    pub oob_accuracy: Option<f64>,
    pub dropped_columns: Vec<String>,
    pub feature_importances: Vec<f64>,
}

/// Everything the service needs to reproduce training-time preprocessing
/// and inference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub feature_names: Vec<String>,
    pub fill_values: FillValues,
    pub forest: RandomForest,
    pub trained_at: DateTime<Utc>,
    pub training_summary: TrainingSummary,
}

impl ModelArtifact {
    pub fn new(fill_values: FillValues, forest: RandomForest, training_summary: TrainingSummary) -> Self {
        Self {
            format_version: ARTIFACT_FORMAT_VERSION,
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            fill_values,
            forest,
            trained_at: Utc::now(),
            training_summary,
        }
    }

    pub fn to_json_vec(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Decode and check an artifact. `source` only labels errors.
    pub fn from_json_slice(source: &str, bytes: &[u8]) -> Result<Self> {
        let artifact: Self = serde_json::from_slice(bytes)
            .map_err(|e| PredictorError::model_unavailable(source, format!("corrupt artifact: {}", e)))?;
        artifact.check(source)?;
        Ok(artifact)
    }

    fn check(&self, source: &str) -> Result<()> {
        if self.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(PredictorError::model_unavailable(
                source,
                format!(
                    "unsupported artifact format version {} (expected {})",
                    self.format_version, ARTIFACT_FORMAT_VERSION
                ),
            ));
        }

        if self.feature_names.iter().map(String::as_str).ne(FEATURE_NAMES) {
            return Err(PredictorError::model_unavailable(
                source,
                format!(
                    "feature order {:?} does not match {:?}",
                    self.feature_names, FEATURE_NAMES
                ),
            ));
        }

        if !self.forest.is_fitted() {
            return Err(PredictorError::model_unavailable(source, "forest has no fitted trees"));
        }

        let fill = &self.fill_values;
        if !fill.age_median.is_finite() || !fill.fare_median.is_finite() {
            return Err(PredictorError::model_unavailable(source, "fill values are not finite"));
        }

        Ok(())
    }
}
