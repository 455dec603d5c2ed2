#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

pub use toml_config::TomlConfig;

use crate::core::forest::ForestParams;
use crate::core::TrainingSettings;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, Validate};

/// Fully resolved settings for one training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingConfig {
    pub dataset_path: String,
    pub artifact_path: String,
    pub forest: ForestParams,
    pub monitor: bool,
}

impl TrainingSettings for TrainingConfig {
    fn dataset_path(&self) -> &str {
        &self.dataset_path
    }

    fn artifact_path(&self) -> &str {
        &self.artifact_path
    }

    fn forest_params(&self) -> ForestParams {
        self.forest
    }
}

impl Validate for TrainingConfig {
    fn validate(&self) -> Result<()> {
        validate_path("dataset", &self.dataset_path)?;
        validate_path("artifact", &self.artifact_path)?;
        toml_config::validate_forest_params(&self.forest)
    }
}
