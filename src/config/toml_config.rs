use crate::core::forest::{ForestParams, MaxFeatures};
use crate::utils::error::{PredictorError, Result};
use crate::utils::validation::{validate_path, validate_port, validate_positive_number, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_DATASET_PATH: &str = "data/train.csv";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    #[serde(default)]
    pub training: TrainingSection,
    #[serde(default)]
    pub server: ServerSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrainingSection {
    pub dataset_path: Option<String>,
    pub artifact_path: Option<String>,
    pub n_estimators: Option<usize>,
    pub random_seed: Option<u64>,
    pub max_depth: Option<usize>,
    pub min_samples_split: Option<usize>,
    pub min_samples_leaf: Option<usize>,
    pub max_features: Option<MaxFeatures>,
    pub bootstrap: Option<bool>,
    pub monitor: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub artifact_path: Option<String>,
    pub log_json: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置並驗證
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        let config = Self::from_toml_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PredictorError::Config {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${MODEL_PATH})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| PredictorError::Config {
            field: "toml_parsing".to_string(),
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Forest parameters with unset keys at their defaults.
    pub fn forest_params(&self) -> ForestParams {
        let defaults = ForestParams::default();
        let t = &self.training;
        ForestParams {
            n_estimators: t.n_estimators.unwrap_or(defaults.n_estimators),
            random_seed: t.random_seed.unwrap_or(defaults.random_seed),
            max_depth: t.max_depth.or(defaults.max_depth),
            min_samples_split: t.min_samples_split.unwrap_or(defaults.min_samples_split),
            min_samples_leaf: t.min_samples_leaf.unwrap_or(defaults.min_samples_leaf),
            max_features: t.max_features.unwrap_or(defaults.max_features),
            bootstrap: t.bootstrap.unwrap_or(defaults.bootstrap),
        }
    }
}

/// Shared checks for resolved training parameters.
pub fn validate_forest_params(params: &ForestParams) -> Result<()> {
    validate_positive_number("training.n_estimators", params.n_estimators, 1)?;
    validate_positive_number("training.min_samples_split", params.min_samples_split, 2)?;
    validate_positive_number("training.min_samples_leaf", params.min_samples_leaf, 1)?;
    if let Some(depth) = params.max_depth {
        validate_positive_number("training.max_depth", depth, 1)?;
    }
    if let MaxFeatures::Fixed(n) = params.max_features {
        validate_positive_number("training.max_features", n, 1)?;
    }
    Ok(())
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        let paths = [
            ("training.dataset_path", &self.training.dataset_path),
            ("training.artifact_path", &self.training.artifact_path),
            ("server.artifact_path", &self.server.artifact_path),
        ];
        for (field, path) in paths {
            if let Some(path) = path {
                validate_path(field, path)?;
            }
        }
        if let Some(port) = self.server.port {
            validate_port("server.port", port)?;
        }
        validate_forest_params(&self.forest_params())
    }
}
