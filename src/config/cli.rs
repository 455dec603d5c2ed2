use crate::config::toml_config::{TomlConfig, DEFAULT_DATASET_PATH};
use crate::config::TrainingConfig;
use crate::server::{ServerConfig, DEFAULT_ARTIFACT_PATH, DEFAULT_HOST, DEFAULT_PORT};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "titanic-predictor")]
#[command(version, about = "Train and serve a Titanic survival random forest")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Fit the forest on a labeled CSV and write the model artifact
    Train(TrainArgs),
    /// Serve predictions over HTTP from a trained artifact
    Serve(ServeArgs),
}

#[derive(Debug, Clone, Args)]
pub struct TrainArgs {
    #[arg(long, help = "Labeled training CSV [default: data/train.csv]")]
    pub dataset: Option<String>,

    #[arg(long, env = "MODEL_PATH", help = "Artifact output path [default: models/titanic_model.json]")]
    pub artifact: Option<String>,

    #[arg(long, help = "Number of trees [default: 100]")]
    pub n_estimators: Option<usize>,

    #[arg(long, help = "Random seed [default: 42]")]
    pub seed: Option<u64>,

    #[arg(long, help = "Maximum tree depth (unbounded when omitted)")]
    pub max_depth: Option<usize>,

    #[arg(long, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Log CPU and memory usage per stage")]
    pub monitor: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl TrainArgs {
    /// Flags override the config file; the config file overrides defaults.
    pub fn resolve(&self) -> Result<TrainingConfig> {
        let file = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        let mut forest = file.forest_params();
        if let Some(n) = self.n_estimators {
            forest.n_estimators = n;
        }
        if let Some(seed) = self.seed {
            forest.random_seed = seed;
        }
        if self.max_depth.is_some() {
            forest.max_depth = self.max_depth;
        }

        Ok(TrainingConfig {
            dataset_path: self
                .dataset
                .clone()
                .or(file.training.dataset_path)
                .unwrap_or_else(|| DEFAULT_DATASET_PATH.to_string()),
            artifact_path: self
                .artifact
                .clone()
                .or(file.training.artifact_path)
                .unwrap_or_else(|| DEFAULT_ARTIFACT_PATH.to_string()),
            forest,
            monitor: self.monitor || file.training.monitor.unwrap_or(false),
        })
    }
}

#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    #[arg(long, env = "MODEL_PATH", help = "Trained artifact [default: models/titanic_model.json]")]
    pub artifact: Option<String>,

    #[arg(long, help = "Bind address [default: 0.0.0.0]")]
    pub host: Option<String>,

    #[arg(long, env = "PORT", help = "Listen port [default: 8000]")]
    pub port: Option<u16>,

    #[arg(long, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl ServeArgs {
    pub fn resolve(&self) -> Result<(ServerConfig, bool)> {
        let file = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        let config = ServerConfig {
            host: self
                .host
                .clone()
                .or(file.server.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: self.port.or(file.server.port).unwrap_or(DEFAULT_PORT),
            artifact_path: self
                .artifact
                .clone()
                .or(file.server.artifact_path)
                .unwrap_or_else(|| DEFAULT_ARTIFACT_PATH.to_string()),
        };
        config.validate()?;
        let log_json = self.log_json || file.server.log_json.unwrap_or(false);

        Ok((config, log_json))
    }
}
