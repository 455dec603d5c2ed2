pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::{Cli, Command};
pub use config::{TomlConfig, TrainingConfig};

pub use adapters::LocalStorage;
pub use core::{
    engine::{TrainingEngine, TrainingReport},
    predictor::Predictor,
    trainer::TrainingPipeline,
};
pub use domain::request::PassengerRequest;
pub use server::{create_router, run_server, AppState, ServerConfig};
pub use utils::error::{PredictorError, Result};
