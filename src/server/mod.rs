//! HTTP prediction service.
//!
//! The artifact is loaded once before the listener is bound; a service
//! without a model never starts.

mod api;
mod error;
mod handlers;
mod state;

pub use api::create_router;
pub use state::AppState;

use std::sync::Arc;

use tracing::{info, warn};

use crate::adapters::storage::LocalStorage;
use crate::core::predictor::Predictor;
use crate::utils::error::{PredictorError, Result};
use crate::utils::validation::{validate_path, validate_port, Validate};

pub const DEFAULT_ARTIFACT_PATH: &str = "models/titanic_model.json";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub artifact_path: String,
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(PredictorError::Config {
                field: "host".to_string(),
                message: "Host cannot be empty".to_string(),
            });
        }
        validate_port("port", self.port)?;
        validate_path("artifact", &self.artifact_path)
    }
}

/// Load the artifact, then serve until Ctrl-C.
pub async fn run_server(config: ServerConfig) -> Result<()> {
    let started_at = chrono::Utc::now();

    let predictor = Predictor::load(&LocalStorage::default(), &config.artifact_path).await?;
    let source = predictor.source().to_string();
    let state = Arc::new(AppState::new(predictor));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    let addr = listener.local_addr()?;
    info!(
        address = %addr,
        artifact = %source,
        pid = std::process::id(),
        "🚀 Prediction service listening"
    );
    info!(url = %format!("http://{}/predict", addr), "Prediction endpoint available");

    let shutdown_signal = async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
        let uptime = chrono::Utc::now().signed_duration_since(started_at);
        info!(
            uptime_secs = uptime.num_seconds(),
            "Shutdown signal received, stopping server gracefully"
        );
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shut down cleanly");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_server_refuses_missing_artifact() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            artifact_path: temp_dir
                .path()
                .join("absent.json")
                .to_string_lossy()
                .into_owned(),
        };

        let err = run_server(config).await.unwrap_err();
        assert!(matches!(err, PredictorError::ModelUnavailable { .. }));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_config_validation() {
        let mut config = ServerConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            artifact_path: DEFAULT_ARTIFACT_PATH.to_string(),
        };
        assert!(config.validate().is_ok());

        config.port = 0;
        assert!(matches!(config.validate(), Err(PredictorError::Config { ref field, .. }) if field == "port"));

        config.port = DEFAULT_PORT;
        config.artifact_path = " ".to_string();
        assert!(matches!(config.validate(), Err(PredictorError::Config { ref field, .. }) if field == "artifact"));
    }
}
