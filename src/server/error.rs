//! HTTP mapping for `PredictorError`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::utils::error::PredictorError;

impl PredictorError {
    /// Stable machine-readable tag for API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation",
            Self::InvalidCategory { .. } => "invalid_category",
            Self::DataFormat { .. } | Self::MissingColumn { .. } | Self::Csv(_) => "data_format",
            Self::ModelUnavailable { .. } => "model_unavailable",
            Self::Training { .. } => "training",
            Self::Io(_) => "io",
            Self::Serialization(_) => "serialization",
            Self::Config { .. } => "config",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            _ if self.is_client_error() => StatusCode::BAD_REQUEST,
            Self::ModelUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for PredictorError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let kind = self.kind();
        let message = if status.is_server_error() {
            tracing::error!(detail = %self, kind, "Request failed");
            match &self {
                PredictorError::ModelUnavailable { .. } => "Model is not available".to_string(),
                _ => "An internal error occurred".to_string(),
            }
        } else {
            tracing::debug!(detail = %self, "Rejected request");
            self.to_string()
        };

        let body = Json(json!({
            "error": true,
            "kind": kind,
            "message": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_follow_category() {
        assert_eq!(
            PredictorError::validation("Age", "out of range").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            PredictorError::invalid_category("Embarked", "X").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            PredictorError::model_unavailable("m.json", "missing").status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            PredictorError::data_format("bad").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_kind_tags() {
        assert_eq!(PredictorError::invalid_category("Sex", "x").kind(), "invalid_category");
        assert_eq!(PredictorError::validation("Pclass", "x").kind(), "validation");
    }
}
