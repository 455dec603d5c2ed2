use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::{json, Value};

use super::state::AppState;
use crate::domain::model::PredictionResult;
use crate::domain::request::PassengerRequest;
use crate::utils::error::{PredictorError, Result};

pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<PassengerRequest>, JsonRejection>,
) -> Result<Json<PredictionResult>> {
    // 格式錯誤的 JSON 也回 400，統一錯誤格式
    let Json(request) = payload.map_err(|rejection| PredictorError::validation("body", rejection.body_text()))?;

    let result = state.predictor.predict(&request)?;
    tracing::debug!(
        survived = result.survived,
        probability = result.probability,
        "Prediction served"
    );
    Ok(Json(result))
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let artifact = state.predictor.artifact();
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": chrono::Utc::now()
            .signed_duration_since(state.started_at)
            .num_seconds(),
        "model": {
            "trained_at": artifact.trained_at.to_rfc3339(),
            "n_estimators": artifact.forest.n_trees(),
            "training_rows": artifact.training_summary.rows,
            "oob_accuracy": artifact.training_summary.oob_accuracy,
            "feature_names": artifact.feature_names,
        },
    }))
}
