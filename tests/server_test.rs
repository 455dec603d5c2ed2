//! Real-socket tests: artifact loading at startup and HTTP over TCP.

mod common;

use std::sync::Arc;

use serde_json::{json, Value};
use tempfile::TempDir;
use titanic_predictor::{create_router, AppState, LocalStorage, Predictor, PredictorError};

#[tokio::test]
async fn test_predict_over_tcp() {
    let dir = TempDir::new().unwrap();
    let predictor = common::trained_predictor(dir.path()).await;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = create_router(Arc::new(AppState::new(predictor)));
    let server = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{}/predict", addr))
        .json(&json!({
            "Pclass": 1,
            "Sex": "female",
            "Age": 29,
            "SibSp": 0,
            "Parch": 0,
            "Fare": 211.3,
            "Embarked": "S"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["survived"], 1);

    let response = client
        .post(format!("http://{}/predict", addr))
        .json(&json!({"Pclass": 2, "Sex": "male", "SibSp": 0, "Parch": 0, "Embarked": "X"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

    server.abort();
}

#[tokio::test]
async fn test_load_missing_artifact_is_model_unavailable() {
    let dir = TempDir::new().unwrap();
    let err = Predictor::load(&LocalStorage::new(dir.path()), "missing.json")
        .await
        .unwrap_err();
    assert!(matches!(err, PredictorError::ModelUnavailable { .. }));
}

#[tokio::test]
async fn test_load_corrupt_artifact_is_model_unavailable() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("model.json"), b"{\"format_version\": 1").unwrap();

    let err = Predictor::load(&LocalStorage::new(dir.path()), "model.json")
        .await
        .unwrap_err();
    assert!(matches!(err, PredictorError::ModelUnavailable { ref path, .. } if path == "model.json"));
}

#[tokio::test]
async fn test_load_rejects_reordered_features() {
    let dir = TempDir::new().unwrap();
    let report = common::train_fixture(dir.path(), 42).await;

    let artifact_path = dir.path().join(&report.artifact_path);
    let mut artifact: Value = serde_json::from_slice(&std::fs::read(&artifact_path).unwrap()).unwrap();
    artifact["feature_names"]
        .as_array_mut()
        .unwrap()
        .swap(0, 1);
    std::fs::write(&artifact_path, serde_json::to_vec(&artifact).unwrap()).unwrap();

    let err = Predictor::load(&LocalStorage::new(dir.path()), &report.artifact_path)
        .await
        .unwrap_err();
    assert!(matches!(err, PredictorError::ModelUnavailable { .. }));
}
