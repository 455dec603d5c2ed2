use crate::core::predictor::Predictor;

/// Shared, read-only handler state.
#[derive(Debug)]
pub struct AppState {
    pub predictor: Predictor,
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    pub fn new(predictor: Predictor) -> Self {
        Self {
            predictor,
            started_at: chrono::Utc::now(),
        }
    }
}
