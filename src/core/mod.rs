pub mod artifact;
pub mod engine;
pub mod forest;
pub mod predictor;
pub mod preprocess;
pub mod trainer;
pub mod tree;

pub use crate::domain::model::{Dataset, FeatureVector, PredictionResult};
pub use crate::domain::ports::{Classifier, Pipeline, Storage, TrainingSettings};
pub use crate::utils::error::Result;
