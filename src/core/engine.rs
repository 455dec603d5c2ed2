use std::time::Instant;

use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::ResourceMonitor;

/// Outcome of one training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    pub artifact_path: String,
    pub rows: usize,
    pub positives: usize,
    pub training_accuracy: f64,
    pub oob_accuracy: Option<f64>,
}

pub struct TrainingEngine<P: Pipeline> {
    pipeline: P,
    monitor: ResourceMonitor,
}

impl<P: Pipeline> TrainingEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: ResourceMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<TrainingReport> {
        tracing::info!("🚀 Starting training run");

        let stage = Instant::now();
        let dataset = self.pipeline.extract().await?;
        self.monitor.log_stage("extract", stage.elapsed());
        tracing::info!("📥 Loaded {} labeled passengers", dataset.len());

        let stage = Instant::now();
        let artifact = self.pipeline.transform(dataset).await?;
        self.monitor.log_stage("train", stage.elapsed());

        let summary = artifact.training_summary.clone();
        tracing::info!(
            trees = artifact.forest.n_trees(),
            training_accuracy = summary.training_accuracy,
            oob_accuracy = ?summary.oob_accuracy,
            "🌲 Forest trained"
        );

        let stage = Instant::now();
        let artifact_path = self.pipeline.load(artifact).await?;
        self.monitor.log_stage("persist", stage.elapsed());
        tracing::info!("💾 Artifact saved to: {}", artifact_path);

        self.monitor.log_final();

        Ok(TrainingReport {
            artifact_path,
            rows: summary.rows,
            positives: summary.positives,
            training_accuracy: summary.training_accuracy,
            oob_accuracy: summary.oob_accuracy,
        })
    }
}
