//! End-to-end run: raw table + classifier → predictions table + metrics.

use crate::config::FeaturesConfig;
use crate::dataset::{Table, Value};
use crate::error::Result;
use crate::evaluate::{evaluate, Metrics};
use crate::features::schema::PREDICTIONS;
use crate::features::{align, FeaturePipeline};
use crate::model::{Classifier, ModelManifest};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Everything a run hands back to its caller.
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// Aligned feature columns plus the prediction column
    pub predictions: Table,
    pub metrics: Metrics,
    pub summary: RunSummary,
}

/// Serializable run record: metrics plus what the aligner had to do.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: String,
    pub finished_at: DateTime<Utc>,
    pub rows: usize,
    pub contract_digest: String,
    /// Contract names zero-filled because the batch did not produce them
    pub missing_features: Vec<String>,
    /// Encoded columns the contract does not name
    pub dropped_features: Vec<String>,
    pub metrics: Metrics,
}

pub struct InferencePipeline {
    features: FeaturePipeline,
}

impl InferencePipeline {
    pub fn new(config: FeaturesConfig) -> Self {
        Self {
            features: FeaturePipeline::new(config),
        }
    }

    /// Run all stages. Nothing is returned unless every stage succeeds.
    pub fn run(&self, raw: &Table, model: &dyn Classifier) -> Result<RunOutput> {
        let run_id = Uuid::new_v4().to_string();
        let span = tracing::info_span!("run", run_id = %run_id);
        let _enter = span.enter();

        let batch = self.features.prepare(raw, model.vocabulary())?;
        let contract = model.feature_names();
        let alignment = align(&batch.encoded, contract)?;

        let labels = model.predict(&alignment.matrix)?;
        let metrics = evaluate(&batch.ground_truth, &labels)?;

        let mut predictions = alignment.matrix.to_table();
        predictions.set_column(PREDICTIONS, labels.iter().map(|&l| Value::number(l as f64)).collect())?;

        tracing::info!(
            rows = predictions.len(),
            accuracy = metrics.accuracy,
            f1 = metrics.f1,
            "run complete"
        );

        let summary = RunSummary {
            run_id,
            finished_at: Utc::now(),
            rows: predictions.len(),
            contract_digest: ModelManifest::new(contract.to_vec()).contract_digest(),
            missing_features: alignment.missing,
            dropped_features: alignment.dropped,
            metrics: metrics.clone(),
        };
        Ok(RunOutput {
            predictions,
            metrics,
            summary,
        })
    }
}
