//! Feature pipeline: raw table → derived fields → selected columns → one-hot encoded table.

use super::derive::derive_fields;
use super::encoder::{OneHotEncoder, Vocabulary};
use super::schema::ATTACK_TYPE_NUMERIC;
use super::select::select_features;
use crate::config::FeaturesConfig;
use crate::dataset::Table;
use crate::error::Result;

/// Output of the feature stages for one batch.
#[derive(Debug, Clone)]
pub struct PreparedBatch {
    /// Encoded features, one row per deduplicated input row
    pub encoded: Table,
    /// Attack code per row; `None` for labels outside the known classes
    pub ground_truth: Vec<Option<i64>>,
    /// Vocabulary used for this batch (fitted here unless one was supplied)
    pub vocabulary: Vocabulary,
}

pub struct FeaturePipeline {
    config: FeaturesConfig,
}

impl FeaturePipeline {
    pub fn new(config: FeaturesConfig) -> Self {
        Self { config }
    }

    /// Run every feature stage. With `vocabulary` the encoder only transforms;
    /// without it the vocabulary is fitted on this batch.
    pub fn prepare(&self, raw: &Table, vocabulary: Option<&Vocabulary>) -> Result<PreparedBatch> {
        let derived = derive_fields(raw)?;
        let ground_truth: Vec<Option<i64>> = derived
            .column(ATTACK_TYPE_NUMERIC)
            .map(|col| col.into_iter().map(|v| v.as_i64()).collect())
            .unwrap_or_default();

        let selected = select_features(&derived, &self.config.selected_columns)?;
        let (encoder, encoded) = match vocabulary {
            Some(v) => {
                let encoder = OneHotEncoder::from_vocabulary(v.clone());
                let encoded = encoder.transform(&selected)?;
                (encoder, encoded)
            }
            None => OneHotEncoder::fit_transform(&selected, &self.config.categorical_columns)?,
        };
        tracing::info!(
            rows = encoded.len(),
            columns = encoded.width(),
            persisted_vocabulary = vocabulary.is_some(),
            "features encoded"
        );

        Ok(PreparedBatch {
            encoded,
            ground_truth,
            vocabulary: encoder.vocabulary().clone(),
        })
    }
}
