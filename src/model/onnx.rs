//! ONNX Runtime classifier. Input: [rows, features] f32. Output: one label per row,
//! either an int64 label tensor or f32 class scores reduced by argmax.
//! The feature contract comes from the model's manifest.

use super::{Classifier, ModelManifest};
use crate::error::{PipelineError, Result};
use crate::features::{AlignedMatrix, Vocabulary};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use std::path::Path;
use std::sync::Mutex;

pub struct OnnxClassifier {
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
    manifest: ModelManifest,
}

impl OnnxClassifier {
    /// Load model and manifest. Either one missing or invalid is a model error.
    pub fn load(model_path: &Path, manifest_path: &Path) -> Result<Self> {
        if !model_path.exists() {
            return Err(PipelineError::model(format!(
                "ONNX model not found: {}",
                model_path.display()
            )));
        }
        let manifest = ModelManifest::load(manifest_path)?;

        let session = Session::builder()
            .map_err(|e| PipelineError::model(format!("session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| PipelineError::model(format!("optimization level: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| PipelineError::model(format!("failed to load {}: {}", model_path.display(), e)))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "input".to_string());
        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| PipelineError::model("model declares no outputs"))?;

        tracing::info!(
            path = %model_path.display(),
            features = manifest.feature_names.len(),
            digest = %manifest.contract_digest(),
            "ONNX classifier loaded"
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            output_name,
            manifest,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn feature_names(&self) -> &[String] {
        &self.manifest.feature_names
    }

    fn vocabulary(&self) -> Option<&Vocabulary> {
        self.manifest.vocabulary.as_ref()
    }

    fn predict(&self, features: &AlignedMatrix) -> Result<Vec<i64>> {
        let rows = features.nrows();
        let input = Tensor::from_array(features.values().clone()).map_err(PipelineError::model)?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| PipelineError::model("session lock poisoned"))?;
        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input])
            .map_err(|e| PipelineError::model(format!("inference failed: {}", e)))?;
        let output = outputs
            .get(self.output_name.as_str())
            .ok_or_else(|| PipelineError::model(format!("missing output `{}`", self.output_name)))?;

        if let Ok((_, labels)) = output.try_extract_tensor::<i64>() {
            return labels_per_row(labels.to_vec(), rows);
        }
        let (_, scores) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| PipelineError::model(format!("unsupported output tensor: {}", e)))?;
        scores_to_labels(scores, rows)
    }
}

fn labels_per_row(labels: Vec<i64>, rows: usize) -> Result<Vec<i64>> {
    if labels.len() != rows {
        return Err(PipelineError::model(format!(
            "model returned {} labels for {} rows",
            labels.len(),
            rows
        )));
    }
    Ok(labels)
}

/// `[rows]` scores are rounded, `[rows, classes]` scores take the argmax.
fn scores_to_labels(scores: &[f32], rows: usize) -> Result<Vec<i64>> {
    if rows == 0 || scores.len() % rows != 0 {
        return Err(PipelineError::model(format!(
            "model returned {} scores for {} rows",
            scores.len(),
            rows
        )));
    }
    let classes = scores.len() / rows;
    if classes == 1 {
        return Ok(scores.iter().map(|s| s.round() as i64).collect());
    }
    Ok(scores
        .chunks(classes)
        .map(|row| {
            row.iter()
                .enumerate()
                .fold((0usize, f32::NEG_INFINITY), |best, (i, &s)| {
                    if s > best.1 {
                        (i, s)
                    } else {
                        best
                    }
                })
                .0 as i64
        })
        .collect())
}
