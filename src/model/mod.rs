//! Trained classifier boundary: feature contract plus batch prediction.

mod manifest;
mod onnx;

pub use manifest::ModelManifest;
pub use onnx::OnnxClassifier;

use crate::error::Result;
use crate::features::{AlignedMatrix, Vocabulary};

/// A loaded, read-only classifier. Implementations must not keep per-call state,
/// so one instance can serve concurrent runs.
pub trait Classifier: Send + Sync {
    /// Ordered feature names the model was fitted on.
    fn feature_names(&self) -> &[String];

    /// Category vocabulary fitted alongside the model, if it was persisted.
    fn vocabulary(&self) -> Option<&Vocabulary> {
        None
    }

    /// One label per row, in row order.
    fn predict(&self, features: &AlignedMatrix) -> Result<Vec<i64>>;
}
