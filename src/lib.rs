//! Attack-type inference over network-traffic logs.
//!
//! Modular structure:
//! - [`dataset`] — Typed in-memory table, CSV input/output
//! - [`features`] — Field derivation, selection, one-hot encoding, contract alignment
//! - [`model`] — Classifier trait, model manifest, ONNX inference
//! - [`evaluate`] — Weighted accuracy/precision/recall/F1
//! - [`inference`] — End-to-end run
//! - [`logging`] — Structured JSON logging

pub mod config;
pub mod dataset;
pub mod error;
pub mod evaluate;
pub mod features;
pub mod inference;
pub mod logging;
pub mod model;

pub use config::PipelineConfig;
pub use dataset::{Table, Value};
pub use error::{PipelineError, Result};
pub use evaluate::Metrics;
pub use features::{AlignedMatrix, FeaturePipeline, OneHotEncoder, Vocabulary};
pub use inference::{InferencePipeline, RunOutput, RunSummary};
pub use logging::StructuredLogger;
pub use model::{Classifier, ModelManifest, OnnxClassifier};
