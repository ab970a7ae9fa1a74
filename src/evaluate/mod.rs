//! Scoring predictions against the ground truth carried in the log.

mod metrics;

pub use metrics::{evaluate, ClassReport, Metrics};
