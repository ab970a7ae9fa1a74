//! Support-weighted classification metrics over the rows with a known ground-truth class.

use crate::error::{PipelineError, Result};
use crate::features::AttackType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Scores for one class label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassReport {
    pub label: i64,
    /// Attack type name, `None` for a code outside the known classes
    pub name: Option<String>,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Rows whose true label is this class
    pub support: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Rows scored
    pub evaluated_rows: usize,
    /// Rows skipped because their ground truth is outside the known classes
    pub excluded_rows: usize,
    pub per_class: Vec<ClassReport>,
}

#[derive(Default)]
struct Counts {
    tp: usize,
    fp: usize,
    fn_count: usize,
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Compare predictions with ground truth. Rows whose truth is `None` are excluded;
/// the class set is the union of true and predicted labels.
pub fn evaluate(ground_truth: &[Option<i64>], predictions: &[i64]) -> Result<Metrics> {
    if ground_truth.len() != predictions.len() {
        return Err(PipelineError::data(
            "Predictions",
            format!(
                "{} predictions for {} ground-truth rows",
                predictions.len(),
                ground_truth.len()
            ),
        ));
    }

    let pairs: Vec<(i64, i64)> = ground_truth
        .iter()
        .zip(predictions)
        .filter_map(|(t, &p)| t.map(|t| (t, p)))
        .collect();
    let excluded_rows = predictions.len() - pairs.len();
    if excluded_rows > 0 {
        tracing::warn!(excluded_rows, "rows with unknown attack type excluded from metrics");
    }
    if pairs.is_empty() {
        return Err(PipelineError::data(
            "Attack Type",
            "no row carries a known attack type to evaluate against",
        ));
    }

    let mut counts: BTreeMap<i64, Counts> = BTreeMap::new();
    let mut correct = 0usize;
    for &(truth, pred) in &pairs {
        if truth == pred {
            correct += 1;
            counts.entry(truth).or_default().tp += 1;
        } else {
            counts.entry(pred).or_default().fp += 1;
            counts.entry(truth).or_default().fn_count += 1;
        }
    }

    let total = pairs.len();
    let per_class: Vec<ClassReport> = counts
        .iter()
        .map(|(&label, c)| {
            let precision = ratio(c.tp, c.tp + c.fp);
            let recall = ratio(c.tp, c.tp + c.fn_count);
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };
            ClassReport {
                label,
                name: AttackType::from_code(label).map(|a| a.as_str().to_string()),
                precision,
                recall,
                f1,
                support: c.tp + c.fn_count,
            }
        })
        .collect();

    let weighted = |f: fn(&ClassReport) -> f64| {
        per_class.iter().map(|c| f(c) * c.support as f64).sum::<f64>() / total as f64
    };

    Ok(Metrics {
        accuracy: ratio(correct, total),
        precision: weighted(|c| c.precision),
        recall: weighted(|c| c.recall),
        f1: weighted(|c| c.f1),
        evaluated_rows: total,
        excluded_rows,
        per_class,
    })
}
