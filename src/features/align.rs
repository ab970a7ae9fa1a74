//! Reconcile an encoded table with a model's feature contract.
//!
//! Contract names absent from the table are zero-filled and reported; table
//! columns outside the contract are dropped. The result has exactly the
//! contract's columns, in the contract's order.

use crate::dataset::{Table, Value};
use crate::error::{PipelineError, Result};
use ndarray::Array2;
use std::collections::HashSet;

/// Dense row-major feature matrix labelled with the contract's names.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedMatrix {
    feature_names: Vec<String>,
    values: Array2<f32>,
}

impl AlignedMatrix {
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn values(&self) -> &Array2<f32> {
        &self.values
    }

    pub fn nrows(&self) -> usize {
        self.values.nrows()
    }

    pub fn column(&self, name: &str) -> Option<Vec<f32>> {
        let idx = self.feature_names.iter().position(|n| n == name)?;
        Some(self.values.column(idx).to_vec())
    }

    pub fn to_table(&self) -> Table {
        let rows = self
            .values
            .rows()
            .into_iter()
            .map(|r| r.iter().map(|&v| Value::Number(v as f64)).collect())
            .collect();
        // rows are built from the matrix shape, widths always match
        Table::from_rows(self.feature_names.clone(), rows).unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct Alignment {
    pub matrix: AlignedMatrix,
    /// Contract names that were zero-filled
    pub missing: Vec<String>,
    /// Table columns discarded because the contract does not name them
    pub dropped: Vec<String>,
}

pub fn align(table: &Table, contract: &[String]) -> Result<Alignment> {
    if contract.is_empty() {
        return Err(PipelineError::Alignment("model feature contract is empty".into()));
    }
    if table.is_empty() {
        return Err(PipelineError::Alignment("encoded table has zero rows".into()));
    }

    let index = table.index_map();
    let missing: Vec<String> = contract
        .iter()
        .filter(|n| !index.contains_key(n.as_str()))
        .cloned()
        .collect();
    let wanted: HashSet<&str> = contract.iter().map(|n| n.as_str()).collect();
    let dropped: Vec<String> = table
        .columns()
        .iter()
        .filter(|c| !wanted.contains(c.as_str()))
        .cloned()
        .collect();

    if !missing.is_empty() {
        tracing::warn!(count = missing.len(), missing = ?missing, "expected features absent, filled with zero");
    }
    if !dropped.is_empty() {
        tracing::debug!(count = dropped.len(), dropped = ?dropped, "features not in contract discarded");
    }

    let sources: Vec<Option<usize>> = contract.iter().map(|n| index.get(n.as_str()).copied()).collect();
    let mut values = Array2::<f32>::zeros((table.len(), contract.len()));
    for (r, row) in table.rows().iter().enumerate() {
        for (c, src) in sources.iter().enumerate() {
            let Some(&i) = src.as_ref() else { continue };
            values[[r, c]] = match &row[i] {
                Value::Number(v) => *v as f32,
                other => {
                    return Err(PipelineError::data(
                        &contract[c],
                        format!("row {}: non-numeric feature value `{}`", r, other),
                    ))
                }
            };
        }
    }

    Ok(Alignment {
        matrix: AlignedMatrix {
            feature_names: contract.to_vec(),
            values,
        },
        missing,
        dropped,
    })
}
