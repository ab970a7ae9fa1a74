//! One-hot encoding with separate fit and transform phases.
//!
//! `fit` learns the category vocabulary of the listed columns; `transform` expands
//! them into `<column>_<category>` indicators and keeps every other column as is.
//! A vocabulary fitted at training time can be shipped with the model so that
//! indicator names stay stable across runs. Categories unseen at fit time produce
//! all-zero indicators.

use crate::dataset::{Table, Value};
use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Label of a missing cell, matching the naming of training-time encoders.
pub const MISSING_CATEGORY: &str = "nan";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryList {
    pub column: String,
    pub categories: Vec<String>,
}

/// Ordered categories per encoded column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    pub columns: Vec<CategoryList>,
}

impl Vocabulary {
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.column.as_str()).collect()
    }

    /// Indicator column names in output order.
    pub fn feature_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .flat_map(|c| c.categories.iter().map(move |cat| indicator_name(&c.column, cat)))
            .collect()
    }
}

pub fn indicator_name(column: &str, category: &str) -> String {
    format!("{}_{}", column, category)
}

pub fn category_label(v: &Value) -> String {
    match v {
        Value::Missing => MISSING_CATEGORY.to_string(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct OneHotEncoder {
    vocabulary: Vocabulary,
}

impl OneHotEncoder {
    /// Learn the categories of `columns` from `table`. Categories are sorted, `nan` last.
    pub fn fit<S: AsRef<str>>(table: &Table, columns: &[S]) -> Result<Self> {
        let mut lists = Vec::with_capacity(columns.len());
        for name in columns {
            let name = name.as_ref();
            let values = table.column(name).ok_or_else(|| PipelineError::schema(name))?;
            let mut seen_missing = false;
            let mut set = BTreeSet::new();
            for v in values {
                if v.is_missing() {
                    seen_missing = true;
                } else {
                    set.insert(category_label(v));
                }
            }
            let mut categories: Vec<String> = set.into_iter().collect();
            if seen_missing {
                categories.push(MISSING_CATEGORY.to_string());
            }
            lists.push(CategoryList {
                column: name.to_string(),
                categories,
            });
        }
        Ok(Self {
            vocabulary: Vocabulary { columns: lists },
        })
    }

    pub fn from_vocabulary(vocabulary: Vocabulary) -> Self {
        Self { vocabulary }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Untouched columns first (in table order), then one indicator block per encoded column.
    pub fn transform(&self, table: &Table) -> Result<Table> {
        let encoded = self.vocabulary.column_names();
        let mut indices = Vec::with_capacity(encoded.len());
        for name in &encoded {
            indices.push(table.column_index(name).ok_or_else(|| PipelineError::schema(*name))?);
        }

        let mut out = table.drop_columns(encoded.as_slice());
        let mut unknown = 0usize;
        for (list, &idx) in self.vocabulary.columns.iter().zip(&indices) {
            let labels: Vec<String> = table.rows().iter().map(|r| category_label(&r[idx])).collect();
            unknown += labels.iter().filter(|l| !list.categories.contains(l)).count();
            for cat in &list.categories {
                let values = labels
                    .iter()
                    .map(|l| Value::Number(if l == cat { 1.0 } else { 0.0 }))
                    .collect();
                out.set_column(&indicator_name(&list.column, cat), values)?;
            }
        }
        if unknown > 0 {
            tracing::debug!(unknown, "categories outside the vocabulary encoded as all-zero");
        }
        Ok(out)
    }

    /// Fit on the batch and encode it in one call.
    pub fn fit_transform<S: AsRef<str>>(table: &Table, columns: &[S]) -> Result<(Self, Table)> {
        let encoder = Self::fit(table, columns)?;
        let out = encoder.transform(table)?;
        Ok((encoder, out))
    }
}
