//! Projection of the derived table onto the feature-candidate columns.

use crate::dataset::Table;
use crate::error::{PipelineError, Result};

pub fn select_features<S: AsRef<str>>(derived: &Table, columns: &[S]) -> Result<Table> {
    derived.select(columns).map_err(PipelineError::schema)
}
