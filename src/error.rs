//! Error taxonomy shared by every pipeline stage.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Malformed or missing raw fields, unparseable timestamps.
    #[error("data error in column `{column}`: {reason}")]
    Data { column: String, reason: String },

    /// A selected or categorical column is absent from the table.
    #[error("schema error: column `{column}` is not present in the derived table")]
    Schema { column: String },

    /// Empty input batch or empty feature contract.
    #[error("alignment error: {0}")]
    Alignment(String),

    /// Model artifact cannot be loaded or prediction failed.
    #[error("model error: {0}")]
    Model(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl PipelineError {
    pub fn data(column: impl Into<String>, reason: impl Into<String>) -> Self {
        PipelineError::Data {
            column: column.into(),
            reason: reason.into(),
        }
    }

    pub fn schema(column: impl Into<String>) -> Self {
        PipelineError::Schema {
            column: column.into(),
        }
    }

    pub fn model(reason: impl std::fmt::Display) -> Self {
        PipelineError::Model(reason.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
