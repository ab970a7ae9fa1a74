//! Runner configuration. The feature lists default to the fixed training schema.

use crate::features::schema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Raw traffic log (delimited text with header)
    pub dataset_path: PathBuf,
    /// Path to the ONNX classifier
    pub model_path: PathBuf,
    /// Feature contract sidecar; defaults to `<model>.features.json`
    pub manifest_path: Option<PathBuf>,
    /// Where predictions.csv and metrics.json are written
    pub output_dir: PathBuf,
    /// Feature column lists
    pub features: FeaturesConfig,
    /// Logging
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturesConfig {
    /// Columns projected out of the derived table, in order
    pub selected_columns: Vec<String>,
    /// Subset of the selected columns expanded into one-hot indicators
    pub categorical_columns: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("traffic.csv"),
            model_path: PathBuf::from("model.onnx"),
            manifest_path: None,
            output_dir: PathBuf::from("out"),
            features: FeaturesConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            selected_columns: schema::selected_columns(),
            categorical_columns: schema::categorical_columns(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: true,
        }
    }
}

impl PipelineConfig {
    /// Load from JSON file if present; otherwise return default
    pub fn load(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(data) => match serde_json::from_str::<PipelineConfig>(&data) {
                    Ok(c) => return c,
                    Err(e) => eprintln!("ignoring config {}: {}", path.display(), e),
                },
                Err(e) => eprintln!("ignoring config {}: {}", path.display(), e),
            }
        }
        Self::default()
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.manifest_path
            .clone()
            .unwrap_or_else(|| self.model_path.with_extension("features.json"))
    }
}
