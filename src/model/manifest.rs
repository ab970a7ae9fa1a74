//! Sidecar JSON describing what an exported model expects.

use crate::error::{PipelineError, Result};
use crate::features::Vocabulary;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelManifest {
    /// Feature contract, in the order the model consumes columns
    pub feature_names: Vec<String>,
    /// Encoder vocabulary fitted at training time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vocabulary: Option<Vocabulary>,
}

impl ModelManifest {
    pub fn new(feature_names: Vec<String>) -> Self {
        Self {
            feature_names,
            vocabulary: None,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::model(format!("cannot read manifest {}: {}", path.display(), e))
        })?;
        Self::from_json(&data)
    }

    pub fn from_json(data: &str) -> Result<Self> {
        let manifest: ModelManifest = serde_json::from_str(data)
            .map_err(|e| PipelineError::model(format!("invalid manifest: {}", e)))?;
        if manifest.feature_names.is_empty() {
            return Err(PipelineError::model("manifest declares no feature names"));
        }
        Ok(manifest)
    }

    /// SHA-256 over the ordered names; changes whenever the contract changes.
    pub fn contract_digest(&self) -> String {
        let mut hasher = Sha256::new();
        for name in &self.feature_names {
            hasher.update(name.as_bytes());
            hasher.update([0u8]);
        }
        format!("{:x}", hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_depends_on_order() {
        let a = ModelManifest::new(vec!["Hour".into(), "Month".into()]);
        let b = ModelManifest::new(vec!["Month".into(), "Hour".into()]);
        assert_ne!(a.contract_digest(), b.contract_digest());
        assert_eq!(a.contract_digest().len(), 64);
    }

    #[test]
    fn empty_contract_rejected() {
        let r = ModelManifest::from_json(r#"{"feature_names":[]}"#);
        assert!(matches!(r, Err(PipelineError::Model(_))));
    }

    #[test]
    fn vocabulary_is_optional() {
        let m = ModelManifest::from_json(r#"{"feature_names":["Hour"]}"#).unwrap();
        assert!(m.vocabulary.is_none());
    }
}
