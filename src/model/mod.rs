//! Declarative model documents and the networks built from them.
//!
//! ```text
//! ModelDocument ──► loader::validate_model ──► ValidatedModel ──► Network
//!   (serde)           (structure + numerics)     (type-state)      (frozen)
//! ```

pub mod defaults;
pub mod loader;
pub mod network;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::GlobalSettings;

pub use loader::{LoadOutcome, ModelSource, TypologyLoad, ValidatedModel};
pub use network::{Cpd, Network, Node};

/// Top-level configuration document: global settings plus one model per typology.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelDocument {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub global_settings: GlobalSettings,
    #[serde(default)]
    pub models: BTreeMap<String, ModelSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_targets")]
    pub targets: Vec<String>,
    /// Score weight per state of the primary target; linear ramp when absent.
    #[serde(default)]
    pub risk_state_weights: Option<Vec<f64>>,
    pub nodes: Vec<NodeSpec>,
    #[serde(default)]
    pub edges: Vec<(String, String)>,
    #[serde(default)]
    pub cpds: Vec<CpdSpec>,
}

fn default_targets() -> Vec<String> {
    vec!["Risk".to_string()]
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub name: String,
    pub states: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fallback_prior: Option<Vec<f64>>,
    /// ESI weight; `global_settings.default_importance` when absent.
    #[serde(default)]
    pub importance: Option<f64>,
    /// Latent nodes are never evidence-bearing and are summed out when unset.
    #[serde(default)]
    pub latent: bool,
}

/// Conditional table: `values[own_state][column]`, columns enumerate joint
/// parent states in `evidence` order with the last parent varying fastest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CpdSpec {
    pub variable: String,
    #[serde(default)]
    pub evidence: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl ModelDocument {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Hex SHA-256 of the canonical serialisation, used as a model version tag.
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let canonical = serde_json::to_vec(self).unwrap_or_default();
        hex::encode(Sha256::digest(&canonical))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_defaults() {
        let doc = ModelDocument::from_json(
            r#"{"models": {"m": {"nodes": [{"name": "Risk", "states": ["Low", "High"]}]}}}"#,
        )
        .unwrap();
        let spec = &doc.models["m"];
        assert_eq!(spec.targets, vec!["Risk".to_string()]);
        assert!(spec.edges.is_empty());
        assert!(!spec.nodes[0].latent);
        assert_eq!(doc.global_settings, GlobalSettings::default());
    }

    #[test]
    fn test_edges_parse_as_pairs() {
        let doc = ModelDocument::from_json(
            r#"{"models": {"m": {"nodes": [], "edges": [["A", "B"], ["B", "C"]]}}}"#,
        )
        .unwrap();
        assert_eq!(doc.models["m"].edges[1], ("B".to_string(), "C".to_string()));
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let a = ModelDocument::default();
        let mut b = ModelDocument::default();
        assert_eq!(a.fingerprint(), b.fingerprint());
        b.version = Some("2".into());
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);
    }
}
