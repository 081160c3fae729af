//! Error taxonomy for the surveillance engine.
//!
//! Load-time problems ([`ConfigError`], [`ConfigValidationError`]) are isolated
//! per document or per typology and never reach a request. Request-time
//! problems ([`EngineError`]) are returned to the caller with the offending
//! typology or node attached. None of them are retried: they are deterministic
//! for a given input.

use thiserror::Error;

/// Document-level failures. Any of these makes the whole document unusable.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read model configuration {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse model configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid global settings: {0}")]
    Settings(String),
}

/// Structural or numeric inconsistency inside one declared typology.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigValidationError {
    #[error("model declares no nodes")]
    NoNodes,
    #[error("node `{0}` is declared more than once")]
    DuplicateNode(String),
    #[error("node `{0}` has an empty state list")]
    EmptyStates(String),
    #[error("edge {from} -> {to} references an undeclared node")]
    UnknownEdgeEndpoint { from: String, to: String },
    #[error("edge {from} -> {to} is declared more than once")]
    DuplicateEdge { from: String, to: String },
    #[error("graph contains a cycle through {0:?}")]
    Cycle(Vec<String>),
    #[error("fallback prior of `{node}` has {got} entries, expected {expected}")]
    FallbackLength {
        node: String,
        expected: usize,
        got: usize,
    },
    #[error("fallback prior of `{node}` is not a distribution (sum {sum:.6})")]
    FallbackNotNormalized { node: String, sum: f64 },
    #[error("importance of `{node}` must be finite and non-negative, got {value}")]
    InvalidImportance { node: String, value: f64 },
    #[error("cpd declared for undeclared node `{0}`")]
    CpdUnknownVariable(String),
    #[error("node `{0}` has more than one cpd")]
    DuplicateCpd(String),
    #[error("node `{0}` has no cpd")]
    MissingCpd(String),
    #[error("cpd of `{node}` has {got} state rows, node declares {expected} states")]
    CpdStateDimension {
        node: String,
        expected: usize,
        got: usize,
    },
    #[error("cpd of `{node}` conditions on {declared:?} but the graph gives parents {actual:?}")]
    CpdParentMismatch {
        node: String,
        declared: Vec<String>,
        actual: Vec<String>,
    },
    #[error("cpd of `{node}` row {row} has {got} columns, expected {expected}")]
    CpdColumnWidth {
        node: String,
        row: usize,
        expected: usize,
        got: usize,
    },
    #[error("cpd of `{node}` holds an invalid probability {value} at [{row}][{column}]")]
    InvalidProbability {
        node: String,
        row: usize,
        column: usize,
        value: f64,
    },
    #[error("cpd of `{node}` column {column} sums to {sum:.6}, not 1")]
    ColumnNotNormalized {
        node: String,
        column: usize,
        sum: f64,
    },
    #[error("model declares no target node")]
    NoTarget,
    #[error("target `{0}` is not a declared node")]
    UnknownTarget(String),
    #[error("risk_state_weights has {got} entries, primary target `{target}` has {expected} states")]
    RiskWeightsLength {
        target: String,
        expected: usize,
        got: usize,
    },
    #[error("risk_state_weights entry {0} must lie in [0, 1]")]
    RiskWeightOutOfRange(f64),
}

/// Failures surfaced to the caller of the engine API.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown typology `{0}`")]
    UnknownTypology(String),
    #[error("evidence for `{node}` references unknown node in model `{typology}`")]
    UnknownEvidenceNode { typology: String, node: String },
    #[error("evidence for `{node}` in model `{typology}` uses state {state}, node has {states} states")]
    EvidenceRange {
        typology: String,
        node: String,
        state: usize,
        states: usize,
    },
    #[error("posterior of `{node}` in model `{typology}` failed to normalise: {detail}")]
    InferenceNumeric {
        typology: String,
        node: String,
        detail: String,
    },
    #[error("invalid model options: {0}")]
    InvalidOptions(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("reload rejected: {0}")]
    ReloadRejected(String),
}

impl EngineError {
    /// Whether the failure points at the model definition rather than the request.
    pub fn is_model_defect(&self) -> bool {
        matches!(self, EngineError::InferenceNumeric { .. })
    }
}
