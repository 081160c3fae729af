//! Bayesian-network risk inference for market-abuse surveillance.
//!
//! ```text
//! models.json ─► model::loader ─► model::Network ─┐
//!                                                 ├─► registry::ModelPipeline
//! CaseData ─► evidence::EvidenceMapper ───────────┘        │
//!                                                          ▼
//!                 inference::infer ─► esi ─► risk::RiskAggregator
//! ```
//!
//! [`Engine`] publishes one frozen snapshot of all typologies at a time and
//! swaps it atomically on reload.

pub mod config;
pub mod engine;
pub mod errors;
pub mod esi;
pub mod evidence;
pub mod inference;
pub mod logging;
pub mod model;
pub mod registry;
pub mod risk;

pub use config::{EngineConfig, GlobalSettings, RiskThresholds};
pub use engine::{AnalysisResult, Engine, EngineSnapshot, ModelInfo, ReloadOutcome};
pub use errors::{ConfigError, ConfigValidationError, EngineError};
pub use evidence::case::CaseData;
pub use registry::{ModelOptions, ModelRegistry};
pub use risk::RiskLevel;
