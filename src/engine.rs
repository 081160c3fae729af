//! Engine: the published model snapshot and the analysis API on top of it.
//!
//! A snapshot is built completely off to the side (load, validate, freeze,
//! register) and only then swapped in under a short write lock. Requests
//! clone the current `Arc` and run against it without further locking, so a
//! reload never touches a snapshot that is in use.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use serde::Serialize;

use crate::config::{EngineConfig, GlobalSettings};
use crate::errors::EngineError;
use crate::esi::EvidenceQuality;
use crate::evidence::case::CaseData;
use crate::evidence::SkippedSignal;
use crate::inference::Posterior;
use crate::logging::{
    log, log_analysis, log_reload_rejected, log_snapshot_published, obj, ts_now, v_str, Domain, Level,
};
use crate::model::loader::{builtin_outcome, load_document, load_from_path, read_document};
use crate::model::{LoadOutcome, ModelDocument, ModelSource, TypologyLoad};
use crate::registry::{network_constructor, ModelOptions, ModelRegistry};
use crate::risk::RiskLevel;

/// One frozen, fully validated generation of models.
#[derive(Debug)]
pub struct EngineSnapshot {
    pub generation: u64,
    pub fingerprint: String,
    pub loaded_at: String,
    pub settings: Arc<GlobalSettings>,
    pub registry: ModelRegistry,
    pub models: BTreeMap<String, TypologyLoad>,
    /// Configured typologies that failed without a built-in replacement.
    pub unavailable: BTreeMap<String, String>,
    /// Why the document was not used, when built-ins are served instead.
    pub document_error: Option<String>,
}

impl EngineSnapshot {
    fn build(outcome: LoadOutcome, tolerance: f64) -> Self {
        let settings = Arc::new(outcome.settings);
        let mut registry = ModelRegistry::new();
        for (name, load) in &outcome.typologies {
            registry.register(
                name.clone(),
                network_constructor(load.network.clone(), settings.clone(), tolerance),
            );
        }
        Self {
            generation: 0,
            fingerprint: outcome.fingerprint,
            loaded_at: ts_now(),
            settings,
            registry,
            models: outcome.typologies,
            unavailable: outcome
                .unavailable
                .into_iter()
                .map(|(name, err)| (name, err.to_string()))
                .collect(),
            document_error: outcome.document_error,
        }
    }

    fn source_label(&self) -> &'static str {
        if self.document_error.is_some() {
            "builtin"
        } else {
            "config"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfo {
    pub node_count: usize,
    pub edge_count: usize,
    pub cpd_count: usize,
    pub loaded_from_config: bool,
    pub targets: Vec<String>,
    pub generation: u64,
    pub description: Option<String>,
    /// Validation failure that put the built-in model in place of the configured one.
    pub load_error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub typology: String,
    pub case_id: Option<String>,
    pub overall_score: f64,
    pub raw_score: f64,
    pub risk_level: RiskLevel,
    pub escalate: bool,
    pub evidence_narrative: String,
    pub esi_score: f64,
    pub evidence_quality: EvidenceQuality,
    pub fallback_nodes_used: Vec<String>,
    pub observed_nodes: Vec<String>,
    pub skipped_signals: Vec<SkippedSignal>,
    pub suppression_factor: f64,
    pub suppressed_by: Vec<String>,
    /// One per target node, primary first.
    pub posteriors: Vec<Posterior>,
    pub model_source: ModelSource,
    pub model_generation: u64,
    pub model_fingerprint: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReloadOutcome {
    Published {
        generation: u64,
        fingerprint: String,
        typologies: Vec<String>,
        /// Configured typologies served from built-ins after failing validation.
        replaced_by_default: Vec<String>,
    },
    /// Same fingerprint as the running snapshot; nothing was swapped.
    Unchanged { generation: u64 },
}

pub struct Engine {
    config: EngineConfig,
    current: RwLock<Arc<EngineSnapshot>>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snap = self.snapshot();
        f.debug_struct("Engine")
            .field("generation", &snap.generation)
            .field("fingerprint", &snap.fingerprint)
            .field("typologies", &snap.registry.list())
            .finish()
    }
}

impl Engine {
    /// Startup load from `config.model_config_path`. Never fails: an absent or
    /// unusable document degrades to the built-in models.
    pub fn load(config: EngineConfig) -> Self {
        let outcome = load_from_path(&config);
        Self::publish_first(config, outcome)
    }

    /// Engine over an in-memory document. Fails only on unusable global settings.
    pub fn from_document(doc: &ModelDocument, config: EngineConfig) -> Result<Self, EngineError> {
        let outcome = load_document(doc, &config)?;
        Ok(Self::publish_first(config, outcome))
    }

    /// Engine serving only the built-in models.
    pub fn with_defaults(config: EngineConfig) -> Self {
        let outcome = builtin_outcome(&config, None);
        Self::publish_first(config, outcome)
    }

    fn publish_first(config: EngineConfig, outcome: LoadOutcome) -> Self {
        let mut snapshot = EngineSnapshot::build(outcome, config.tolerance);
        snapshot.generation = 1;
        log_snapshot_published(
            snapshot.generation,
            &snapshot.fingerprint,
            &snapshot.registry.list(),
            snapshot.source_label(),
        );
        Self {
            config,
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The snapshot new requests run against.
    pub fn snapshot(&self) -> Arc<EngineSnapshot> {
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn generation(&self) -> u64 {
        self.snapshot().generation
    }

    pub fn typologies(&self) -> Vec<String> {
        self.snapshot().registry.list()
    }

    pub fn analyze(&self, typology: &str, case: &CaseData) -> Result<AnalysisResult, EngineError> {
        self.analyze_with(typology, case, &ModelOptions::default())
    }

    pub fn analyze_with(
        &self,
        typology: &str,
        case: &CaseData,
        options: &ModelOptions,
    ) -> Result<AnalysisResult, EngineError> {
        let snapshot = self.snapshot();
        let outcome = snapshot
            .registry
            .create(typology, options)
            .and_then(|pipeline| pipeline.analyze(case).map(|out| (pipeline, out)));
        let (pipeline, out) = match outcome {
            Ok(ok) => ok,
            Err(err) => {
                log(
                    if err.is_model_defect() { Level::Error } else { Level::Warn },
                    Domain::Audit,
                    "analysis_failed",
                    obj(&[
                        ("typology", v_str(typology)),
                        ("case_id", case.case_id.as_deref().map(v_str).unwrap_or(serde_json::Value::Null)),
                        ("generation", serde_json::json!(snapshot.generation)),
                        ("error", v_str(&err.to_string())),
                    ]),
                );
                return Err(err);
            }
        };

        let a = out.assessment;
        log_analysis(
            typology,
            case.case_id.as_deref(),
            snapshot.generation,
            a.overall_score,
            a.risk_level.as_str(),
            out.esi.score,
            out.esi.fallback_nodes,
        );

        Ok(AnalysisResult {
            typology: typology.to_string(),
            case_id: case.case_id.clone(),
            overall_score: a.overall_score,
            raw_score: a.raw_score,
            risk_level: a.risk_level,
            escalate: a.escalate,
            evidence_narrative: a.evidence_narrative,
            esi_score: out.esi.score,
            evidence_quality: out.esi.quality,
            fallback_nodes_used: out.inference.fallback_nodes(),
            observed_nodes: out.inference.observed_nodes(),
            skipped_signals: out.mapping.skipped,
            suppression_factor: a.suppression_factor,
            suppressed_by: a.suppressed_by,
            posteriors: out.inference.posteriors,
            model_source: pipeline.network.source(),
            model_generation: snapshot.generation,
            model_fingerprint: snapshot.fingerprint.clone(),
        })
    }

    pub fn get_models_info(&self) -> BTreeMap<String, ModelInfo> {
        let snapshot = self.snapshot();
        snapshot
            .models
            .iter()
            .map(|(name, load)| {
                let net = &load.network;
                let info = ModelInfo {
                    node_count: net.node_count(),
                    edge_count: net.edge_count(),
                    cpd_count: net.cpd_count(),
                    loaded_from_config: load.source == ModelSource::Config,
                    targets: net.targets().iter().map(|&t| net.node(t).id.clone()).collect(),
                    generation: snapshot.generation,
                    description: net.description().map(str::to_string),
                    load_error: load.rejection.as_ref().map(|e| e.to_string()),
                };
                (name.clone(), info)
            })
            .collect()
    }

    /// Re-read the configured document and publish it if it is acceptable.
    pub fn reload(&self) -> Result<ReloadOutcome, EngineError> {
        let path = std::path::Path::new(&self.config.model_config_path);
        match read_document(path) {
            Ok(doc) => self.reload_from_document(&doc),
            Err(err) => {
                log_reload_rejected(&err.to_string(), self.generation());
                Err(err.into())
            }
        }
    }

    /// Validate `doc` in full and swap it in. On any rejection the running
    /// snapshot stays in place.
    pub fn reload_from_document(&self, doc: &ModelDocument) -> Result<ReloadOutcome, EngineError> {
        let fingerprint = doc.fingerprint();
        let running = self.snapshot();
        if running.fingerprint == fingerprint && running.document_error.is_none() {
            return Ok(ReloadOutcome::Unchanged {
                generation: running.generation,
            });
        }

        let outcome = match load_document(doc, &self.config) {
            Ok(outcome) => outcome,
            Err(err) => {
                log_reload_rejected(&err.to_string(), running.generation);
                return Err(err.into());
            }
        };

        let rejections = outcome.rejections();
        if self.config.strict_reload && !rejections.is_empty() {
            let reason = rejections
                .iter()
                .map(|(name, err)| format!("{name}: {err}"))
                .collect::<Vec<_>>()
                .join("; ");
            log_reload_rejected(&reason, running.generation);
            return Err(EngineError::ReloadRejected(reason));
        }
        let replaced_by_default: Vec<String> = outcome
            .typologies
            .iter()
            .filter(|(_, load)| load.rejection.is_some())
            .map(|(name, _)| name.clone())
            .collect();

        let mut snapshot = EngineSnapshot::build(outcome, self.config.tolerance);

        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        snapshot.generation = guard.generation + 1;
        let published = ReloadOutcome::Published {
            generation: snapshot.generation,
            fingerprint: snapshot.fingerprint.clone(),
            typologies: snapshot.registry.list(),
            replaced_by_default,
        };
        log_snapshot_published(
            snapshot.generation,
            &snapshot.fingerprint,
            &snapshot.registry.list(),
            "reload",
        );
        *guard = Arc::new(snapshot);
        Ok(published)
    }
}
