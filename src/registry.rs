//! Typology registry: name to pipeline constructor.
//!
//! A pipeline binds one frozen network to its evidence mapper and risk
//! aggregator. The registry holds explicit references only; every engine
//! (and every snapshot of an engine) owns its own registry.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::GlobalSettings;
use crate::errors::EngineError;
use crate::esi::{evidence_sufficiency, EsiReport};
use crate::evidence::case::CaseData;
use crate::evidence::{EvidenceMapper, EvidenceMapping};
use crate::inference::{infer, InferenceResult};
use crate::logging::{log, log_evidence_mapped, obj, v_str, Domain, Level};
use crate::model::Network;
use crate::risk::{RiskAggregator, RiskAssessment};

/// Per-create overrides.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelOptions {
    /// Replaces `global_settings.min_signal_confidence` for this pipeline.
    pub min_signal_confidence: Option<f64>,
}

pub type Constructor = Arc<dyn Fn(&ModelOptions) -> Result<ModelPipeline, EngineError> + Send + Sync>;

/// One assembled, callable model.
#[derive(Debug, Clone)]
pub struct ModelPipeline {
    pub typology: String,
    pub network: Arc<Network>,
    pub mapper: EvidenceMapper,
    pub aggregator: RiskAggregator,
    pub min_signal_confidence: f64,
    pub tolerance: f64,
}

/// Everything one pass through a pipeline produced.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub mapping: EvidenceMapping,
    pub inference: InferenceResult,
    pub esi: EsiReport,
    pub assessment: RiskAssessment,
}

impl ModelPipeline {
    pub fn new(network: Arc<Network>, settings: &GlobalSettings, options: &ModelOptions, tolerance: f64) -> Self {
        let typology = network.name().to_string();
        let aggregator = RiskAggregator::new(&typology, settings, network.risk_weights().to_vec());
        Self {
            mapper: EvidenceMapper::for_typology(&typology),
            min_signal_confidence: options
                .min_signal_confidence
                .unwrap_or(settings.min_signal_confidence),
            typology,
            network,
            aggregator,
            tolerance,
        }
    }

    /// Evidence mapping, inference, sufficiency and aggregation.
    pub fn analyze(&self, case: &CaseData) -> Result<PipelineOutput, EngineError> {
        let mapping = self.mapper.map(case, &self.network, self.min_signal_confidence);
        log_evidence_mapped(
            &self.typology,
            case.case_id.as_deref(),
            mapping.assignment.len(),
            mapping.skipped.len(),
        );

        let inference = infer(&self.network, &mapping.assignment, self.tolerance)?;
        let esi = evidence_sufficiency(&inference.usage);
        let assessment = self.aggregator.assess(
            &inference,
            &esi,
            &case.active_context_flags(),
            &mapping.skipped,
        );
        Ok(PipelineOutput {
            mapping,
            inference,
            esi,
            assessment,
        })
    }
}

/// Constructor that binds `network` with the document's settings.
pub fn network_constructor(network: Arc<Network>, settings: Arc<GlobalSettings>, tolerance: f64) -> Constructor {
    Arc::new(move |options: &ModelOptions| {
        if let Some(c) = options.min_signal_confidence {
            if !(0.0..=1.0).contains(&c) {
                return Err(EngineError::InvalidOptions(format!(
                    "min_signal_confidence {c} must lie in [0, 1]"
                )));
            }
        }
        Ok(ModelPipeline::new(network.clone(), &settings, options, tolerance))
    })
}

#[derive(Clone, Default)]
pub struct ModelRegistry {
    constructors: BTreeMap<String, Constructor>,
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("typologies", &self.list())
            .finish()
    }
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace a typology.
    pub fn register(&mut self, typology: impl Into<String>, constructor: Constructor) {
        let typology = typology.into();
        if self.constructors.insert(typology.clone(), constructor).is_some() {
            log(
                Level::Warn,
                Domain::Registry,
                "typology_replaced",
                obj(&[("typology", v_str(&typology))]),
            );
        }
    }

    pub fn create(&self, typology: &str, options: &ModelOptions) -> Result<ModelPipeline, EngineError> {
        let constructor = self
            .constructors
            .get(typology)
            .ok_or_else(|| EngineError::UnknownTypology(typology.to_string()))?;
        constructor(options)
    }

    /// Registered typologies, sorted.
    pub fn list(&self) -> Vec<String> {
        self.constructors.keys().cloned().collect()
    }

    pub fn contains(&self, typology: &str) -> bool {
        self.constructors.contains_key(typology)
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}
