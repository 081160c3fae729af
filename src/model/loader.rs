//! Model configuration loading and validation.
//!
//! A document is read once at start (or on reload). Each typology is validated
//! on its own: a broken typology never takes the others down with it. When a
//! configured typology fails, the built-in default of the same name replaces
//! it if one exists; otherwise the typology is left out.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use crate::config::{EngineConfig, GlobalSettings};
use crate::errors::{ConfigError, ConfigValidationError};
use crate::logging::{log, obj, v_str, Domain, Level};
use crate::model::defaults;
use crate::model::network::Network;
use crate::model::{ModelDocument, ModelSpec};

/// Where a served model came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelSource {
    Config,
    BuiltIn,
}

/// A model that passed every structural and numeric check.
///
/// Only [`validate_model`] can produce one, so [`Network::from_validated`]
/// never has to re-check anything.
#[derive(Debug, Clone)]
pub struct ValidatedModel {
    pub(crate) name: String,
    pub(crate) spec: ModelSpec,
    /// Parents per node, in the order of that node's cpd evidence list.
    pub(crate) parents: Vec<Vec<usize>>,
    /// Index into `spec.cpds` per node.
    pub(crate) cpd_of: Vec<usize>,
    pub(crate) topo: Vec<usize>,
    pub(crate) targets: Vec<usize>,
    pub(crate) risk_weights: Vec<f64>,
}

impl ValidatedModel {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Per-typology outcome of a load.
#[derive(Debug, Clone)]
pub struct TypologyLoad {
    pub network: Arc<Network>,
    pub source: ModelSource,
    /// Why the configured model was replaced by the built-in one.
    pub rejection: Option<ConfigValidationError>,
}

/// Everything a load produced: settings, served networks, and what was dropped.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub settings: GlobalSettings,
    pub fingerprint: String,
    pub typologies: BTreeMap<String, TypologyLoad>,
    /// Configured typologies that failed and had no built-in replacement.
    pub unavailable: BTreeMap<String, ConfigValidationError>,
    /// Set when the document itself could not be used.
    pub document_error: Option<String>,
}

impl LoadOutcome {
    /// Every validation failure in the document, replaced or not.
    pub fn rejections(&self) -> Vec<(String, ConfigValidationError)> {
        let mut out: Vec<(String, ConfigValidationError)> = self
            .typologies
            .iter()
            .filter_map(|(name, load)| load.rejection.clone().map(|e| (name.clone(), e)))
            .collect();
        out.extend(self.unavailable.iter().map(|(n, e)| (n.clone(), e.clone())));
        out
    }
}

/// Read and parse a document from disk.
pub fn read_document(path: &Path) -> Result<ModelDocument, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(ModelDocument::from_json(&text)?)
}

/// Startup load: never fails, degrades to built-in defaults when the file is
/// absent, unreadable, or carries invalid global settings.
pub fn load_from_path(cfg: &EngineConfig) -> LoadOutcome {
    let path = Path::new(&cfg.model_config_path);
    match read_document(path) {
        Ok(doc) => match load_document(&doc, cfg) {
            Ok(outcome) => outcome,
            Err(err) => {
                log(
                    Level::Error,
                    Domain::Config,
                    "config_rejected",
                    obj(&[
                        ("path", v_str(&cfg.model_config_path)),
                        ("error", v_str(&err.to_string())),
                        ("msg", v_str("serving built-in default models")),
                    ]),
                );
                builtin_outcome(cfg, Some(err.to_string()))
            }
        },
        Err(err) => {
            log(
                Level::Warn,
                Domain::Config,
                "config_unavailable",
                obj(&[
                    ("path", v_str(&cfg.model_config_path)),
                    ("error", v_str(&err.to_string())),
                    ("msg", v_str("serving built-in default models")),
                ]),
            );
            builtin_outcome(cfg, Some(err.to_string()))
        }
    }
}

/// Load every built-in typology.
pub fn builtin_outcome(cfg: &EngineConfig, document_error: Option<String>) -> LoadOutcome {
    let doc = defaults::builtin_document();
    let settings = doc.global_settings.clone();
    let mut typologies = BTreeMap::new();
    for (name, spec) in &doc.models {
        match validate_model(name, spec, &settings, cfg.tolerance) {
            Ok(valid) => {
                typologies.insert(
                    name.clone(),
                    TypologyLoad {
                        network: Arc::new(Network::from_validated(valid, &settings, ModelSource::BuiltIn)),
                        source: ModelSource::BuiltIn,
                        rejection: None,
                    },
                );
            }
            Err(err) => log(
                Level::Fatal,
                Domain::Model,
                "builtin_invalid",
                obj(&[("typology", v_str(name)), ("error", v_str(&err.to_string()))]),
            ),
        }
    }
    LoadOutcome {
        settings,
        fingerprint: doc.fingerprint(),
        typologies,
        unavailable: BTreeMap::new(),
        document_error,
    }
}

/// Validate and build every typology of a parsed document.
///
/// Fails only when the global settings are unusable; per-typology failures
/// are recorded in the outcome.
pub fn load_document(doc: &ModelDocument, cfg: &EngineConfig) -> Result<LoadOutcome, ConfigError> {
    let settings = doc.global_settings.clone();
    settings.validate(cfg.tolerance)?;

    let mut typologies = BTreeMap::new();
    let mut unavailable = BTreeMap::new();

    for (name, spec) in &doc.models {
        match validate_model(name, spec, &settings, cfg.tolerance) {
            Ok(valid) => {
                let network = Network::from_validated(valid, &settings, ModelSource::Config);
                log(
                    Level::Info,
                    Domain::Model,
                    "model_loaded",
                    obj(&[
                        ("typology", v_str(name)),
                        ("source", v_str("config")),
                        ("nodes", serde_json::json!(network.node_count())),
                        ("edges", serde_json::json!(network.edge_count())),
                    ]),
                );
                typologies.insert(
                    name.clone(),
                    TypologyLoad {
                        network: Arc::new(network),
                        source: ModelSource::Config,
                        rejection: None,
                    },
                );
            }
            Err(err) => {
                let fallback = defaults::builtin_spec(name)
                    .and_then(|spec| validate_model(name, &spec, &settings, cfg.tolerance).ok());
                log(
                    Level::Error,
                    Domain::Model,
                    "model_rejected",
                    obj(&[
                        ("typology", v_str(name)),
                        ("error", v_str(&err.to_string())),
                        ("fallback", v_str(if fallback.is_some() { "builtin" } else { "none" })),
                    ]),
                );
                match fallback {
                    Some(valid) => {
                        typologies.insert(
                            name.clone(),
                            TypologyLoad {
                                network: Arc::new(Network::from_validated(valid, &settings, ModelSource::BuiltIn)),
                                source: ModelSource::BuiltIn,
                                rejection: Some(err),
                            },
                        );
                    }
                    None => {
                        unavailable.insert(name.clone(), err);
                    }
                }
            }
        }
    }

    if cfg.serve_defaults {
        for name in defaults::CORE_TYPOLOGIES {
            if typologies.contains_key(*name) || unavailable.contains_key(*name) {
                continue;
            }
            let Some(spec) = defaults::builtin_spec(name) else { continue };
            if let Ok(valid) = validate_model(name, &spec, &settings, cfg.tolerance) {
                typologies.insert(
                    name.to_string(),
                    TypologyLoad {
                        network: Arc::new(Network::from_validated(valid, &settings, ModelSource::BuiltIn)),
                        source: ModelSource::BuiltIn,
                        rejection: None,
                    },
                );
            }
        }
    }

    Ok(LoadOutcome {
        settings,
        fingerprint: doc.fingerprint(),
        typologies,
        unavailable,
        document_error: None,
    })
}

/// Check one typology's structure and numerics.
pub fn validate_model(
    name: &str,
    spec: &ModelSpec,
    settings: &GlobalSettings,
    tolerance: f64,
) -> Result<ValidatedModel, ConfigValidationError> {
    if spec.nodes.is_empty() {
        return Err(ConfigValidationError::NoNodes);
    }

    let mut index: HashMap<&str, usize> = HashMap::new();
    for (i, node) in spec.nodes.iter().enumerate() {
        if index.insert(node.name.as_str(), i).is_some() {
            return Err(ConfigValidationError::DuplicateNode(node.name.clone()));
        }
        if node.states.is_empty() {
            return Err(ConfigValidationError::EmptyStates(node.name.clone()));
        }
        if let Some(prior) = &node.fallback_prior {
            check_distribution(&node.name, prior, node.states.len(), tolerance)?;
        }
        let importance = node.importance.unwrap_or(settings.default_importance);
        if !importance.is_finite() || importance < 0.0 {
            return Err(ConfigValidationError::InvalidImportance {
                node: node.name.clone(),
                value: importance,
            });
        }
    }

    // Parents as declared by edges, in edge order.
    let n = spec.nodes.len();
    let mut edge_parents: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut seen_edges: HashSet<(usize, usize)> = HashSet::new();
    for (from, to) in &spec.edges {
        let (Some(&f), Some(&t)) = (index.get(from.as_str()), index.get(to.as_str())) else {
            return Err(ConfigValidationError::UnknownEdgeEndpoint {
                from: from.clone(),
                to: to.clone(),
            });
        };
        if !seen_edges.insert((f, t)) {
            return Err(ConfigValidationError::DuplicateEdge {
                from: from.clone(),
                to: to.clone(),
            });
        }
        edge_parents[t].push(f);
    }

    let topo = topological_order(&edge_parents).map_err(|stuck| {
        ConfigValidationError::Cycle(stuck.into_iter().map(|i| spec.nodes[i].name.clone()).collect())
    })?;

    let mut cpd_of: Vec<Option<usize>> = vec![None; n];
    for (ci, cpd) in spec.cpds.iter().enumerate() {
        let Some(&node) = index.get(cpd.variable.as_str()) else {
            return Err(ConfigValidationError::CpdUnknownVariable(cpd.variable.clone()));
        };
        if cpd_of[node].replace(ci).is_some() {
            return Err(ConfigValidationError::DuplicateCpd(cpd.variable.clone()));
        }
    }

    let mut parents: Vec<Vec<usize>> = vec![Vec::new(); n];
    for node in 0..n {
        let name = &spec.nodes[node].name;
        let Some(ci) = cpd_of[node] else {
            return Err(ConfigValidationError::MissingCpd(name.clone()));
        };
        let cpd = &spec.cpds[ci];

        let declared: Vec<usize> = cpd
            .evidence
            .iter()
            .filter_map(|e| index.get(e.as_str()).copied())
            .collect();
        let declared_set: HashSet<usize> = declared.iter().copied().collect();
        let actual_set: HashSet<usize> = edge_parents[node].iter().copied().collect();
        if declared.len() != cpd.evidence.len()
            || declared_set.len() != declared.len()
            || declared_set != actual_set
        {
            return Err(ConfigValidationError::CpdParentMismatch {
                node: name.clone(),
                declared: cpd.evidence.clone(),
                actual: edge_parents[node].iter().map(|&p| spec.nodes[p].name.clone()).collect(),
            });
        }

        let states = spec.nodes[node].states.len();
        if cpd.values.len() != states {
            return Err(ConfigValidationError::CpdStateDimension {
                node: name.clone(),
                expected: states,
                got: cpd.values.len(),
            });
        }
        let columns: usize = declared.iter().map(|&p| spec.nodes[p].states.len()).product();
        check_stochastic(name, &cpd.values, columns, tolerance)?;
        parents[node] = declared;
    }

    if spec.targets.is_empty() {
        return Err(ConfigValidationError::NoTarget);
    }
    let mut targets = Vec::with_capacity(spec.targets.len());
    for t in &spec.targets {
        match index.get(t.as_str()) {
            Some(&i) => targets.push(i),
            None => return Err(ConfigValidationError::UnknownTarget(t.clone())),
        }
    }

    let primary = &spec.nodes[targets[0]];
    let k = primary.states.len();
    let risk_weights = match &spec.risk_state_weights {
        Some(w) => {
            if w.len() != k {
                return Err(ConfigValidationError::RiskWeightsLength {
                    target: primary.name.clone(),
                    expected: k,
                    got: w.len(),
                });
            }
            if let Some(bad) = w.iter().find(|x| !(0.0..=1.0).contains(*x)) {
                return Err(ConfigValidationError::RiskWeightOutOfRange(*bad));
            }
            w.clone()
        }
        None => linear_ramp(k),
    };

    Ok(ValidatedModel {
        name: name.to_string(),
        spec: spec.clone(),
        parents,
        cpd_of: cpd_of.into_iter().map(|c| c.unwrap_or_default()).collect(),
        topo,
        targets,
        risk_weights,
    })
}

fn linear_ramp(k: usize) -> Vec<f64> {
    if k <= 1 {
        return vec![1.0; k];
    }
    (0..k).map(|i| i as f64 / (k - 1) as f64).collect()
}

fn check_distribution(
    node: &str,
    prior: &[f64],
    states: usize,
    tolerance: f64,
) -> Result<(), ConfigValidationError> {
    if prior.len() != states {
        return Err(ConfigValidationError::FallbackLength {
            node: node.to_string(),
            expected: states,
            got: prior.len(),
        });
    }
    let sum: f64 = prior.iter().sum();
    if prior.iter().any(|p| !p.is_finite() || *p < 0.0) || (sum - 1.0).abs() > tolerance {
        return Err(ConfigValidationError::FallbackNotNormalized {
            node: node.to_string(),
            sum,
        });
    }
    Ok(())
}

fn check_stochastic(
    node: &str,
    values: &[Vec<f64>],
    columns: usize,
    tolerance: f64,
) -> Result<(), ConfigValidationError> {
    for (row, r) in values.iter().enumerate() {
        if r.len() != columns {
            return Err(ConfigValidationError::CpdColumnWidth {
                node: node.to_string(),
                row,
                expected: columns,
                got: r.len(),
            });
        }
        for (column, &value) in r.iter().enumerate() {
            if !value.is_finite() || value < 0.0 || value > 1.0 + tolerance {
                return Err(ConfigValidationError::InvalidProbability {
                    node: node.to_string(),
                    row,
                    column,
                    value,
                });
            }
        }
    }
    for column in 0..columns {
        let sum: f64 = values.iter().map(|r| r[column]).sum();
        if (sum - 1.0).abs() > tolerance {
            return Err(ConfigValidationError::ColumnNotNormalized {
                node: node.to_string(),
                column,
                sum,
            });
        }
    }
    Ok(())
}

/// Kahn's algorithm, ties broken by declaration order. On failure returns
/// the nodes that could not be ordered (those on or behind a cycle).
fn topological_order(parents: &[Vec<usize>]) -> Result<Vec<usize>, Vec<usize>> {
    let n = parents.len();
    let mut in_degree: Vec<usize> = parents.iter().map(|p| p.len()).collect();
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (child, ps) in parents.iter().enumerate() {
        for &p in ps {
            children[p].push(child);
        }
    }

    let mut ready: std::collections::BTreeSet<usize> =
        (0..n).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(n);
    while let Some(next) = ready.pop_first() {
        order.push(next);
        for &c in &children[next] {
            in_degree[c] -= 1;
            if in_degree[c] == 0 {
                ready.insert(c);
            }
        }
    }

    if order.len() == n {
        Ok(order)
    } else {
        Err((0..n).filter(|&i| in_degree[i] > 0).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CpdSpec, NodeSpec};

    fn node(name: &str, states: &[&str]) -> NodeSpec {
        NodeSpec {
            name: name.into(),
            states: states.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn cpd(variable: &str, evidence: &[&str], values: Vec<Vec<f64>>) -> CpdSpec {
        CpdSpec {
            variable: variable.into(),
            evidence: evidence.iter().map(|s| s.to_string()).collect(),
            values,
        }
    }

    fn two_node() -> ModelSpec {
        ModelSpec {
            targets: vec!["Risk".into()],
            nodes: vec![node("Signal", &["Off", "On"]), node("Risk", &["Low", "High"])],
            edges: vec![("Signal".into(), "Risk".into())],
            cpds: vec![
                cpd("Signal", &[], vec![vec![0.8], vec![0.2]]),
                cpd("Risk", &["Signal"], vec![vec![0.9, 0.3], vec![0.1, 0.7]]),
            ],
            ..Default::default()
        }
    }

    fn validate(spec: &ModelSpec) -> Result<ValidatedModel, ConfigValidationError> {
        validate_model("t", spec, &GlobalSettings::default(), 1e-3)
    }

    #[test]
    fn test_valid_model_passes() {
        let v = validate(&two_node()).unwrap();
        assert_eq!(v.topo, vec![0, 1]);
        assert_eq!(v.parents[1], vec![0]);
        assert_eq!(v.risk_weights, vec![0.0, 1.0]);
    }

    #[test]
    fn test_cycle_rejected() {
        let mut spec = two_node();
        spec.edges.push(("Risk".into(), "Signal".into()));
        spec.cpds[0] = cpd("Signal", &["Risk"], vec![vec![0.5, 0.5], vec![0.5, 0.5]]);
        assert!(matches!(validate(&spec), Err(ConfigValidationError::Cycle(_))));
    }

    #[test]
    fn test_self_loop_is_cycle() {
        let mut spec = two_node();
        spec.edges.push(("Risk".into(), "Risk".into()));
        assert!(matches!(validate(&spec), Err(ConfigValidationError::Cycle(_))));
    }

    #[test]
    fn test_unknown_edge_endpoint() {
        let mut spec = two_node();
        spec.edges.push(("Ghost".into(), "Risk".into()));
        assert!(matches!(
            validate(&spec),
            Err(ConfigValidationError::UnknownEdgeEndpoint { .. })
        ));
    }

    #[test]
    fn test_empty_states() {
        let mut spec = two_node();
        spec.nodes[0].states.clear();
        assert_eq!(validate(&spec).unwrap_err(), ConfigValidationError::EmptyStates("Signal".into()));
    }

    #[test]
    fn test_column_sum_checked() {
        let mut spec = two_node();
        spec.cpds[1].values = vec![vec![0.9, 0.3], vec![0.2, 0.7]];
        assert!(matches!(
            validate(&spec),
            Err(ConfigValidationError::ColumnNotNormalized { column: 0, .. })
        ));
    }

    #[test]
    fn test_column_sum_within_tolerance_accepted() {
        let mut spec = two_node();
        spec.cpds[1].values = vec![vec![0.9004, 0.3], vec![0.1, 0.7]];
        assert!(validate(&spec).is_ok());
    }

    #[test]
    fn test_state_dimension_checked() {
        let mut spec = two_node();
        spec.cpds[1].values.push(vec![0.0, 0.0]);
        assert!(matches!(
            validate(&spec),
            Err(ConfigValidationError::CpdStateDimension { expected: 2, got: 3, .. })
        ));
    }

    #[test]
    fn test_parent_mismatch_checked() {
        let mut spec = two_node();
        spec.cpds[1] = cpd("Risk", &[], vec![vec![0.5], vec![0.5]]);
        assert!(matches!(
            validate(&spec),
            Err(ConfigValidationError::CpdParentMismatch { .. })
        ));
    }

    #[test]
    fn test_column_width_checked() {
        let mut spec = two_node();
        spec.cpds[1].values = vec![vec![0.9, 0.3, 0.5], vec![0.1, 0.7, 0.5]];
        assert!(matches!(
            validate(&spec),
            Err(ConfigValidationError::CpdColumnWidth { expected: 2, got: 3, .. })
        ));
    }

    #[test]
    fn test_missing_and_duplicate_cpd() {
        let mut spec = two_node();
        spec.cpds.pop();
        assert_eq!(validate(&spec).unwrap_err(), ConfigValidationError::MissingCpd("Risk".into()));

        let mut spec = two_node();
        spec.cpds.push(spec.cpds[0].clone());
        assert_eq!(validate(&spec).unwrap_err(), ConfigValidationError::DuplicateCpd("Signal".into()));
    }

    #[test]
    fn test_fallback_prior_checked() {
        let mut spec = two_node();
        spec.nodes[0].fallback_prior = Some(vec![0.5, 0.4]);
        assert!(matches!(
            validate(&spec),
            Err(ConfigValidationError::FallbackNotNormalized { .. })
        ));
        spec.nodes[0].fallback_prior = Some(vec![1.0]);
        assert!(matches!(
            validate(&spec),
            Err(ConfigValidationError::FallbackLength { expected: 2, got: 1, .. })
        ));
    }

    #[test]
    fn test_unknown_target() {
        let mut spec = two_node();
        spec.targets = vec!["Nope".into()];
        assert_eq!(validate(&spec).unwrap_err(), ConfigValidationError::UnknownTarget("Nope".into()));
    }

    #[test]
    fn test_risk_weights_checked() {
        let mut spec = two_node();
        spec.risk_state_weights = Some(vec![0.0, 0.5, 1.0]);
        assert!(matches!(
            validate(&spec),
            Err(ConfigValidationError::RiskWeightsLength { .. })
        ));
        spec.risk_state_weights = Some(vec![0.0, 2.0]);
        assert!(matches!(
            validate(&spec),
            Err(ConfigValidationError::RiskWeightOutOfRange(_))
        ));
    }

    #[test]
    fn test_evidence_order_defines_parent_order() {
        let spec = ModelSpec {
            targets: vec!["C".into()],
            nodes: vec![node("A", &["0", "1"]), node("B", &["0", "1", "2"]), node("C", &["0", "1"])],
            edges: vec![("A".into(), "C".into()), ("B".into(), "C".into())],
            cpds: vec![
                cpd("A", &[], vec![vec![0.5], vec![0.5]]),
                cpd("B", &[], vec![vec![0.2], vec![0.3], vec![0.5]]),
                cpd("C", &["B", "A"], vec![vec![0.5; 6], vec![0.5; 6]]),
            ],
            ..Default::default()
        };
        let v = validate(&spec).unwrap();
        assert_eq!(v.parents[2], vec![1, 0]);
    }

    #[test]
    fn test_invalid_global_settings_fail_document() {
        let mut doc = ModelDocument::default();
        doc.global_settings.risk_thresholds.high_risk = 1.5;
        assert!(load_document(&doc, &EngineConfig::default()).is_err());
    }

    #[test]
    fn test_rejected_core_typology_falls_back_to_builtin() {
        let mut doc = ModelDocument::default();
        let mut spec = two_node();
        spec.cpds.pop();
        doc.models.insert("spoofing".into(), spec.clone());
        doc.models.insert("custom_scheme".into(), spec);

        let outcome = load_document(&doc, &EngineConfig::default()).unwrap();
        let spoofing = &outcome.typologies["spoofing"];
        assert_eq!(spoofing.source, ModelSource::BuiltIn);
        assert!(spoofing.rejection.is_some());
        assert!(outcome.unavailable.contains_key("custom_scheme"));
        assert!(!outcome.typologies.contains_key("custom_scheme"));
        assert_eq!(outcome.rejections().len(), 2);
    }

    #[test]
    fn test_invalid_settings_on_disk_are_logged() {
        use crate::logging::capture;

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("models.json");
        let mut doc = defaults::builtin_document();
        doc.global_settings.risk_thresholds.low_risk = 0.9;
        std::fs::write(&path, serde_json::to_string(&doc).unwrap()).unwrap();

        capture::take();
        let outcome = load_from_path(&EngineConfig::with_path(path.to_string_lossy()));
        assert!(outcome.document_error.is_some());
        assert!(outcome.typologies.values().all(|t| t.source == ModelSource::BuiltIn));
        let events = capture::take();
        assert!(events
            .iter()
            .any(|(lvl, dom, ev)| *lvl == Level::Error && *dom == Domain::Config && ev == "config_rejected"));
    }

    #[test]
    fn test_missing_file_serves_builtins() {
        let cfg = EngineConfig::with_path("/nonexistent/tradewatch/models.json");
        let outcome = load_from_path(&cfg);
        assert!(outcome.document_error.is_some());
        for name in defaults::CORE_TYPOLOGIES {
            assert!(outcome.typologies.contains_key(*name), "missing {}", name);
        }
    }
}
