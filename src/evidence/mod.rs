//! Evidence mapping: raw case data to a partial assignment of node states.
//!
//! Mapping is pure. A signal that is absent, below the confidence threshold
//! or not expressible in the node's states leaves the node unset.

pub mod case;
pub mod rules;

mod commodity;
mod insider;
mod spoofing;
mod wash;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::Network;
use case::{CaseData, StateRef};
use rules::{Reading, SignalRule};

/// Node id to observed state index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EvidenceAssignment(BTreeMap<String, usize>);

impl EvidenceAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, node: impl Into<String>, state: usize) {
        self.0.insert(node.into(), state);
    }

    pub fn get(&self, node: &str) -> Option<usize> {
        self.0.get(node).copied()
    }

    pub fn contains(&self, node: &str) -> bool {
        self.0.contains_key(node)
    }

    pub fn remove(&mut self, node: &str) -> Option<usize> {
        self.0.remove(node)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: Into<String>> FromIterator<(K, usize)> for EvidenceAssignment {
    fn from_iter<T: IntoIterator<Item = (K, usize)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    Absent,
    LowConfidence { confidence: f64, threshold: f64 },
    Unmappable { value: String },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Absent => write!(f, "no data"),
            SkipReason::LowConfidence { confidence, threshold } => {
                write!(f, "confidence {confidence:.2} below {threshold:.2}")
            }
            SkipReason::Unmappable { value } => write!(f, "`{value}` matches no state"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedSignal {
    pub node: String,
    pub signal: String,
    #[serde(flatten)]
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvidenceMapping {
    pub assignment: EvidenceAssignment,
    pub skipped: Vec<SkippedSignal>,
}

/// Closed set of mapping rule tables, dispatched by typology name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvidenceMapper {
    InsiderDealing,
    Spoofing,
    CommodityManipulation,
    WashTrading,
    /// Direct evidence only; used for typologies declared purely in config.
    Generic,
}

impl EvidenceMapper {
    pub fn for_typology(typology: &str) -> Self {
        match typology {
            "insider_dealing" => Self::InsiderDealing,
            "spoofing" => Self::Spoofing,
            "commodity_manipulation" => Self::CommodityManipulation,
            "wash_trading" => Self::WashTrading,
            _ => Self::Generic,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::InsiderDealing => "insider_dealing",
            Self::Spoofing => "spoofing",
            Self::CommodityManipulation => "commodity_manipulation",
            Self::WashTrading => "wash_trading",
            Self::Generic => "generic",
        }
    }

    pub fn rules(&self) -> &'static [SignalRule] {
        match self {
            Self::InsiderDealing => insider::RULES,
            Self::Spoofing => spoofing::RULES,
            Self::CommodityManipulation => commodity::RULES,
            Self::WashTrading => wash::RULES,
            Self::Generic => &[],
        }
    }

    /// Quantise the case into the network's evidence nodes.
    pub fn map(&self, case: &CaseData, network: &Network, min_confidence: f64) -> EvidenceMapping {
        let mut out = EvidenceMapping::default();

        for rule in self.rules() {
            let Some(node) = network
                .node_index(rule.node)
                .filter(|&i| network.is_evidence_node(i))
                .map(|i| network.node(i))
            else {
                // Configured model dropped this node.
                continue;
            };
            if out.assignment.contains(rule.node) {
                continue;
            }

            let skip = |reason| SkippedSignal {
                node: rule.node.to_string(),
                signal: rule.signal.to_string(),
                reason,
            };

            if let Some(&confidence) = case.signal_confidence.get(rule.signal) {
                if !(confidence >= min_confidence) {
                    out.skipped.push(skip(SkipReason::LowConfidence {
                        confidence,
                        threshold: min_confidence,
                    }));
                    continue;
                }
            }

            match (rule.read)(case) {
                None => out.skipped.push(skip(SkipReason::Absent)),
                Some(Reading::Level(level)) if level < node.state_count() => {
                    out.assignment.set(rule.node, level);
                }
                Some(Reading::Level(level)) => out.skipped.push(skip(SkipReason::Unmappable {
                    value: level.to_string(),
                })),
                Some(Reading::Label(label)) => match resolve_label(&node.states, &label) {
                    Some(state) => out.assignment.set(rule.node, state),
                    None => out.skipped.push(skip(SkipReason::Unmappable { value: label })),
                },
            }
        }

        let mut rejected_overrides = Vec::new();
        for (name, state) in &case.direct_evidence {
            match state {
                StateRef::Index(idx) => {
                    out.assignment.set(name.clone(), *idx);
                }
                StateRef::Label(label) => {
                    match network.node_by_id(name).and_then(|n| resolve_label(&n.states, label)) {
                        Some(idx) => out.assignment.set(name.clone(), idx),
                        // Any state mapped from a signal stays in place.
                        None => rejected_overrides.push(SkippedSignal {
                            node: name.clone(),
                            signal: "direct_evidence".to_string(),
                            reason: SkipReason::Unmappable { value: label.clone() },
                        }),
                    }
                }
            }
        }

        // Rules that fired for a node later overridden are not skips.
        out.skipped.retain(|s| !out.assignment.contains(&s.node));
        out.skipped.extend(rejected_overrides);
        out
    }
}

/// Exact label match first, then the first word ("clear" for "Clear access").
fn resolve_label(states: &[String], label: &str) -> Option<usize> {
    let wanted = label.trim();
    if wanted.is_empty() {
        return None;
    }
    if let Some(i) = states.iter().position(|s| s.eq_ignore_ascii_case(wanted)) {
        return Some(i);
    }
    let mut hits = states.iter().enumerate().filter(|(_, s)| {
        s.split_whitespace()
            .next()
            .is_some_and(|w| w.eq_ignore_ascii_case(wanted))
    });
    match (hits.next(), hits.next()) {
        (Some((i, _)), None) => Some(i),
        _ => None,
    }
}
