//! Built-in networks for the core typologies.
//!
//! These are served when no configuration is available, and stand in for a
//! configured typology that fails validation. Intermediate tables are
//! generated from weighted parent influence rather than written out by hand:
//! each parent contributes its normalised state position, the weighted mean
//! places a peak over the child's states, and a small floor keeps every
//! combination possible.
//!
//! State lists are ordered from least to most suspicious throughout.

use crate::config::GlobalSettings;
use crate::model::{CpdSpec, ModelDocument, ModelSpec, NodeSpec};

pub const CORE_TYPOLOGIES: &[&str] = &[
    "insider_dealing",
    "spoofing",
    "commodity_manipulation",
    "wash_trading",
];

const LEVELS: [&str; 3] = ["Low", "Medium", "High"];
const COMMS: [&str; 3] = ["None", "Indirect", "Direct"];

/// Peak width over child states.
const SPREAD: f64 = 0.55;
/// Probability floor added to every cell before normalising.
const FLOOR: f64 = 0.01;

pub fn builtin_document() -> ModelDocument {
    ModelDocument {
        version: Some("builtin-1".to_string()),
        global_settings: GlobalSettings::default(),
        models: CORE_TYPOLOGIES
            .iter()
            .filter_map(|name| builtin_spec(name).map(|spec| (name.to_string(), spec)))
            .collect(),
    }
}

pub fn builtin_spec(typology: &str) -> Option<ModelSpec> {
    match typology {
        "insider_dealing" => Some(insider_dealing()),
        "spoofing" => Some(spoofing()),
        "commodity_manipulation" => Some(commodity_manipulation()),
        "wash_trading" => Some(wash_trading()),
        _ => None,
    }
}

fn insider_dealing() -> ModelSpec {
    SpecBuilder::new("Trading ahead of material non-public information", &["Risk", "LatentIntent"])
        .evidence("MaterialInfo", &["No access", "Potential access", "Clear access"], &[0.7, 0.25, 0.05], 1.0,
            "Access to the material information before publication")
        .evidence("CommsRisk", &COMMS, &[0.85, 0.12, 0.03], 0.8,
            "Communications linking the trader to an insider")
        .evidence("TradingTiming", &["Normal", "Suspicious", "Highly suspicious"], &[0.75, 0.2, 0.05], 0.9,
            "Proximity of the trades to the announcement")
        .evidence("PositionAnomaly", &["Normal", "Elevated", "Extreme"], &[0.8, 0.15, 0.05], 0.6,
            "Trade size relative to the account's usual activity")
        .evidence("ProfitMagnitude", &["Low", "Moderate", "High"], &[0.7, 0.2, 0.1], 0.5,
            "Profit made or loss avoided once the news broke")
        .derived("LatentIntent", &LEVELS, false, "Intent to exploit the information",
            &[("MaterialInfo", 0.6), ("CommsRisk", 0.4)])
        .derived("Risk", &LEVELS, false, "Insider dealing risk",
            &[("LatentIntent", 0.45), ("TradingTiming", 0.25), ("PositionAnomaly", 0.15), ("ProfitMagnitude", 0.15)])
        .build()
}

fn spoofing() -> ModelSpec {
    SpecBuilder::new("Orders placed without intent to execute", &["Risk", "LatentIntent"])
        .evidence("CancelRatio", &["Low", "Elevated", "Extreme"], &[0.7, 0.22, 0.08], 1.0,
            "Share of placed orders cancelled before execution")
        .evidence("OrderImbalance", &["Balanced", "Skewed", "Layered"], &[0.75, 0.18, 0.07], 0.8,
            "Depth imbalance and layering across price levels")
        .evidence("OrderLifetime", &["Normal", "Short", "Fleeting"], &[0.7, 0.2, 0.1], 0.7,
            "Median resting time of cancelled orders")
        .evidence("OppositeSideExecution", &["No", "Yes"], &[0.85, 0.15], 0.9,
            "Executions on the opposite side while the book was skewed")
        .derived("LatentIntent", &LEVELS, false, "Intent to mislead the order book",
            &[("CancelRatio", 0.4), ("OrderImbalance", 0.35), ("OrderLifetime", 0.25)])
        .derived("Risk", &LEVELS, false, "Spoofing risk",
            &[("LatentIntent", 0.65), ("OppositeSideExecution", 0.35)])
        .build()
}

fn commodity_manipulation() -> ModelSpec {
    SpecBuilder::new("Abuse of a dominant physical or derivative position", &["Risk"])
        .evidence("PhysicalPosition", &["Small", "Significant", "Dominant"], &[0.75, 0.2, 0.05], 1.0,
            "Share of deliverable supply controlled")
        .evidence("PriceImpact", &["Minimal", "Moderate", "Severe"], &[0.7, 0.22, 0.08], 0.8,
            "Price move attributable to the activity")
        .evidence("BenchmarkTiming", &["Outside window", "Near window", "In window"], &[0.7, 0.2, 0.1], 0.8,
            "Activity relative to the benchmark pricing window")
        .evidence("CommsRisk", &COMMS, &[0.85, 0.12, 0.03], 0.6,
            "Communications indicating coordination")
        .derived("MarketPower", &LEVELS, true, "Capacity to move the settlement price",
            &[("PhysicalPosition", 0.6), ("PriceImpact", 0.4)])
        .derived("Risk", &LEVELS, false, "Commodity manipulation risk",
            &[("MarketPower", 0.5), ("BenchmarkTiming", 0.3), ("CommsRisk", 0.2)])
        .build()
}

fn wash_trading() -> ModelSpec {
    SpecBuilder::new("Trades without change in beneficial ownership", &["Risk"])
        .evidence("BeneficialOwnership", &["Unrelated", "Linked", "Same"], &[0.8, 0.15, 0.05], 1.0,
            "Relationship between the two sides of the trades")
        .evidence("SelfMatchRate", &["Low", "Elevated", "High"], &[0.8, 0.15, 0.05], 0.8,
            "Share of volume matched against related accounts")
        .evidence("NetPositionChange", &["Material", "Minimal", "None"], &[0.75, 0.18, 0.07], 0.6,
            "Net position change over the reviewed period")
        .evidence("RoundTripPattern", &["Absent", "Occasional", "Systematic"], &[0.8, 0.15, 0.05], 0.7,
            "Buy/sell round trips at matching prices")
        .derived("Risk", &LEVELS, false, "Wash trading risk",
            &[("BeneficialOwnership", 0.35), ("SelfMatchRate", 0.25), ("NetPositionChange", 0.2), ("RoundTripPattern", 0.2)])
        .build()
}

struct SpecBuilder {
    spec: ModelSpec,
}

impl SpecBuilder {
    fn new(description: &str, targets: &[&str]) -> Self {
        Self {
            spec: ModelSpec {
                description: Some(description.to_string()),
                targets: targets.iter().map(|t| t.to_string()).collect(),
                ..Default::default()
            },
        }
    }

    fn evidence(mut self, name: &str, states: &[&str], prior: &[f64], importance: f64, description: &str) -> Self {
        self.spec.nodes.push(NodeSpec {
            name: name.to_string(),
            states: states.iter().map(|s| s.to_string()).collect(),
            description: Some(description.to_string()),
            fallback_prior: Some(prior.to_vec()),
            importance: Some(importance),
            latent: false,
        });
        self.spec.cpds.push(CpdSpec {
            variable: name.to_string(),
            evidence: Vec::new(),
            values: prior.iter().map(|p| vec![*p]).collect(),
        });
        self
    }

    fn derived(mut self, name: &str, states: &[&str], latent: bool, description: &str, parents: &[(&str, f64)]) -> Self {
        let cards: Vec<usize> = parents
            .iter()
            .map(|(p, _)| {
                self.spec
                    .nodes
                    .iter()
                    .find(|n| n.name == *p)
                    .map(|n| n.states.len())
                    .unwrap_or(1)
            })
            .collect();
        let weights: Vec<f64> = parents.iter().map(|(_, w)| *w).collect();

        self.spec.nodes.push(NodeSpec {
            name: name.to_string(),
            states: states.iter().map(|s| s.to_string()).collect(),
            description: Some(description.to_string()),
            fallback_prior: None,
            importance: None,
            latent,
        });
        for (p, _) in parents {
            self.spec.edges.push((p.to_string(), name.to_string()));
        }
        self.spec.cpds.push(CpdSpec {
            variable: name.to_string(),
            evidence: parents.iter().map(|(p, _)| p.to_string()).collect(),
            values: graded_table(states.len(), &cards, &weights),
        });
        self
    }

    fn build(self) -> ModelSpec {
        self.spec
    }
}

/// Table whose mass moves toward higher child states as the weighted,
/// normalised parent states grow. Columns follow the last-parent-fastest layout.
pub fn graded_table(child_states: usize, parent_cards: &[usize], weights: &[f64]) -> Vec<Vec<f64>> {
    let columns: usize = parent_cards.iter().product();
    let weight_sum: f64 = weights.iter().sum::<f64>().max(f64::EPSILON);
    let mut values = vec![vec![0.0; columns]; child_states];
    let mut assignment = vec![0usize; parent_cards.len()];

    for column in 0..columns {
        let severity: f64 = assignment
            .iter()
            .zip(parent_cards)
            .zip(weights)
            .map(|((&s, &card), &w)| {
                let pos = if card > 1 { s as f64 / (card - 1) as f64 } else { 0.0 };
                w * pos
            })
            .sum::<f64>()
            / weight_sum;

        let centre = severity * (child_states.saturating_sub(1)) as f64;
        let raw: Vec<f64> = (0..child_states)
            .map(|j| {
                let d = j as f64 - centre;
                (-(d * d) / (2.0 * SPREAD * SPREAD)).exp() + FLOOR
            })
            .collect();
        let total: f64 = raw.iter().sum();
        for (j, r) in raw.iter().enumerate() {
            values[j][column] = r / total;
        }

        for pos in (0..assignment.len()).rev() {
            assignment[pos] += 1;
            if assignment[pos] < parent_cards[pos] {
                break;
            }
            assignment[pos] = 0;
        }
    }
    values
}
