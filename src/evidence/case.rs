//! Raw case data as handed over by upstream processing.
//!
//! Every signal is optional: a missing group or a missing field simply means
//! the corresponding node stays unset.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaseData {
    pub case_id: Option<String>,
    pub event: Option<MaterialEvent>,
    pub trades: Option<TradeActivity>,
    pub orders: Option<OrderActivity>,
    pub comms: Option<CommsSignals>,
    pub market: Option<MarketImpact>,
    pub counterparty: Option<CounterpartyLinks>,
    /// Corroborating context, e.g. `public_news: true`.
    pub context: BTreeMap<String, bool>,
    /// Upstream confidence per signal key (`"trades.hours_before_event"`).
    pub signal_confidence: BTreeMap<String, f64>,
    /// Explicit node states that override mapped signals.
    pub direct_evidence: BTreeMap<String, StateRef>,
}

/// A node state given by position or by label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateRef {
    Index(usize),
    Label(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialEvent {
    /// "none", "potential" or "clear", or a full state label.
    pub access_level: Option<String>,
    pub on_insider_list: Option<bool>,
    /// 0..1; events below 0.25 are treated as immaterial.
    pub materiality_score: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TradeActivity {
    /// Negative when the trades followed the announcement.
    pub hours_before_event: Option<f64>,
    /// Traded volume over the account's trailing average.
    pub volume_vs_average: Option<f64>,
    /// Profit made or loss avoided, in percent of notional.
    pub profit_pct: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderActivity {
    pub cancel_ratio: Option<f64>,
    pub layering_levels: Option<u32>,
    /// 0 = balanced book, 1 = entirely one-sided.
    pub book_imbalance: Option<f64>,
    pub median_lifetime_ms: Option<f64>,
    pub opposite_side_execution: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommsSignals {
    pub direct_insider_contact: Option<bool>,
    pub risk_markers: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketImpact {
    /// Share of deliverable supply held.
    pub physical_share: Option<f64>,
    pub price_impact_pct: Option<f64>,
    /// Zero or negative inside the window.
    pub minutes_from_benchmark_window: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterpartyLinks {
    pub same_beneficial_owner: Option<bool>,
    pub linked_accounts: Option<bool>,
    pub self_match_ratio: Option<f64>,
    pub net_position_change_pct: Option<f64>,
    pub round_trips: Option<u32>,
}

impl CaseData {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Context flags reported as present.
    pub fn active_context_flags(&self) -> Vec<String> {
        self.context
            .iter()
            .filter(|(_, on)| **on)
            .map(|(flag, _)| flag.clone())
            .collect()
    }
}
