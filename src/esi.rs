//! Evidence sufficiency index.
//!
//! Share of importance-weighted evidence nodes that were observed rather
//! than filled from their fallback prior. Observing one more node can only
//! add to the numerator, so the index is monotonic in the evidence.

use serde::Serialize;

use crate::inference::NodeUsage;

const STRONG_FROM: f64 = 0.7;
const MODERATE_FROM: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceQuality {
    Strong,
    Moderate,
    Limited,
}

impl EvidenceQuality {
    pub fn from_esi(esi: f64) -> Self {
        if esi >= STRONG_FROM {
            Self::Strong
        } else if esi >= MODERATE_FROM {
            Self::Moderate
        } else {
            Self::Limited
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strong => "strong",
            Self::Moderate => "moderate",
            Self::Limited => "limited",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EsiReport {
    pub score: f64,
    pub observed_weight: f64,
    pub total_weight: f64,
    pub observed_nodes: usize,
    pub fallback_nodes: usize,
    pub quality: EvidenceQuality,
}

/// ESI over an inference usage record. Zero when no node carries weight.
pub fn evidence_sufficiency(usage: &[NodeUsage]) -> EsiReport {
    let mut observed_weight = 0.0;
    let mut total_weight = 0.0;
    let mut observed_nodes = 0;
    for u in usage {
        let w = u.importance.max(0.0);
        total_weight += w;
        if !u.used_fallback() {
            observed_weight += w;
            observed_nodes += 1;
        }
    }
    let score = if total_weight > 0.0 {
        (observed_weight / total_weight).clamp(0.0, 1.0)
    } else {
        0.0
    };
    EsiReport {
        score,
        observed_weight,
        total_weight,
        observed_nodes,
        fallback_nodes: usage.len() - observed_nodes,
        quality: EvidenceQuality::from_esi(score),
    }
}
