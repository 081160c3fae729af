use serde::Serialize;

use crate::config::{GlobalSettings, RiskThresholds};
use crate::esi::EsiReport;
use crate::evidence::SkippedSignal;
use crate::inference::InferenceResult;
use crate::logging::log_suppression;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Lower bound of each bucket is inclusive.
    pub fn from_score(score: f64, thresholds: &RiskThresholds) -> Self {
        if score >= thresholds.medium_risk {
            Self::High
        } else if score >= thresholds.low_risk {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub overall_score: f64,
    /// Score before context suppression.
    pub raw_score: f64,
    pub risk_level: RiskLevel,
    /// Score at or above `high_risk`.
    pub escalate: bool,
    pub suppression_factor: f64,
    pub suppressed_by: Vec<String>,
    pub evidence_narrative: String,
}

/// Turns a primary-target posterior into score, level and narrative.
#[derive(Debug, Clone)]
pub struct RiskAggregator {
    typology: String,
    thresholds: RiskThresholds,
    multipliers: Vec<(String, f64)>,
    state_weights: Vec<f64>,
}

impl RiskAggregator {
    pub fn new(typology: &str, settings: &GlobalSettings, state_weights: Vec<f64>) -> Self {
        Self {
            typology: typology.to_string(),
            thresholds: settings.risk_thresholds,
            multipliers: settings
                .context_multipliers
                .iter()
                .map(|(k, v)| (k.clone(), *v))
                .collect(),
            state_weights,
        }
    }

    pub fn thresholds(&self) -> &RiskThresholds {
        &self.thresholds
    }

    /// Expected state weight under the primary posterior.
    pub fn raw_score(&self, inference: &InferenceResult) -> f64 {
        let score: f64 = inference
            .primary()
            .probabilities
            .iter()
            .zip(&self.state_weights)
            .map(|(p, w)| p * w)
            .sum();
        score.clamp(0.0, 1.0)
    }

    /// Product of the multipliers of every active flag, and the flags that matched.
    pub fn suppression(&self, context_flags: &[String]) -> (f64, Vec<String>) {
        let mut factor = 1.0;
        let mut matched = Vec::new();
        for (flag, mult) in &self.multipliers {
            if context_flags.iter().any(|f| f == flag) {
                factor *= mult;
                matched.push(flag.clone());
            }
        }
        (factor, matched)
    }

    pub fn assess(
        &self,
        inference: &InferenceResult,
        esi: &EsiReport,
        context_flags: &[String],
        skipped: &[SkippedSignal],
    ) -> RiskAssessment {
        let raw_score = self.raw_score(inference);
        let (suppression_factor, suppressed_by) = self.suppression(context_flags);
        if !suppressed_by.is_empty() {
            log_suppression(&self.typology, raw_score, suppression_factor, &suppressed_by);
        }
        let overall_score = (raw_score * suppression_factor).clamp(0.0, 1.0);
        let risk_level = RiskLevel::from_score(overall_score, &self.thresholds);
        let escalate = overall_score >= self.thresholds.high_risk;

        let evidence_narrative = narrative(
            inference,
            esi,
            overall_score,
            risk_level,
            (suppression_factor, suppressed_by.as_slice()),
            skipped,
        );

        RiskAssessment {
            overall_score,
            raw_score,
            risk_level,
            escalate,
            suppression_factor,
            suppressed_by,
            evidence_narrative,
        }
    }
}

fn narrative(
    inference: &InferenceResult,
    esi: &EsiReport,
    score: f64,
    level: RiskLevel,
    suppression: (f64, &[String]),
    skipped: &[SkippedSignal],
) -> String {
    let mut parts = vec![format!(
        "{} risk ({:.2}) on {} evidence (ESI {:.2}).",
        level.as_str(),
        score,
        esi.quality.as_str(),
        esi.score
    )];

    let observed: Vec<String> = inference
        .usage
        .iter()
        .filter_map(|u| u.observed.as_ref().map(|s| format!("{}={}", u.node, s)))
        .collect();
    if observed.is_empty() {
        parts.push("No evidence node was observed.".to_string());
    } else {
        parts.push(format!("Observed: {}.", observed.join(", ")));
    }

    let defaulted = inference.fallback_nodes();
    if !defaulted.is_empty() {
        parts.push(format!("Fallback prior used for: {}.", defaulted.join(", ")));
    }

    if !skipped.is_empty() {
        let reasons: Vec<String> = skipped
            .iter()
            .map(|s| format!("{} ({})", s.node, s.reason))
            .collect();
        parts.push(format!("Signals not used: {}.", reasons.join(", ")));
    }

    let (factor, flags) = suppression;
    if !flags.is_empty() {
        parts.push(format!(
            "Score scaled by {:.2} for market context: {}.",
            factor,
            flags.join(", ")
        ));
    }

    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::esi::evidence_sufficiency;
    use crate::evidence::SkipReason;
    use crate::inference::{NodeUsage, Posterior};

    fn result(probabilities: Vec<f64>, usage: Vec<NodeUsage>) -> InferenceResult {
        let states = (0..probabilities.len()).map(|i| format!("S{i}")).collect();
        InferenceResult {
            posteriors: vec![Posterior {
                node: "Risk".into(),
                states,
                probabilities,
            }],
            usage,
        }
    }

    fn aggregator() -> RiskAggregator {
        RiskAggregator::new("t", &GlobalSettings::default(), vec![0.0, 0.5, 1.0])
    }

    #[test]
    fn test_threshold_boundaries() {
        let t = RiskThresholds::default();
        let eps = 1e-9;
        assert_eq!(RiskLevel::from_score(t.low_risk - eps, &t), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(t.low_risk, &t), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(t.medium_risk - eps, &t), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(t.medium_risk, &t), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(1.0, &t), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(0.0, &t), RiskLevel::Low);
    }

    #[test]
    fn test_raw_score_is_expected_weight() {
        let r = result(vec![0.2, 0.3, 0.5], vec![]);
        assert!((aggregator().raw_score(&r) - 0.65).abs() < 1e-12);
    }

    #[test]
    fn test_context_suppression_scales_before_thresholding() {
        let agg = aggregator();
        let r = result(vec![0.0, 0.2, 0.8], vec![]);
        let esi = evidence_sufficiency(&r.usage);
        let plain = agg.assess(&r, &esi, &[], &[]);
        assert_eq!(plain.risk_level, RiskLevel::High);
        assert!(plain.escalate);

        let news = agg.assess(&r, &esi, &["public_news".to_string()], &[]);
        assert!((news.overall_score - 0.45).abs() < 1e-12);
        assert_eq!(news.risk_level, RiskLevel::Medium);
        assert!(!news.escalate);
        assert_eq!(news.suppressed_by, vec!["public_news".to_string()]);
        assert!(news.evidence_narrative.contains("public_news"));
    }

    #[test]
    fn test_unknown_flags_are_ignored() {
        let (factor, matched) = aggregator().suppression(&["full_moon".to_string()]);
        assert_eq!(factor, 1.0);
        assert!(matched.is_empty());
    }

    #[test]
    fn test_multipliers_compound() {
        let (factor, matched) =
            aggregator().suppression(&["public_news".to_string(), "market_wide_move".to_string()]);
        assert!((factor - 0.35).abs() < 1e-12);
        assert_eq!(matched.len(), 2);
    }

    #[test]
    fn test_narrative_lists_observed_defaulted_and_skipped() {
        let usage = vec![
            NodeUsage { node: "MaterialInfo".into(), importance: 1.0, observed: Some("Clear access".into()) },
            NodeUsage { node: "CommsRisk".into(), importance: 1.0, observed: None },
        ];
        let r = result(vec![0.1, 0.3, 0.6], usage);
        let esi = evidence_sufficiency(&r.usage);
        let skipped = vec![SkippedSignal {
            node: "CommsRisk".into(),
            signal: "comms".into(),
            reason: SkipReason::Absent,
        }];
        let a = aggregator().assess(&r, &esi, &[], &skipped);
        assert!(a.evidence_narrative.contains("MaterialInfo=Clear access"));
        assert!(a.evidence_narrative.contains("Fallback prior used for: CommsRisk"));
        assert!(a.evidence_narrative.contains("CommsRisk (no data)"));
        assert!(a.evidence_narrative.starts_with(a.risk_level.as_str()));
    }
}
