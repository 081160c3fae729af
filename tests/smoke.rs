//! Smoke tests: end-to-end analysis through the public engine API.

use std::path::PathBuf;

use tempfile::TempDir;

use tradewatch::model::defaults::CORE_TYPOLOGIES;
use tradewatch::model::ModelDocument;
use tradewatch::{CaseData, Engine, EngineConfig, EngineError, RiskLevel, RiskThresholds};

fn missing_config_engine() -> (TempDir, Engine) {
    let dir = TempDir::new().unwrap();
    let path: PathBuf = dir.path().join("absent.json");
    let engine = Engine::load(EngineConfig::with_path(path.to_string_lossy()));
    (dir, engine)
}

fn case(json: &str) -> CaseData {
    CaseData::from_json(json).unwrap()
}

/// Single-parent model matching the documented MaterialInfo scenario.
const MATERIAL_INFO_DOC: &str = r#"{
  "models": {
    "access_only": {
      "nodes": [
        {"name": "MaterialInfo", "states": ["No access", "Potential access", "Clear access"],
         "fallback_prior": [0.7, 0.25, 0.05]},
        {"name": "Risk", "states": ["Low", "Medium", "High"]}
      ],
      "edges": [["MaterialInfo", "Risk"]],
      "cpds": [
        {"variable": "MaterialInfo", "values": [[0.7], [0.25], [0.05]]},
        {"variable": "Risk", "evidence": ["MaterialInfo"],
         "values": [[0.8, 0.5, 0.1], [0.15, 0.35, 0.3], [0.05, 0.15, 0.6]]}
      ]
    }
  }
}"#;

#[test]
fn s01_missing_config_serves_core_typologies() {
    let (_dir, engine) = missing_config_engine();
    let t = RiskThresholds::default();
    for typology in CORE_TYPOLOGIES {
        let r = engine.analyze(typology, &CaseData::default()).unwrap();
        assert!((0.0..=1.0).contains(&r.overall_score));
        assert!((0.0..=1.0).contains(&r.esi_score));
        assert_eq!(r.risk_level, RiskLevel::from_score(r.overall_score, &t));
        assert!(!r.fallback_nodes_used.is_empty());
        assert!(!r.evidence_narrative.is_empty());
    }
    assert!(engine.snapshot().document_error.is_some());
}

#[test]
fn s02_clear_access_raises_high_risk_probability() {
    let doc = ModelDocument::from_json(MATERIAL_INFO_DOC).unwrap();
    let engine = Engine::from_document(&doc, EngineConfig::default()).unwrap();

    let withheld = engine.analyze("access_only", &CaseData::default()).unwrap();
    let clear = engine
        .analyze("access_only", &case(r#"{"direct_evidence": {"MaterialInfo": "Clear access"}}"#))
        .unwrap();

    let high = |r: &tradewatch::AnalysisResult| r.posteriors[0].probabilities[2];
    // Withheld: 0.7*0.05 + 0.25*0.15 + 0.05*0.6
    assert!((high(&withheld) - 0.1025).abs() < 1e-9);
    assert!((high(&clear) - 0.6).abs() < 1e-9);
    assert!(high(&clear) > high(&withheld));
    assert_eq!(clear.observed_nodes, vec!["MaterialInfo".to_string()]);
    assert_eq!(withheld.fallback_nodes_used, vec!["MaterialInfo".to_string()]);
}

#[test]
fn s03_builtin_insider_case_end_to_end() {
    let (_dir, engine) = missing_config_engine();
    let strong = case(
        r#"{
          "case_id": "INS-001",
          "event": {"access_level": "clear", "materiality_score": 0.9},
          "trades": {"hours_before_event": 6, "volume_vs_average": 7.5, "profit_pct": 18},
          "comms": {"direct_insider_contact": true}
        }"#,
    );
    let weak = case(
        r#"{
          "case_id": "INS-002",
          "event": {"access_level": "none", "materiality_score": 0.9},
          "trades": {"hours_before_event": 900, "volume_vs_average": 1.0, "profit_pct": 0.5},
          "comms": {"direct_insider_contact": false, "risk_markers": 0}
        }"#,
    );
    let s = engine.analyze("insider_dealing", &strong).unwrap();
    let w = engine.analyze("insider_dealing", &weak).unwrap();

    assert_eq!(s.case_id.as_deref(), Some("INS-001"));
    assert!(s.overall_score > w.overall_score);
    assert_eq!(s.esi_score, 1.0);
    assert!(s.fallback_nodes_used.is_empty());
    assert_eq!(s.risk_level, RiskLevel::High);
    assert_eq!(w.risk_level, RiskLevel::Low);
    assert_eq!(s.posteriors.len(), 2);
    assert_eq!(s.posteriors[1].node, "LatentIntent");
}

#[test]
fn s04_partial_evidence_lowers_esi_only() {
    let (_dir, engine) = missing_config_engine();
    let partial = case(r#"{"orders": {"cancel_ratio": 0.95, "median_lifetime_ms": 120}}"#);
    let r = engine.analyze("spoofing", &partial).unwrap();
    assert!(r.esi_score > 0.0 && r.esi_score < 1.0);
    assert_eq!(r.observed_nodes.len(), 2);
    assert!(r.fallback_nodes_used.contains(&"OppositeSideExecution".to_string()));
    assert!(r.evidence_narrative.contains("CancelRatio=Extreme"));
}

#[test]
fn s05_market_context_suppresses_score() {
    let (_dir, engine) = missing_config_engine();
    let base = r#""orders": {"cancel_ratio": 0.95, "layering_levels": 5, "median_lifetime_ms": 100, "opposite_side_execution": true}"#;
    let plain = engine.analyze("spoofing", &case(&format!("{{{base}}}"))).unwrap();
    let news = engine
        .analyze("spoofing", &case(&format!(r#"{{{base}, "context": {{"market_wide_move": true}}}}"#)))
        .unwrap();
    assert!((news.overall_score - plain.overall_score * 0.7).abs() < 1e-9);
    assert_eq!(news.raw_score, plain.raw_score);
    assert_eq!(news.suppressed_by, vec!["market_wide_move".to_string()]);
}

#[test]
fn s06_out_of_range_evidence_fails_closed() {
    let (_dir, engine) = missing_config_engine();
    let err = engine
        .analyze("wash_trading", &case(r#"{"direct_evidence": {"SelfMatchRate": 3}}"#))
        .unwrap_err();
    match err {
        EngineError::EvidenceRange { typology, node, state, states } => {
            assert_eq!(typology, "wash_trading");
            assert_eq!(node, "SelfMatchRate");
            assert_eq!((state, states), (3, 3));
        }
        other => panic!("expected range error, got {other}"),
    }
}

#[test]
fn s07_unknown_typology_and_unknown_node() {
    let (_dir, engine) = missing_config_engine();
    assert!(matches!(
        engine.analyze("marking_the_close", &CaseData::default()),
        Err(EngineError::UnknownTypology(_))
    ));
    assert!(matches!(
        engine.analyze("spoofing", &case(r#"{"direct_evidence": {"Nonexistent": 0}}"#)),
        Err(EngineError::UnknownEvidenceNode { .. })
    ));
}

#[test]
fn s08_threshold_boundary_is_inclusive_upward() {
    // Root target with prior [0.4, 0.6] and weights [0, 1] scores exactly 0.6.
    let doc_at = |high: f64| {
        let low = 1.0 - high;
        ModelDocument::from_json(&format!(
            r#"{{"models": {{"edge": {{
                "risk_state_weights": [0.0, 1.0],
                "nodes": [{{"name": "Risk", "states": ["Low", "High"]}}],
                "cpds": [{{"variable": "Risk", "values": [[{low}], [{high}]]}}]
            }}}}}}"#
        ))
        .unwrap()
    };
    let at = Engine::from_document(&doc_at(0.6), EngineConfig::default()).unwrap();
    let r = at.analyze("edge", &CaseData::default()).unwrap();
    assert_eq!(r.overall_score, 0.6);
    assert_eq!(r.risk_level, RiskLevel::High);
    assert_eq!(r.esi_score, 0.0);

    let below = Engine::from_document(&doc_at(0.59), EngineConfig::default()).unwrap();
    let r = below.analyze("edge", &CaseData::default()).unwrap();
    assert_eq!(r.risk_level, RiskLevel::Medium);
}

#[test]
fn s09_low_confidence_signal_is_skipped() {
    let (_dir, engine) = missing_config_engine();
    let c = case(
        r#"{"market": {"physical_share": 0.7},
            "signal_confidence": {"market.physical_share": 0.1}}"#,
    );
    let r = engine.analyze("commodity_manipulation", &c).unwrap();
    assert!(r.fallback_nodes_used.contains(&"PhysicalPosition".to_string()));
    assert!(r
        .skipped_signals
        .iter()
        .any(|s| s.node == "PhysicalPosition" && s.signal == "market.physical_share"));
}
