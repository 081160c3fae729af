use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use tradewatch::model::defaults::builtin_document;
use tradewatch::{CaseData, Engine, EngineConfig, RiskLevel, RiskThresholds};

const CASE: &str = r#"{
  "orders": {"cancel_ratio": 0.7, "layering_levels": 2, "book_imbalance": 0.75, "median_lifetime_ms": 900}
}"#;

#[test]
fn analyses_see_whole_snapshots_during_reloads() {
    let doc_a = builtin_document();
    let mut doc_b = builtin_document();
    doc_b.version = Some("b".into());
    doc_b.global_settings.risk_thresholds = RiskThresholds {
        low_risk: 0.1,
        medium_risk: 0.2,
        high_risk: 0.3,
    };
    let thresholds: Arc<HashMap<String, RiskThresholds>> = Arc::new(
        [
            (doc_a.fingerprint(), doc_a.global_settings.risk_thresholds),
            (doc_b.fingerprint(), doc_b.global_settings.risk_thresholds),
        ]
        .into_iter()
        .collect(),
    );

    let engine = Arc::new(Engine::with_defaults(EngineConfig::default()));
    let done = Arc::new(AtomicBool::new(false));
    let case = CaseData::from_json(CASE).unwrap();

    let reloader = {
        let engine = Arc::clone(&engine);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            let mut published = 0;
            for i in 0..200 {
                let doc = if i % 2 == 0 { &doc_b } else { &doc_a };
                if engine.reload_from_document(doc).is_ok() {
                    published += 1;
                }
            }
            done.store(true, Ordering::Relaxed);
            published
        })
    };

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            let thresholds = Arc::clone(&thresholds);
            let done = Arc::clone(&done);
            let case = case.clone();
            thread::spawn(move || {
                let mut last_generation = 0;
                let mut seen = 0;
                while !done.load(Ordering::Relaxed) || seen < 50 {
                    let r = engine.analyze("spoofing", &case).unwrap();
                    let t = &thresholds[&r.model_fingerprint];
                    assert_eq!(r.risk_level, RiskLevel::from_score(r.overall_score, t));
                    assert_eq!(r.escalate, r.overall_score >= t.high_risk);
                    assert!(r.model_generation >= last_generation);
                    last_generation = r.model_generation;
                    seen += 1;
                }
                seen
            })
        })
        .collect();

    let published = reloader.join().unwrap();
    for w in workers {
        assert!(w.join().unwrap() >= 50);
    }
    // The first swap goes from builtin to doc_b; every later one alternates.
    assert_eq!(published, 200);
    assert_eq!(engine.generation(), 201);
}

#[test]
fn held_snapshot_survives_a_reload() {
    let engine = Engine::with_defaults(EngineConfig::default());
    let held = engine.snapshot();

    let mut doc = builtin_document();
    doc.version = Some("next".into());
    engine.reload_from_document(&doc).unwrap();

    assert_eq!(held.generation, 1);
    assert_eq!(engine.generation(), 2);
    assert!(held.registry.contains("spoofing"));
    assert_ne!(held.fingerprint, engine.snapshot().fingerprint);
}
