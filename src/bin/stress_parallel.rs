//! Parallel stress test - concurrent analysis while the model is reloaded.
//!
//! Every answer is checked against the thresholds of the document whose
//! fingerprint it reports, so a request that saw a half-swapped model would
//! show up as a level/score disagreement.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use tradewatch::evidence::case::{
    CommsSignals, CounterpartyLinks, MarketImpact, MaterialEvent, OrderActivity, TradeActivity,
};
use tradewatch::model::defaults::{builtin_document, CORE_TYPOLOGIES};
use tradewatch::model::ModelDocument;
use tradewatch::{AnalysisResult, CaseData, Engine, EngineConfig, RiskLevel, RiskThresholds};

/// Present seven times in ten.
fn maybe<T>(rng: &mut StdRng, draw: impl FnOnce(&mut StdRng) -> T) -> Option<T> {
    if rng.gen_bool(0.7) {
        Some(draw(rng))
    } else {
        None
    }
}

fn random_case(rng: &mut StdRng, id: u64) -> CaseData {
    let mut case = CaseData {
        case_id: Some(format!("S-{id}")),
        ..Default::default()
    };
    let access = ["none", "potential", "clear"][rng.gen_range(0..3)];
    case.event = Some(MaterialEvent {
        access_level: maybe(rng, |_| access.to_string()),
        on_insider_list: maybe(rng, |r| r.gen_bool(0.2)),
        materiality_score: maybe(rng, |r| r.gen_range(0.0..1.0)),
    });
    case.trades = Some(TradeActivity {
        hours_before_event: maybe(rng, |r| r.gen_range(-48.0..400.0)),
        volume_vs_average: maybe(rng, |r| r.gen_range(0.0..10.0)),
        profit_pct: maybe(rng, |r| r.gen_range(-20.0..20.0)),
    });
    case.orders = Some(OrderActivity {
        cancel_ratio: maybe(rng, |r| r.gen_range(0.0..1.0)),
        layering_levels: maybe(rng, |r| r.gen_range(0..6)),
        book_imbalance: maybe(rng, |r| r.gen_range(0.0..1.0)),
        median_lifetime_ms: maybe(rng, |r| r.gen_range(10.0..60_000.0)),
        opposite_side_execution: maybe(rng, |r| r.gen_bool(0.5)),
    });
    case.comms = Some(CommsSignals {
        direct_insider_contact: maybe(rng, |r| r.gen_bool(0.1)),
        risk_markers: maybe(rng, |r| r.gen_range(0..4)),
    });
    case.market = Some(MarketImpact {
        physical_share: maybe(rng, |r| r.gen_range(0.0..0.8)),
        price_impact_pct: maybe(rng, |r| r.gen_range(-6.0..6.0)),
        minutes_from_benchmark_window: maybe(rng, |r| r.gen_range(-10.0..180.0)),
    });
    case.counterparty = Some(CounterpartyLinks {
        same_beneficial_owner: maybe(rng, |r| r.gen_bool(0.2)),
        linked_accounts: maybe(rng, |r| r.gen_bool(0.3)),
        self_match_ratio: maybe(rng, |r| r.gen_range(0.0..0.5)),
        net_position_change_pct: maybe(rng, |r| r.gen_range(-30.0..30.0)),
        round_trips: maybe(rng, |r| r.gen_range(0..10)),
    });
    if rng.gen_bool(0.2) {
        case.context.insert("public_news".to_string(), true);
    }
    case
}

fn check(result: &AnalysisResult, thresholds: &HashMap<String, RiskThresholds>) -> Result<()> {
    let t = thresholds
        .get(&result.model_fingerprint)
        .ok_or_else(|| anyhow!("unknown fingerprint {}", result.model_fingerprint))?;
    if !(0.0..=1.0).contains(&result.overall_score) || !(0.0..=1.0).contains(&result.esi_score) {
        return Err(anyhow!("score/esi out of range: {:?}", result));
    }
    if RiskLevel::from_score(result.overall_score, t) != result.risk_level {
        return Err(anyhow!(
            "level {:?} disagrees with score {} under generation {}",
            result.risk_level,
            result.overall_score,
            result.model_generation
        ));
    }
    for p in &result.posteriors {
        let sum: f64 = p.probabilities.iter().sum();
        if (sum - 1.0).abs() > 1e-3 {
            return Err(anyhow!("posterior of {} sums to {}", p.node, sum));
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    println!("=== PARALLEL STRESS TEST ===\n");

    let n_threads = num_cpus::get().min(8);
    let cases_per_thread = 2_000;

    // Two documents that differ in thresholds only.
    let doc_a = builtin_document();
    let mut doc_b: ModelDocument = builtin_document();
    doc_b.version = Some("stress-b".to_string());
    doc_b.global_settings.risk_thresholds = RiskThresholds {
        low_risk: 0.2,
        medium_risk: 0.35,
        high_risk: 0.5,
    };
    let thresholds: HashMap<String, RiskThresholds> = [
        (doc_a.fingerprint(), doc_a.global_settings.risk_thresholds),
        (doc_b.fingerprint(), doc_b.global_settings.risk_thresholds),
    ]
    .into_iter()
    .collect();
    let thresholds = Arc::new(thresholds);

    let engine = Arc::new(Engine::with_defaults(EngineConfig::default()));
    let done = Arc::new(AtomicBool::new(false));
    let analysed = Arc::new(AtomicU64::new(0));
    let failures = Arc::new(AtomicU64::new(0));

    println!("Threads: {}", n_threads);
    println!("Cases per thread: {}", cases_per_thread);
    println!();

    let start = Instant::now();

    let reloader = {
        let engine = Arc::clone(&engine);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            let mut swaps = 0u64;
            while !done.load(Ordering::Relaxed) {
                let doc = if swaps % 2 == 0 { &doc_b } else { &doc_a };
                if engine.reload_from_document(doc).is_ok() {
                    swaps += 1;
                }
                thread::sleep(Duration::from_millis(2));
            }
            swaps
        })
    };

    let mut handles = vec![];
    for t in 0..n_threads {
        let engine = Arc::clone(&engine);
        let thresholds = Arc::clone(&thresholds);
        let analysed = Arc::clone(&analysed);
        let failures = Arc::clone(&failures);
        handles.push(thread::spawn(move || {
            let mut rng = StdRng::seed_from_u64(t as u64);
            for i in 0..cases_per_thread {
                let case = random_case(&mut rng, (t * cases_per_thread + i) as u64);
                let typology = CORE_TYPOLOGIES[rng.gen_range(0..CORE_TYPOLOGIES.len())];
                match engine.analyze(typology, &case) {
                    Ok(result) => {
                        if let Err(e) = check(&result, &thresholds) {
                            eprintln!("invariant violated: {e}");
                            failures.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                    Err(e) => {
                        eprintln!("analysis failed: {e}");
                        failures.fetch_add(1, Ordering::Relaxed);
                    }
                }
                analysed.fetch_add(1, Ordering::Relaxed);
            }
        }));
    }

    for h in handles {
        h.join().map_err(|_| anyhow!("worker thread panicked"))?;
    }
    done.store(true, Ordering::Relaxed);
    let swaps = reloader.join().map_err(|_| anyhow!("reload thread panicked"))?;

    let total_time = start.elapsed();
    let n = analysed.load(Ordering::Relaxed);
    let failed = failures.load(Ordering::Relaxed);

    println!("=== Summary ===");
    println!("Total time: {:.2?}", total_time);
    println!("Cases analysed: {}", n);
    println!("Snapshot swaps: {}", swaps);
    println!("Final generation: {}", engine.generation());
    println!("Throughput: {:.0} cases/sec", n as f64 / total_time.as_secs_f64());

    if failed > 0 {
        return Err(anyhow!("{failed} invariant violations"));
    }
    println!("\n✓ Parallel stress test complete");
    Ok(())
}
