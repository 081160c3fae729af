use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use tradewatch::config::GlobalSettings;
use tradewatch::esi::evidence_sufficiency;
use tradewatch::evidence::EvidenceAssignment;
use tradewatch::inference::infer;
use tradewatch::model::defaults::{builtin_spec, CORE_TYPOLOGIES};
use tradewatch::model::loader::validate_model;
use tradewatch::model::{ModelSource, Network};

const TOL: f64 = 1e-3;

fn builtin(name: &str) -> Network {
    let settings = GlobalSettings::default();
    let spec = builtin_spec(name).unwrap();
    let valid = validate_model(name, &spec, &settings, TOL).unwrap();
    Network::from_validated(valid, &settings, ModelSource::BuiltIn)
}

fn random_assignment(net: &Network, rng: &mut StdRng) -> EvidenceAssignment {
    let mut ev = EvidenceAssignment::new();
    for idx in net.evidence_nodes() {
        if rng.gen_bool(0.5) {
            let node = net.node(idx);
            ev.set(node.id.clone(), rng.gen_range(0..node.state_count()));
        }
    }
    ev
}

#[test]
fn posteriors_are_distributions_under_random_evidence() {
    let mut rng = StdRng::seed_from_u64(7);
    for name in CORE_TYPOLOGIES {
        let net = builtin(name);
        for _ in 0..200 {
            let ev = random_assignment(&net, &mut rng);
            let result = infer(&net, &ev, TOL).unwrap();
            for p in &result.posteriors {
                let sum: f64 = p.probabilities.iter().sum();
                assert!((sum - 1.0).abs() < 1e-9, "{name}: {} sums to {sum}", p.node);
                assert!(p.probabilities.iter().all(|&x| (0.0..=1.0).contains(&x)));
            }
            assert_eq!(result.observed_nodes().len(), ev.len());
        }
    }
}

#[test]
fn esi_grows_with_evidence() {
    let mut rng = StdRng::seed_from_u64(11);
    for name in CORE_TYPOLOGIES {
        let net = builtin(name);
        for _ in 0..100 {
            let larger = random_assignment(&net, &mut rng);
            let mut smaller = larger.clone();
            let dropped: Vec<String> = larger
                .iter()
                .filter(|_| rng.gen_bool(0.5))
                .map(|(node, _)| node.to_string())
                .collect();
            for node in &dropped {
                smaller.remove(node);
            }

            let big = evidence_sufficiency(&infer(&net, &larger, TOL).unwrap().usage);
            let small = evidence_sufficiency(&infer(&net, &smaller, TOL).unwrap().usage);
            assert!(small.score <= big.score + 1e-12, "{name}: {} > {}", small.score, big.score);
            assert!((0.0..=1.0).contains(&big.score));
        }
    }
}

#[test]
fn inference_is_deterministic() {
    let net = builtin("spoofing");
    let mut rng = StdRng::seed_from_u64(3);
    let ev = random_assignment(&net, &mut rng);
    let a = infer(&net, &ev, TOL).unwrap();
    let b = infer(&net, &ev, TOL).unwrap();
    assert_eq!(a.posteriors, b.posteriors);
}

#[test]
fn clear_access_beats_withheld_access() {
    let net = builtin("insider_dealing");
    let withheld = infer(&net, &EvidenceAssignment::new(), TOL).unwrap();
    let clear: EvidenceAssignment = [("MaterialInfo", 2)].into_iter().collect();
    let clear = infer(&net, &clear, TOL).unwrap();
    let none: EvidenceAssignment = [("MaterialInfo", 0)].into_iter().collect();
    let none = infer(&net, &none, TOL).unwrap();

    let high = |r: &tradewatch::inference::InferenceResult| r.primary().probabilities[2];
    assert!(high(&clear) > high(&withheld));
    assert!(high(&withheld) > high(&none));
}

#[test]
fn every_evidence_node_is_reported_once() {
    for name in CORE_TYPOLOGIES {
        let net = builtin(name);
        let result = infer(&net, &EvidenceAssignment::new(), TOL).unwrap();
        assert_eq!(result.usage.len(), net.evidence_nodes().count());
        assert_eq!(result.fallback_nodes().len(), result.usage.len());
    }
}
