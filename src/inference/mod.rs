//! Exact inference by variable elimination.
//!
//! Observed nodes are hard-conditioned. Unset evidence roots are summed out
//! under their fallback prior. Unset evidence nodes with parents receive
//! virtual evidence, fitted jointly so that each one's marginal matches its
//! fallback. Latent nodes are summed out through their cpds.

pub mod factor;

use serde::Serialize;

use crate::errors::EngineError;
use crate::evidence::EvidenceAssignment;
use serde_json::json;

use crate::logging::{log, log_model_defect, obj, v_num, v_str, Domain, Level, ProfileScope};
use crate::model::Network;
use factor::Factor;

/// Posterior marginal of one node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Posterior {
    pub node: String,
    pub states: Vec<String>,
    pub probabilities: Vec<f64>,
}

impl Posterior {
    pub fn probability_of(&self, state: &str) -> Option<f64> {
        self.states
            .iter()
            .position(|s| s.eq_ignore_ascii_case(state))
            .map(|i| self.probabilities[i])
    }

    /// Most probable state label.
    pub fn mode(&self) -> &str {
        let mut best = 0;
        for (i, p) in self.probabilities.iter().enumerate() {
            if *p > self.probabilities[best] {
                best = i;
            }
        }
        &self.states[best]
    }
}

/// Whether an evidence node was observed or fell back to its prior.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeUsage {
    pub node: String,
    pub importance: f64,
    /// Observed state label; `None` when the fallback prior was used.
    pub observed: Option<String>,
}

impl NodeUsage {
    pub fn used_fallback(&self) -> bool {
        self.observed.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InferenceResult {
    /// One per target, primary first.
    pub posteriors: Vec<Posterior>,
    /// One per evidence node plus any observed target or latent node, in
    /// declaration order.
    pub usage: Vec<NodeUsage>,
}

impl InferenceResult {
    pub fn primary(&self) -> &Posterior {
        &self.posteriors[0]
    }

    pub fn posterior(&self, node: &str) -> Option<&Posterior> {
        self.posteriors.iter().find(|p| p.node == node)
    }

    pub fn fallback_nodes(&self) -> Vec<String> {
        self.usage
            .iter()
            .filter(|u| u.used_fallback())
            .map(|u| u.node.clone())
            .collect()
    }

    pub fn observed_nodes(&self) -> Vec<String> {
        self.usage
            .iter()
            .filter(|u| !u.used_fallback())
            .map(|u| u.node.clone())
            .collect()
    }
}

/// Posterior of every target of `network` given `evidence`.
pub fn infer(
    network: &Network,
    evidence: &EvidenceAssignment,
    tolerance: f64,
) -> Result<InferenceResult, EngineError> {
    let _scope = ProfileScope::with_context("inference", &[("typology", v_str(network.name()))]);

    let conditioned = Conditioned::build(network, evidence, tolerance)?;

    let mut posteriors = Vec::with_capacity(network.targets().len());
    for &target in network.targets() {
        let node = network.node(target);
        let probabilities = match conditioned.observed[target] {
            Some(state) => {
                let weight = conditioned.evidence_weight();
                if !weight.is_finite() || weight <= 0.0 {
                    return Err(numeric_failure(
                        network,
                        target,
                        format!("observed state has evidence weight {weight}"),
                    ));
                }
                (0..node.state_count()).map(|s| if s == state { 1.0 } else { 0.0 }).collect()
            }
            None => conditioned.marginal(target)?,
        };
        posteriors.push(Posterior {
            node: node.id.clone(),
            states: node.states.clone(),
            probabilities,
        });
    }

    let usage = (0..network.node_count())
        .filter(|&i| network.is_evidence_node(i) || conditioned.observed[i].is_some())
        .map(|i| {
            let node = network.node(i);
            NodeUsage {
                node: node.id.clone(),
                importance: node.importance,
                observed: conditioned.observed[i].map(|s| node.states[s].clone()),
            }
        })
        .collect();

    Ok(InferenceResult { posteriors, usage })
}

/// Sweeps of the joint soft-evidence fit before giving up on convergence.
const MAX_FIT_SWEEPS: usize = 200;
/// Largest gap between a soft node's marginal and its fallback accepted as converged.
const FIT_EPSILON: f64 = 1e-10;

/// Factors of the kept subnetwork with all evidence applied.
struct Conditioned<'a> {
    network: &'a Network,
    factors: Vec<Factor>,
    /// Elimination order, leaves first.
    order: Vec<usize>,
    observed: Vec<Option<usize>>,
    tolerance: f64,
}

impl<'a> Conditioned<'a> {
    fn build(network: &'a Network, evidence: &EvidenceAssignment, tolerance: f64) -> Result<Self, EngineError> {
        let observed = resolve_evidence(network, evidence)?;
        let unset_evidence = |i: usize| observed[i].is_none() && network.is_evidence_node(i);

        let mut seeds: Vec<usize> = network.targets().to_vec();
        seeds.extend(network.evidence_nodes());
        seeds.extend((0..network.node_count()).filter(|&i| observed[i].is_some()));
        let keep = network.ancestral_closure(&seeds);

        let card = |i: usize| network.node(i).state_count();
        let mut factors = Vec::with_capacity(network.node_count());
        let mut soft = Vec::new();
        for &i in network.topological_order() {
            if !keep[i] {
                continue;
            }
            if unset_evidence(i) && network.is_root(i) {
                factors.push(Factor::over(i, network.node(i).fallback_prior.clone()));
            } else {
                factors.push(Factor::from_cpd(network.cpd(i), card));
                if unset_evidence(i) {
                    soft.push(i);
                }
            }
        }

        for (var, state) in observed.iter().enumerate() {
            if let Some(state) = *state {
                for f in factors.iter_mut().filter(|f| f.contains(var)) {
                    *f = f.reduce(var, state);
                }
            }
        }

        let order = network
            .topological_order()
            .iter()
            .rev()
            .copied()
            .filter(|&i| keep[i] && observed[i].is_none())
            .collect();

        let mut conditioned = Self {
            network,
            factors,
            order,
            observed,
            tolerance,
        };
        conditioned.fit_soft_evidence(&soft)?;
        Ok(conditioned)
    }

    /// Give every node in `soft` a likelihood factor such that its marginal
    /// equals its fallback prior, all nodes fitted jointly.
    ///
    /// Iterative proportional fitting: each sweep rescales every likelihood
    /// by `fallback / marginal` until no marginal is off by more than
    /// [`FIT_EPSILON`]. The fixed point does not depend on the sweep order.
    fn fit_soft_evidence(&mut self, soft: &[usize]) -> Result<(), EngineError> {
        let network = self.network;
        let first = self.factors.len();
        for &node in soft {
            let states = network.node(node).state_count();
            self.factors.push(Factor::over(node, vec![1.0; states]));
        }

        let mut worst = 0.0_f64;
        for _ in 0..MAX_FIT_SWEEPS {
            worst = 0.0;
            for (k, &node) in soft.iter().enumerate() {
                let p = self.marginal(node)?;
                let q = &network.node(node).fallback_prior;
                for (q, p) in q.iter().zip(&p) {
                    worst = worst.max((q - p).abs());
                }
                let mut scaled: Vec<f64> = self.factors[first + k]
                    .values()
                    .iter()
                    .zip(q.iter().zip(&p))
                    .map(|(l, (q, p))| if *p > 0.0 { l * q / p } else { 0.0 })
                    .collect();
                let peak = scaled.iter().copied().fold(0.0, f64::max);
                if peak > 0.0 {
                    scaled.iter_mut().for_each(|l| *l /= peak);
                }
                self.factors[first + k] = Factor::over(node, scaled);
            }
            if worst <= FIT_EPSILON {
                return Ok(());
            }
        }

        log(
            Level::Warn,
            Domain::Inference,
            "soft_evidence_unconverged",
            obj(&[
                ("typology", v_str(network.name())),
                ("soft_nodes", json!(soft.len())),
                ("max_deviation", v_num(worst)),
            ]),
        );
        Ok(())
    }

    /// Normalised marginal of an unobserved node.
    fn marginal(&self, node: usize) -> Result<Vec<f64>, EngineError> {
        let factor = eliminate(&self.factors, node, &self.order);
        normalized(self.network, node, factor, self.tolerance)
    }

    /// Unnormalised probability of all hard evidence.
    fn evidence_weight(&self) -> f64 {
        eliminate(&self.factors, usize::MAX, &self.order).total()
    }
}

/// Per-node observed state, rejecting unknown nodes and out-of-range states.
fn resolve_evidence(
    network: &Network,
    evidence: &EvidenceAssignment,
) -> Result<Vec<Option<usize>>, EngineError> {
    let mut observed = vec![None; network.node_count()];
    for (name, state) in evidence.iter() {
        let idx = network.node_index(name).ok_or_else(|| EngineError::UnknownEvidenceNode {
            typology: network.name().to_string(),
            node: name.to_string(),
        })?;
        let states = network.node(idx).state_count();
        if state >= states {
            return Err(EngineError::EvidenceRange {
                typology: network.name().to_string(),
                node: name.to_string(),
                state,
                states,
            });
        }
        observed[idx] = Some(state);
    }
    Ok(observed)
}

/// Sum every variable in `order` except `query` out of the product of `factors`.
fn eliminate(factors: &[Factor], query: usize, order: &[usize]) -> Factor {
    let mut pool: Vec<Factor> = factors.to_vec();
    for &var in order {
        if var == query {
            continue;
        }
        let (touching, rest): (Vec<Factor>, Vec<Factor>) = pool.into_iter().partition(|f| f.contains(var));
        pool = rest;
        if touching.is_empty() {
            continue;
        }
        let merged = touching.iter().fold(Factor::unit(), |acc, f| acc.product(f));
        pool.push(merged.sum_out(var));
    }
    pool.iter().fold(Factor::unit(), |acc, f| acc.product(f))
}

/// Logged as a model defect: load-time validation should have ruled it out.
fn numeric_failure(network: &Network, node: usize, detail: String) -> EngineError {
    let id = &network.node(node).id;
    log_model_defect(network.name(), id, &detail);
    EngineError::InferenceNumeric {
        typology: network.name().to_string(),
        node: id.clone(),
        detail,
    }
}

fn normalized(
    network: &Network,
    node: usize,
    mut marginal: Factor,
    tolerance: f64,
) -> Result<Vec<f64>, EngineError> {
    let fail = |detail: String| numeric_failure(network, node, detail);

    if marginal.vars() != [node] {
        return Err(fail(format!("eliminated to scope {:?}", marginal.vars())));
    }
    let z = marginal.normalize();
    if !z.is_finite() || z <= 0.0 {
        return Err(fail(format!("normaliser {z}")));
    }
    let values = marginal.values().to_vec();
    if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
        return Err(fail("non-finite or negative probability".to_string()));
    }
    let sum: f64 = values.iter().sum();
    if (sum - 1.0).abs() > tolerance {
        return Err(fail(format!("sums to {sum}")));
    }
    Ok(values)
}
