use std::collections::HashMap;

use crate::config::GlobalSettings;
use crate::model::loader::{ModelSource, ValidatedModel};

/// A discrete variable of the network. Immutable once built.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: String,
    pub states: Vec<String>,
    pub description: Option<String>,
    /// Node-level fallback, or the global default resolved for this node.
    pub fallback_prior: Vec<f64>,
    /// Whether `fallback_prior` came from the node itself.
    pub declares_fallback: bool,
    pub importance: f64,
    pub latent: bool,
}

impl Node {
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Index of a state by label, case-insensitive.
    pub fn state_index(&self, label: &str) -> Option<usize> {
        let wanted = label.trim();
        self.states.iter().position(|s| s.eq_ignore_ascii_case(wanted))
    }
}

/// Conditional table of one node. `values[own_state][column]`; columns walk
/// the joint parent states with the last parent varying fastest.
#[derive(Debug, Clone)]
pub struct Cpd {
    pub variable: usize,
    pub evidence: Vec<usize>,
    pub values: Vec<Vec<f64>>,
}

/// Frozen directed acyclic graph with cpds indexed by node.
#[derive(Debug, Clone)]
pub struct Network {
    name: String,
    description: Option<String>,
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
    parents: Vec<Vec<usize>>,
    children: Vec<Vec<usize>>,
    cpds: Vec<Cpd>,
    topo: Vec<usize>,
    targets: Vec<usize>,
    risk_weights: Vec<f64>,
    edge_count: usize,
    source: ModelSource,
}

impl Network {
    /// Freeze a validated model. Infallible: every invariant was checked by
    /// the loader.
    pub fn from_validated(model: ValidatedModel, settings: &GlobalSettings, source: ModelSource) -> Self {
        let ValidatedModel {
            name,
            spec,
            parents,
            cpd_of,
            topo,
            targets,
            risk_weights,
        } = model;

        let nodes: Vec<Node> = spec
            .nodes
            .iter()
            .map(|n| Node {
                id: n.name.clone(),
                states: n.states.clone(),
                description: n.description.clone(),
                fallback_prior: n
                    .fallback_prior
                    .clone()
                    .unwrap_or_else(|| settings.fallback_for(n.states.len())),
                declares_fallback: n.fallback_prior.is_some(),
                importance: n.importance.unwrap_or(settings.default_importance),
                latent: n.latent,
            })
            .collect();

        let index = nodes.iter().enumerate().map(|(i, n)| (n.id.clone(), i)).collect();

        let mut children = vec![Vec::new(); nodes.len()];
        for (child, ps) in parents.iter().enumerate() {
            for &p in ps {
                children[p].push(child);
            }
        }

        let cpds = cpd_of
            .iter()
            .enumerate()
            .map(|(node, &ci)| Cpd {
                variable: node,
                evidence: parents[node].clone(),
                values: spec.cpds[ci].values.clone(),
            })
            .collect();

        Self {
            name,
            description: spec.description.clone(),
            nodes,
            index,
            edge_count: spec.edges.len(),
            parents,
            children,
            cpds,
            topo,
            targets,
            risk_weights,
            source,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn source(&self) -> ModelSource {
        self.source
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn cpd_count(&self) -> usize {
        self.cpds.len()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, idx: usize) -> &Node {
        &self.nodes[idx]
    }

    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn node_by_id(&self, id: &str) -> Option<&Node> {
        self.node_index(id).map(|i| &self.nodes[i])
    }

    pub fn parents(&self, idx: usize) -> &[usize] {
        &self.parents[idx]
    }

    pub fn children(&self, idx: usize) -> &[usize] {
        &self.children[idx]
    }

    pub fn is_root(&self, idx: usize) -> bool {
        self.parents[idx].is_empty()
    }

    pub fn cpd(&self, idx: usize) -> &Cpd {
        &self.cpds[idx]
    }

    pub fn cpd_by_id(&self, id: &str) -> Option<&Cpd> {
        self.node_index(id).map(|i| &self.cpds[i])
    }

    /// Topological order, computed once at load.
    pub fn topological_order(&self) -> &[usize] {
        &self.topo
    }

    pub fn targets(&self) -> &[usize] {
        &self.targets
    }

    pub fn primary_target(&self) -> usize {
        self.targets[0]
    }

    pub fn is_target(&self, idx: usize) -> bool {
        self.targets.contains(&idx)
    }

    /// Nodes that can carry observed evidence: neither target nor latent.
    pub fn is_evidence_node(&self, idx: usize) -> bool {
        !self.nodes[idx].latent && !self.is_target(idx)
    }

    pub fn evidence_nodes(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.nodes.len()).filter(move |&i| self.is_evidence_node(i))
    }

    pub fn risk_weights(&self) -> &[f64] {
        &self.risk_weights
    }

    /// `seeds` plus all of their ancestors, as a membership mask.
    pub fn ancestral_closure(&self, seeds: &[usize]) -> Vec<bool> {
        let mut keep = vec![false; self.nodes.len()];
        let mut stack: Vec<usize> = seeds.to_vec();
        while let Some(n) = stack.pop() {
            if keep[n] {
                continue;
            }
            keep[n] = true;
            stack.extend(self.parents[n].iter().copied());
        }
        keep
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::defaults;
    use crate::model::loader::validate_model;

    fn insider() -> Network {
        let settings = GlobalSettings::default();
        let spec = defaults::builtin_spec("insider_dealing").unwrap();
        let valid = validate_model("insider_dealing", &spec, &settings, 1e-3).unwrap();
        Network::from_validated(valid, &settings, ModelSource::BuiltIn)
    }

    #[test]
    fn test_topological_order_respects_edges() {
        let net = insider();
        let order = net.topological_order();
        let pos: HashMap<usize, usize> = order.iter().enumerate().map(|(p, &n)| (n, p)).collect();
        for child in 0..net.node_count() {
            for &parent in net.parents(child) {
                assert!(pos[&parent] < pos[&child]);
            }
        }
        assert_eq!(order.len(), net.node_count());
    }

    #[test]
    fn test_lookup_by_id() {
        let net = insider();
        let risk = net.node_index("Risk").unwrap();
        assert_eq!(net.primary_target(), risk);
        assert_eq!(net.cpd_by_id("Risk").unwrap().variable, risk);
        assert!(!net.is_evidence_node(risk));
        let mi = net.node_by_id("MaterialInfo").unwrap();
        assert_eq!(mi.state_index("clear access"), Some(2));
        assert_eq!(mi.fallback_prior, vec![0.7, 0.25, 0.05]);
    }

    #[test]
    fn test_children_mirror_parents() {
        let net = insider();
        for child in 0..net.node_count() {
            for &p in net.parents(child) {
                assert!(net.children(p).contains(&child));
            }
        }
    }

    #[test]
    fn test_ancestral_closure() {
        let net = insider();
        let intent = net.node_index("LatentIntent").unwrap();
        let keep = net.ancestral_closure(&[intent]);
        assert!(keep[net.node_index("MaterialInfo").unwrap()]);
        assert!(!keep[net.node_index("Risk").unwrap()]);
        assert!(!keep[net.node_index("TradingTiming").unwrap()]);
    }
}
