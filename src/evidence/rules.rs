//! Signal rules: how one raw signal becomes one node state.

use crate::evidence::case::CaseData;

/// What a rule read from the case.
#[derive(Debug, Clone, PartialEq)]
pub enum Reading {
    /// State position, counted from the least suspicious state.
    Level(usize),
    /// State label to match against the node's states.
    Label(String),
}

/// One signal feeding one node.
#[derive(Clone, Copy)]
pub struct SignalRule {
    pub node: &'static str,
    /// Key looked up in `CaseData::signal_confidence`.
    pub signal: &'static str,
    pub read: fn(&CaseData) -> Option<Reading>,
}

impl std::fmt::Debug for SignalRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalRule")
            .field("node", &self.node)
            .field("signal", &self.signal)
            .finish()
    }
}

/// Number of cut points at or below `value`. Cuts must be increasing.
pub fn ascending(value: f64, cuts: &[f64]) -> usize {
    cuts.iter().filter(|c| value >= **c).count()
}

/// Number of cut points at or above `value`. Cuts must be decreasing.
pub fn descending(value: f64, cuts: &[f64]) -> usize {
    cuts.iter().filter(|c| value <= **c).count()
}

/// Drop NaN and infinities so they read as absent.
pub fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascending_buckets() {
        let cuts = [0.5, 0.85];
        assert_eq!(ascending(0.1, &cuts), 0);
        assert_eq!(ascending(0.5, &cuts), 1);
        assert_eq!(ascending(0.84, &cuts), 1);
        assert_eq!(ascending(0.85, &cuts), 2);
    }

    #[test]
    fn test_descending_buckets() {
        let cuts = [168.0, 24.0];
        assert_eq!(descending(500.0, &cuts), 0);
        assert_eq!(descending(168.0, &cuts), 1);
        assert_eq!(descending(2.0, &cuts), 2);
    }

    #[test]
    fn test_finite_filters_nan() {
        assert_eq!(finite(Some(f64::NAN)), None);
        assert_eq!(finite(Some(f64::INFINITY)), None);
        assert_eq!(finite(Some(1.5)), Some(1.5));
    }
}
