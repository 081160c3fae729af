//! Spoofing and layering signals.

use crate::evidence::case::CaseData;
use crate::evidence::rules::{ascending, descending, finite, Reading, SignalRule};

pub(crate) const RULES: &[SignalRule] = &[
    SignalRule { node: "CancelRatio", signal: "orders.cancel_ratio", read: cancel_ratio },
    SignalRule { node: "OrderImbalance", signal: "orders.book_imbalance", read: order_imbalance },
    SignalRule { node: "OrderLifetime", signal: "orders.median_lifetime_ms", read: order_lifetime },
    SignalRule { node: "OppositeSideExecution", signal: "orders.opposite_side_execution", read: opposite_side },
];

const CANCEL_CUTS: [f64; 2] = [0.5, 0.85];
const LAYERED_FROM_LEVELS: u32 = 3;
const SKEWED_FROM: f64 = 0.7;
const LIFETIME_CUTS_MS: [f64; 2] = [5_000.0, 500.0];

fn cancel_ratio(case: &CaseData) -> Option<Reading> {
    let ratio = finite(case.orders.as_ref()?.cancel_ratio)?;
    Some(Reading::Level(ascending(ratio.clamp(0.0, 1.0), &CANCEL_CUTS)))
}

fn order_imbalance(case: &CaseData) -> Option<Reading> {
    let orders = case.orders.as_ref()?;
    if orders.layering_levels.is_some_and(|l| l >= LAYERED_FROM_LEVELS) {
        return Some(Reading::Level(2));
    }
    match finite(orders.book_imbalance) {
        Some(imb) if imb >= SKEWED_FROM => Some(Reading::Level(1)),
        Some(_) => Some(Reading::Level(0)),
        None if orders.layering_levels.is_some() => Some(Reading::Level(0)),
        None => None,
    }
}

fn order_lifetime(case: &CaseData) -> Option<Reading> {
    let ms = finite(case.orders.as_ref()?.median_lifetime_ms)?;
    // Strictly below the cut counts, so exactly 500ms is "Short".
    let level = descending(ms, &LIFETIME_CUTS_MS);
    let level = if LIFETIME_CUTS_MS.contains(&ms) { level - 1 } else { level };
    Some(Reading::Level(level))
}

fn opposite_side(case: &CaseData) -> Option<Reading> {
    case.orders
        .as_ref()?
        .opposite_side_execution
        .map(|hit| Reading::Level(usize::from(hit)))
}
