//! Wash trading signals.

use crate::evidence::case::CaseData;
use crate::evidence::rules::{ascending, finite, Reading, SignalRule};

pub(crate) const RULES: &[SignalRule] = &[
    SignalRule { node: "BeneficialOwnership", signal: "counterparty.same_beneficial_owner", read: beneficial_ownership },
    SignalRule { node: "SelfMatchRate", signal: "counterparty.self_match_ratio", read: self_match_rate },
    SignalRule { node: "NetPositionChange", signal: "counterparty.net_position_change_pct", read: net_position_change },
    SignalRule { node: "RoundTripPattern", signal: "counterparty.round_trips", read: round_trip_pattern },
];

const SELF_MATCH_CUTS: [f64; 2] = [0.05, 0.2];
const MATERIAL_CHANGE_PCT: f64 = 10.0;
const MINIMAL_CHANGE_PCT: f64 = 1.0;
const SYSTEMATIC_ROUND_TRIPS: u32 = 5;

fn beneficial_ownership(case: &CaseData) -> Option<Reading> {
    let links = case.counterparty.as_ref()?;
    match (links.same_beneficial_owner, links.linked_accounts) {
        (Some(true), _) => Some(Reading::Level(2)),
        (_, Some(true)) => Some(Reading::Level(1)),
        (Some(false), Some(false)) => Some(Reading::Level(0)),
        _ => None,
    }
}

fn self_match_rate(case: &CaseData) -> Option<Reading> {
    let ratio = finite(case.counterparty.as_ref()?.self_match_ratio)?;
    Some(Reading::Level(ascending(ratio, &SELF_MATCH_CUTS)))
}

/// States run Material, Minimal, None: a flat book is the suspicious end.
fn net_position_change(case: &CaseData) -> Option<Reading> {
    let pct = finite(case.counterparty.as_ref()?.net_position_change_pct)?.abs();
    let level = if pct > MATERIAL_CHANGE_PCT {
        0
    } else if pct > MINIMAL_CHANGE_PCT {
        1
    } else {
        2
    };
    Some(Reading::Level(level))
}

fn round_trip_pattern(case: &CaseData) -> Option<Reading> {
    let trips = case.counterparty.as_ref()?.round_trips?;
    let level = match trips {
        0 => 0,
        n if n < SYSTEMATIC_ROUND_TRIPS => 1,
        _ => 2,
    };
    Some(Reading::Level(level))
}
