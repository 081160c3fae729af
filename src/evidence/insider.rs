//! Insider dealing signals.

use crate::evidence::case::CaseData;
use crate::evidence::rules::{ascending, descending, finite, Reading, SignalRule};

pub(crate) const RULES: &[SignalRule] = &[
    SignalRule { node: "MaterialInfo", signal: "event.access_level", read: material_info },
    SignalRule { node: "CommsRisk", signal: "comms", read: comms_risk },
    SignalRule { node: "TradingTiming", signal: "trades.hours_before_event", read: trading_timing },
    SignalRule { node: "PositionAnomaly", signal: "trades.volume_vs_average", read: position_anomaly },
    SignalRule { node: "ProfitMagnitude", signal: "trades.profit_pct", read: profit_magnitude },
];

/// Hours before the announcement: within a week is suspicious, within a day highly so.
const TIMING_CUTS_HOURS: [f64; 2] = [168.0, 24.0];
const IMMATERIAL_BELOW: f64 = 0.25;
const VOLUME_CUTS: [f64; 2] = [2.0, 5.0];
const PROFIT_CUTS_PCT: [f64; 2] = [2.0, 10.0];

fn material_info(case: &CaseData) -> Option<Reading> {
    let event = case.event.as_ref()?;
    if let Some(level) = &event.access_level {
        let level = level.trim().to_lowercase();
        return Some(match level.as_str() {
            "none" | "no" => Reading::Level(0),
            "potential" | "possible" => Reading::Level(1),
            "clear" | "confirmed" => Reading::Level(2),
            _ => Reading::Label(level),
        });
    }
    // Being on the insider list proves access; not being on it proves nothing.
    match event.on_insider_list {
        Some(true) => Some(Reading::Level(2)),
        _ => None,
    }
}

/// Shared with commodity manipulation.
pub(crate) fn comms_risk(case: &CaseData) -> Option<Reading> {
    let comms = case.comms.as_ref()?;
    match (comms.direct_insider_contact, comms.risk_markers) {
        (Some(true), _) => Some(Reading::Level(2)),
        (_, Some(markers)) if markers > 0 => Some(Reading::Level(1)),
        (_, Some(_)) => Some(Reading::Level(0)),
        (Some(false), None) => Some(Reading::Level(0)),
        (None, None) => None,
    }
}

fn trading_timing(case: &CaseData) -> Option<Reading> {
    if let Some(m) = case.event.as_ref().and_then(|e| finite(e.materiality_score)) {
        if m < IMMATERIAL_BELOW {
            return Some(Reading::Level(0));
        }
    }
    let hours = finite(case.trades.as_ref()?.hours_before_event)?;
    if hours < 0.0 {
        return Some(Reading::Level(0));
    }
    Some(Reading::Level(descending(hours, &TIMING_CUTS_HOURS)))
}

fn position_anomaly(case: &CaseData) -> Option<Reading> {
    let ratio = finite(case.trades.as_ref()?.volume_vs_average)?;
    Some(Reading::Level(ascending(ratio, &VOLUME_CUTS)))
}

fn profit_magnitude(case: &CaseData) -> Option<Reading> {
    let pct = finite(case.trades.as_ref()?.profit_pct)?;
    Some(Reading::Level(ascending(pct.abs(), &PROFIT_CUTS_PCT)))
}
