//! Commodity and benchmark manipulation signals.

use crate::evidence::case::CaseData;
use crate::evidence::insider::comms_risk;
use crate::evidence::rules::{ascending, finite, Reading, SignalRule};

pub(crate) const RULES: &[SignalRule] = &[
    SignalRule { node: "PhysicalPosition", signal: "market.physical_share", read: physical_position },
    SignalRule { node: "PriceImpact", signal: "market.price_impact_pct", read: price_impact },
    SignalRule { node: "BenchmarkTiming", signal: "market.minutes_from_benchmark_window", read: benchmark_timing },
    SignalRule { node: "CommsRisk", signal: "comms", read: comms_risk },
];

const SHARE_CUTS: [f64; 2] = [0.2, 0.5];
const IMPACT_CUTS_PCT: [f64; 2] = [1.0, 3.0];
const NEAR_WINDOW_MINUTES: f64 = 30.0;

fn physical_position(case: &CaseData) -> Option<Reading> {
    let share = finite(case.market.as_ref()?.physical_share)?;
    Some(Reading::Level(ascending(share, &SHARE_CUTS)))
}

fn price_impact(case: &CaseData) -> Option<Reading> {
    let pct = finite(case.market.as_ref()?.price_impact_pct)?;
    Some(Reading::Level(ascending(pct.abs(), &IMPACT_CUTS_PCT)))
}

fn benchmark_timing(case: &CaseData) -> Option<Reading> {
    let minutes = finite(case.market.as_ref()?.minutes_from_benchmark_window)?;
    let level = if minutes <= 0.0 {
        2
    } else if minutes <= NEAR_WINDOW_MINUTES {
        1
    } else {
        0
    };
    Some(Reading::Level(level))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evidence::case::MarketImpact;

    fn case(m: MarketImpact) -> CaseData {
        CaseData { market: Some(m), ..Default::default() }
    }

    #[test]
    fn test_benchmark_window() {
        let at = |m: f64| benchmark_timing(&case(MarketImpact { minutes_from_benchmark_window: Some(m), ..Default::default() }));
        assert_eq!(at(-5.0), Some(Reading::Level(2)));
        assert_eq!(at(0.0), Some(Reading::Level(2)));
        assert_eq!(at(30.0), Some(Reading::Level(1)));
        assert_eq!(at(240.0), Some(Reading::Level(0)));
    }

    #[test]
    fn test_price_impact_uses_magnitude() {
        let at = |p: f64| price_impact(&case(MarketImpact { price_impact_pct: Some(p), ..Default::default() }));
        assert_eq!(at(-4.0), Some(Reading::Level(2)));
        assert_eq!(at(1.5), Some(Reading::Level(1)));
        assert_eq!(at(0.2), Some(Reading::Level(0)));
    }

    #[test]
    fn test_dominant_position() {
        let c = case(MarketImpact { physical_share: Some(0.62), ..Default::default() });
        assert_eq!(physical_position(&c), Some(Reading::Level(2)));
        assert_eq!(physical_position(&CaseData::default()), None);
    }
}
