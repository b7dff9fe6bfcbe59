//! Strategy direction resolution.
//!
//! Turns a regime-history record into the strategy info presentation code
//! uses to pick transition copy and animation. The direction itself comes
//! from an `ActiveStrategyResolver`, which has no allocation consequences.

use chrono::Utc;
use tracing::debug;

use crate::types::{Regime, RegimeHistoryRecord, RegimeStrategyInfo, TransitionDirection};

/// Maps a regime transition onto the active strategy direction.
#[cfg_attr(test, mockall::automock)]
pub trait ActiveStrategyResolver: Send + Sync {
    fn resolve(
        &self,
        direction: TransitionDirection,
        current: Regime,
        previous: Option<Regime>,
    ) -> TransitionDirection;
}

/// Uses the record's direction unless there is no real transition.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultStrategyResolver;

impl ActiveStrategyResolver for DefaultStrategyResolver {
    fn resolve(
        &self,
        direction: TransitionDirection,
        current: Regime,
        previous: Option<Regime>,
    ) -> TransitionDirection {
        match previous {
            Some(prev) if prev != current => direction,
            _ => TransitionDirection::Default,
        }
    }
}

/// Strategy info for a missing history record.
pub fn default_strategy_info() -> RegimeStrategyInfo {
    RegimeStrategyInfo {
        previous_regime: None,
        strategy_direction: TransitionDirection::Default,
        regime_duration: None,
    }
}

/// Derive strategy info from an optional regime-history record.
pub fn regime_strategy_info(
    history: Option<&RegimeHistoryRecord>,
    resolver: &dyn ActiveStrategyResolver,
) -> RegimeStrategyInfo {
    let Some(record) = history else {
        return default_strategy_info();
    };

    let strategy_direction = resolver.resolve(
        record.effective_direction(),
        record.current_regime,
        record.previous_regime,
    );

    debug!(
        previous = ?record.previous_regime,
        current = %record.current_regime,
        direction = %strategy_direction,
        "Strategy direction resolved"
    );

    RegimeStrategyInfo {
        previous_regime: record.previous_regime,
        strategy_direction,
        regime_duration: record.effective_duration(Utc::now()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RegimeDuration;
    use mockall::predicate::eq;

    fn record(previous: Option<Regime>, current: Regime) -> RegimeHistoryRecord {
        RegimeHistoryRecord {
            previous_regime: previous,
            current_regime: current,
            direction: None,
            duration: Some(RegimeDuration::from_duration(chrono::Duration::hours(30))),
            started_at: None,
        }
    }

    #[test]
    fn test_no_history_returns_default() {
        let info = regime_strategy_info(None, &DefaultStrategyResolver);
        assert_eq!(
            info,
            RegimeStrategyInfo {
                previous_regime: None,
                strategy_direction: TransitionDirection::Default,
                regime_duration: None,
            }
        );
    }

    #[test]
    fn test_no_history_never_calls_resolver() {
        let mut resolver = MockActiveStrategyResolver::new();
        resolver.expect_resolve().never();
        let info = regime_strategy_info(None, &resolver);
        assert_eq!(info, default_strategy_info());
    }

    #[test]
    fn test_delegates_to_resolver() {
        let mut resolver = MockActiveStrategyResolver::new();
        resolver
            .expect_resolve()
            .with(
                eq(TransitionDirection::FromLeft),
                eq(Regime::Greed),
                eq(Some(Regime::Fear)),
            )
            .times(1)
            .return_const(TransitionDirection::FromRight);

        let rec = record(Some(Regime::Fear), Regime::Greed);
        let info = regime_strategy_info(Some(&rec), &resolver);
        assert_eq!(info.strategy_direction, TransitionDirection::FromRight);
        assert_eq!(info.previous_regime, Some(Regime::Fear));
        assert_eq!(info.regime_duration.unwrap().human_readable, "1 day");
    }

    #[test]
    fn test_duration_derived_from_start_time() {
        let mut rec = record(Some(Regime::Fear), Regime::Neutral);
        rec.duration = None;
        rec.started_at = Some(Utc::now() - chrono::Duration::hours(49));
        let info = regime_strategy_info(Some(&rec), &DefaultStrategyResolver);
        assert_eq!(info.regime_duration.unwrap().human_readable, "2 days");
    }

    #[test]
    fn test_default_resolver_passes_direction_through() {
        let mut rec = record(Some(Regime::Greed), Regime::Fear);
        rec.direction = Some(TransitionDirection::FromRight);
        let info = regime_strategy_info(Some(&rec), &DefaultStrategyResolver);
        assert_eq!(info.strategy_direction, TransitionDirection::FromRight);
    }

    #[test]
    fn test_default_resolver_without_transition() {
        let first = record(None, Regime::Neutral);
        let info = regime_strategy_info(Some(&first), &DefaultStrategyResolver);
        assert_eq!(info.strategy_direction, TransitionDirection::Default);
        assert!(info.regime_duration.is_some());

        let mut same = record(Some(Regime::Neutral), Regime::Neutral);
        same.direction = Some(TransitionDirection::FromLeft);
        let info = regime_strategy_info(Some(&same), &DefaultStrategyResolver);
        assert_eq!(info.strategy_direction, TransitionDirection::Default);
    }
}
