//! Regime derivation: sentiment classification and the static
//! regime → target allocation table.

pub mod classifier;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, warn};

use crate::types::{Regime, SentimentInfo, SentimentInput, SentimentResponse, TargetAllocation};

pub use classifier::{classify, classify_score, classify_status};

/// Split returned when a regime id cannot be resolved.
pub const FALLBACK_TARGET: TargetAllocation = TargetAllocation {
    crypto: 50.0,
    stable: 50.0,
};

// ---------------------------------------------------------------------------
// Allocation table
// ---------------------------------------------------------------------------

/// Target split for one regime. `spot + lp + stable == 100`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegimeAllocation {
    pub spot: f64,
    pub lp: f64,
    pub stable: f64,
}

impl RegimeAllocation {
    /// Crypto exposure reported to presentation code.
    pub fn crypto(&self) -> f64 {
        self.spot + self.lp
    }

    pub fn target(&self) -> TargetAllocation {
        TargetAllocation {
            crypto: self.crypto(),
            stable: self.stable,
        }
    }
}

impl Regime {
    /// Contrarian allocation: heavier crypto in fear, heavier stables in greed.
    pub fn allocation(&self) -> RegimeAllocation {
        match self {
            Regime::ExtremeFear => RegimeAllocation { spot: 70.0, lp: 0.0, stable: 30.0 },
            Regime::Fear => RegimeAllocation { spot: 40.0, lp: 20.0, stable: 40.0 },
            Regime::Neutral => RegimeAllocation { spot: 30.0, lp: 20.0, stable: 50.0 },
            Regime::Greed => RegimeAllocation { spot: 20.0, lp: 20.0, stable: 60.0 },
            Regime::ExtremeGreed => RegimeAllocation { spot: 0.0, lp: 20.0, stable: 80.0 },
        }
    }
}

/// Row of the regime table as served to the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct RegimeSummary {
    pub id: &'static str,
    pub label: &'static str,
    pub quote: &'static str,
    pub allocation: RegimeAllocation,
    pub target: TargetAllocation,
}

/// The full regime table, fear to greed.
pub fn regime_table() -> Vec<RegimeSummary> {
    Regime::ALL
        .iter()
        .map(|r| {
            let allocation = r.allocation();
            RegimeSummary {
                id: r.id(),
                label: r.label(),
                quote: r.default_quote(),
                allocation,
                target: allocation.target(),
            }
        })
        .collect()
}

/// Resolve the target crypto/stable split for a regime identifier.
///
/// Unknown identifiers resolve to a 50/50 split.
pub fn target_allocation(regime_id: &str) -> TargetAllocation {
    match regime_id.parse::<Regime>() {
        Ok(regime) => {
            let target = regime.allocation().target();
            debug!(regime = regime_id, crypto = target.crypto, "Target allocation resolved");
            target
        }
        Err(e) => {
            warn!(error = %e, "Falling back to 50/50 target allocation");
            FALLBACK_TARGET
        }
    }
}

// ---------------------------------------------------------------------------
// Sentiment view model
// ---------------------------------------------------------------------------

/// Reshape a sentiment API payload into the view model.
///
/// A valid numeric value decides the regime. When the value is missing or
/// out of range the status label is classified instead. The displayed status
/// is always the regime's label, so the two never disagree.
pub fn sentiment_info(response: &SentimentResponse) -> SentimentInfo {
    let input = sentiment_input(response);
    let regime = classify(&input);
    let status = regime.label().to_string();

    let quote = response
        .quote
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .unwrap_or_else(|| regime.default_quote())
        .to_string();

    SentimentInfo {
        value: response.value,
        status,
        quote,
        regime,
        timestamp: response.timestamp.unwrap_or_else(Utc::now),
    }
}

/// Pick the reading to classify: the score when usable, else the status.
fn sentiment_input(response: &SentimentResponse) -> SentimentInput {
    let value = response.value;
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        return SentimentInput::Score(value);
    }
    warn!(
        value,
        status = %response.status,
        "Sentiment value unusable, classifying status label"
    );
    SentimentInput::Status(response.status.clone())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_rows_sum_to_100() {
        for regime in Regime::ALL {
            let a = regime.allocation();
            assert!(
                (a.spot + a.lp + a.stable - 100.0).abs() < 1e-9,
                "{regime} does not sum to 100"
            );
        }
    }

    #[test]
    fn test_crypto_is_spot_plus_lp() {
        let a = Regime::Fear.allocation();
        assert_eq!(a.crypto(), 60.0);
        assert_eq!(target_allocation("fear"), TargetAllocation { crypto: 60.0, stable: 40.0 });
    }

    #[test]
    fn test_crypto_decreases_towards_greed() {
        let cryptos: Vec<f64> = Regime::ALL.iter().map(|r| r.allocation().crypto()).collect();
        assert!(cryptos.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_unknown_regime_is_fifty_fifty() {
        assert_eq!(
            target_allocation("unknown_id"),
            TargetAllocation { crypto: 50.0, stable: 50.0 }
        );
        assert_eq!(target_allocation(""), FALLBACK_TARGET);
    }

    #[test]
    fn test_regime_table_covers_all() {
        let table = regime_table();
        assert_eq!(table.len(), 5);
        assert_eq!(table[0].id, "extreme_fear");
        assert_eq!(table[4].label, "Extreme Greed");
    }

    #[test]
    fn test_sentiment_info_defaults() {
        let info = sentiment_info(&SentimentResponse {
            value: 12.0,
            status: String::new(),
            quote: None,
            timestamp: None,
        });
        assert_eq!(info.regime, Regime::ExtremeFear);
        assert_eq!(info.status, "Extreme Fear");
        assert_eq!(info.quote, Regime::ExtremeFear.default_quote());
    }

    #[test]
    fn test_sentiment_info_keeps_supplied_fields() {
        let info = sentiment_info(&SentimentResponse {
            value: 80.0,
            status: " Extreme Greed ".into(),
            quote: Some("Custom quote".into()),
            timestamp: None,
        });
        assert_eq!(info.regime, Regime::ExtremeGreed);
        assert_eq!(info.status, "Extreme Greed");
        assert_eq!(info.quote, "Custom quote");
    }

    #[test]
    fn test_sentiment_info_out_of_range_value() {
        let info = sentiment_info(&SentimentResponse {
            value: 150.0,
            status: String::new(),
            quote: Some("   ".into()),
            timestamp: None,
        });
        assert_eq!(info.regime, Regime::Neutral);
        assert_eq!(info.quote, Regime::Neutral.default_quote());
    }

    #[test]
    fn test_sentiment_info_status_fallback_for_bad_value() {
        let info = sentiment_info(&SentimentResponse {
            value: 150.0,
            status: "extreme greed".into(),
            quote: None,
            timestamp: None,
        });
        assert_eq!(info.regime, Regime::ExtremeGreed);
        assert_eq!(info.status, "Extreme Greed");

        let nan = sentiment_info(&SentimentResponse {
            value: f64::NAN,
            status: "Fear".into(),
            quote: None,
            timestamp: None,
        });
        assert_eq!(nan.regime, Regime::Fear);
    }

    #[test]
    fn test_sentiment_info_status_follows_regime() {
        // A valid value wins over a disagreeing label
        let info = sentiment_info(&SentimentResponse {
            value: 80.0,
            status: "Fear".into(),
            quote: None,
            timestamp: None,
        });
        assert_eq!(info.regime, Regime::ExtremeGreed);
        assert_eq!(info.status, "Extreme Greed");
    }
}
