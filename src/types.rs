//! Shared types for the Zap Pilot allocation engine.
//!
//! These types form the data model used across all modules: backend input
//! snapshots, derived view models, and the regime vocabulary. They are kept
//! free of behaviour beyond small helpers so that the regime, allocation,
//! and strategy modules can depend on them without circular references.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Regime
// ---------------------------------------------------------------------------

/// Discrete market-sentiment bucket derived from the 0–100 sentiment index.
///
/// Declaration order runs from fear to greed; `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    ExtremeFear,
    Fear,
    Neutral,
    Greed,
    ExtremeGreed,
}

impl Regime {
    /// All regimes, fear to greed.
    pub const ALL: &'static [Regime] = &[
        Regime::ExtremeFear,
        Regime::Fear,
        Regime::Neutral,
        Regime::Greed,
        Regime::ExtremeGreed,
    ];

    /// Stable identifier used by the backend and in URLs.
    pub fn id(&self) -> &'static str {
        match self {
            Regime::ExtremeFear => "extreme_fear",
            Regime::Fear => "fear",
            Regime::Neutral => "neutral",
            Regime::Greed => "greed",
            Regime::ExtremeGreed => "extreme_greed",
        }
    }

    /// Human-readable label, also the canonical sentiment status string.
    pub fn label(&self) -> &'static str {
        match self {
            Regime::ExtremeFear => "Extreme Fear",
            Regime::Fear => "Fear",
            Regime::Neutral => "Neutral",
            Regime::Greed => "Greed",
            Regime::ExtremeGreed => "Extreme Greed",
        }
    }

    /// Quote shown when the sentiment API does not supply one.
    pub fn default_quote(&self) -> &'static str {
        match self {
            Regime::ExtremeFear => {
                "Be greedy when others are fearful. Accumulate while the market panics."
            }
            Regime::Fear => "Fear creates opportunity. Lean into crypto exposure gradually.",
            Regime::Neutral => "The market is balanced. Hold the plan and stay diversified.",
            Regime::Greed => "Greed is building. Start taking profits into stablecoins.",
            Regime::ExtremeGreed => {
                "Be fearful when others are greedy. Protect gains with stable positions."
            }
        }
    }

    /// Position on the fear→greed axis (0 = extreme fear).
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Parse a regime from its identifier (`extreme_fear`, `fear`, ...).
impl std::str::FromStr for Regime {
    type Err = ZapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Regime::ALL
            .iter()
            .copied()
            .find(|r| r.id() == s)
            .ok_or_else(|| ZapError::UnknownRegime(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Sentiment
// ---------------------------------------------------------------------------

/// Raw sentiment reading as produced by the external sentiment API.
#[derive(Debug, Clone, PartialEq)]
pub enum SentimentInput {
    /// Fear & greed index, expected in [0, 100].
    Score(f64),
    /// Textual status such as "Extreme Fear".
    Status(String),
}

/// Sentiment API payload: `{ value, status, quote, timestamp }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentResponse {
    pub value: f64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub quote: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Sentiment view model consumed by presentation code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentInfo {
    pub value: f64,
    pub status: String,
    pub quote: String,
    pub regime: Regime,
    pub timestamp: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Allocation input (landing page)
// ---------------------------------------------------------------------------

/// One asset class as reported by the landing page endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AssetValue {
    #[serde(default)]
    pub total_value: f64,
    /// Share of the whole portfolio, pre-computed upstream (0–100).
    #[serde(default)]
    pub percentage_of_portfolio: f64,
}

impl AssetValue {
    pub fn new(total_value: f64, percentage_of_portfolio: f64) -> Self {
        Self {
            total_value,
            percentage_of_portfolio,
        }
    }
}

/// Per-asset-class USD totals for a portfolio snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AssetAllocationInput {
    #[serde(default)]
    pub btc: AssetValue,
    #[serde(default)]
    pub eth: AssetValue,
    #[serde(default)]
    pub others: AssetValue,
    #[serde(default)]
    pub stablecoins: AssetValue,
}

/// The subset of the backend landing page response this crate reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandingPageResponse {
    pub portfolio_allocation: AssetAllocationInput,
    #[serde(default)]
    pub total_net_usd: Option<f64>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Allocation output
// ---------------------------------------------------------------------------

/// Whether a constituent value was reported by the backend or synthesised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstituentSource {
    Measured,
    Estimated,
}

/// A single asset's share within a category breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constituent {
    pub symbol: String,
    pub name: String,
    /// USD value.
    pub value: f64,
    /// Percentage within the breakdown's reference total.
    pub percent: f64,
    /// Hex color used by the composition bar.
    pub color: String,
    pub source: ConstituentSource,
}

/// Current allocation of a portfolio, derived from an `AssetAllocationInput`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PortfolioAllocation {
    pub crypto_percent: f64,
    pub stable_percent: f64,
    /// BTC/ETH/Others as a share of the crypto sub-total.
    pub crypto_constituents: Vec<Constituent>,
    /// Stablecoin breakdown as a share of the stable sub-total.
    pub stable_constituents: Vec<Constituent>,
    /// BTC/ETH/Others as a share of the whole portfolio.
    pub simplified_crypto: Vec<Constituent>,
}

impl PortfolioAllocation {
    /// The zero-state allocation returned for an empty portfolio.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.crypto_constituents.is_empty()
            && self.stable_constituents.is_empty()
            && self.simplified_crypto.is_empty()
    }
}

/// Target split for a regime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetAllocation {
    pub crypto: f64,
    pub stable: f64,
}

// ---------------------------------------------------------------------------
// Regime history & strategy direction
// ---------------------------------------------------------------------------

/// Direction of a regime transition, used to pick UI transition styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransitionDirection {
    /// Moving towards greed.
    FromLeft,
    /// Moving towards fear.
    FromRight,
    #[default]
    Default,
}

impl TransitionDirection {
    /// Derive the direction implied by moving from `previous` to `current`.
    pub fn between(previous: Regime, current: Regime) -> Self {
        match current.cmp(&previous) {
            std::cmp::Ordering::Greater => TransitionDirection::FromLeft,
            std::cmp::Ordering::Less => TransitionDirection::FromRight,
            std::cmp::Ordering::Equal => TransitionDirection::Default,
        }
    }
}

impl fmt::Display for TransitionDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionDirection::FromLeft => write!(f, "fromLeft"),
            TransitionDirection::FromRight => write!(f, "fromRight"),
            TransitionDirection::Default => write!(f, "default"),
        }
    }
}

/// How long the current regime has been in effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeDuration {
    pub hours: f64,
    pub days: f64,
    pub human_readable: String,
}

impl RegimeDuration {
    pub fn from_duration(duration: chrono::Duration) -> Self {
        let hours = duration.num_minutes().max(0) as f64 / 60.0;
        let days = hours / 24.0;
        let plural = |n: i64, unit: &str| {
            if n == 1 {
                format!("1 {unit}")
            } else {
                format!("{n} {unit}s")
            }
        };
        let human_readable = if days >= 1.0 {
            plural(days.floor() as i64, "day")
        } else if hours >= 1.0 {
            plural(hours.floor() as i64, "hour")
        } else {
            "less than an hour".to_string()
        };
        Self {
            hours,
            days,
            human_readable,
        }
    }
}

/// Regime history payload from the external regime-history API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeHistoryRecord {
    pub previous_regime: Option<Regime>,
    pub current_regime: Regime,
    #[serde(default)]
    pub direction: Option<TransitionDirection>,
    #[serde(default)]
    pub duration: Option<RegimeDuration>,
    /// When the current regime began; used when `duration` is absent.
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
}

impl RegimeHistoryRecord {
    /// The reported duration, or the time elapsed since `started_at`.
    pub fn effective_duration(&self, now: DateTime<Utc>) -> Option<RegimeDuration> {
        self.duration.clone().or_else(|| {
            self.started_at
                .map(|start| RegimeDuration::from_duration(now - start))
        })
    }

    /// The reported direction, or the one implied by the regime pair.
    pub fn effective_direction(&self) -> TransitionDirection {
        match (self.direction, self.previous_regime) {
            (Some(direction), _) => direction,
            (None, Some(previous)) => TransitionDirection::between(previous, self.current_regime),
            (None, None) => TransitionDirection::Default,
        }
    }
}

/// Strategy info consumed by presentation code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeStrategyInfo {
    pub previous_regime: Option<Regime>,
    pub strategy_direction: TransitionDirection,
    pub regime_duration: Option<RegimeDuration>,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for Zap Pilot.
#[derive(Debug, thiserror::Error)]
pub enum ZapError {
    #[error("API error ({endpoint}): {message}")]
    Api { endpoint: String, message: String },

    #[error("Unknown regime: {0}")]
    UnknownRegime(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
