//! Drift between current and target crypto allocation.

use serde::Serialize;

use crate::types::{PortfolioAllocation, TargetAllocation};

/// Drift settings (defaults, overridden by config.toml at runtime).
#[derive(Debug, Clone, Copy)]
pub struct DriftConfig {
    /// Percentage points of drift above which a rebalance is suggested.
    pub rebalance_threshold: f64,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            rebalance_threshold: 5.0,
        }
    }
}

/// Absolute deviation between current and target crypto percentage.
pub fn calculate_delta(current_crypto: f64, target_crypto: f64) -> f64 {
    (target_crypto - current_crypto).abs()
}

/// Whether a drift is large enough to prompt a rebalance.
pub fn needs_rebalance(delta: f64, threshold: f64) -> bool {
    delta > threshold
}

/// Drift summary for one portfolio against one target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DriftReport {
    pub current_crypto: f64,
    pub target_crypto: f64,
    pub delta: f64,
    pub needs_rebalance: bool,
}

impl DriftReport {
    pub fn new(
        allocation: &PortfolioAllocation,
        target: &TargetAllocation,
        config: &DriftConfig,
    ) -> Self {
        let delta = calculate_delta(allocation.crypto_percent, target.crypto);
        Self {
            current_crypto: allocation.crypto_percent,
            target_crypto: target.crypto,
            delta,
            needs_rebalance: needs_rebalance(delta, config.rebalance_threshold),
        }
    }
}
