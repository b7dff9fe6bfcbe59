//! Portfolio allocation.
//!
//! Reshapes a landing page snapshot into the current crypto/stable split and
//! the per-asset composition breakdowns used by the dashboard.

pub mod drift;

use tracing::{debug, warn};

use crate::types::{
    AssetAllocationInput, AssetValue, Constituent, ConstituentSource, PortfolioAllocation,
};

pub use drift::{calculate_delta, needs_rebalance, DriftConfig, DriftReport};

// ---------------------------------------------------------------------------
// Display metadata
// ---------------------------------------------------------------------------

struct AssetMeta {
    symbol: &'static str,
    name: &'static str,
    color: &'static str,
}

const BTC: AssetMeta = AssetMeta { symbol: "BTC", name: "Bitcoin", color: "#F7931A" };
const ETH: AssetMeta = AssetMeta { symbol: "ETH", name: "Ethereum", color: "#627EEA" };
const OTHERS: AssetMeta = AssetMeta { symbol: "ALT", name: "Others", color: "#8B5CF6" };
const USDC: AssetMeta = AssetMeta { symbol: "USDC", name: "USD Coin", color: "#2775CA" };
const USDT: AssetMeta = AssetMeta { symbol: "USDT", name: "Tether", color: "#26A17B" };

/// Synthetic USDC/USDT shares of the stablecoin total. The backend does not
/// report a stablecoin breakdown yet, so these constituents are `Estimated`.
const STABLE_SPLIT: &[(AssetMeta, f64)] = &[(USDC, 0.6), (USDT, 0.4)];

// ---------------------------------------------------------------------------
// Calculator
// ---------------------------------------------------------------------------

/// Compute the current allocation of a portfolio snapshot.
///
/// An empty portfolio (all totals zero) yields `PortfolioAllocation::empty()`.
/// Negative and non-finite totals are treated as zero.
pub fn calculate_allocation(input: &AssetAllocationInput) -> PortfolioAllocation {
    let btc = sanitize("btc", input.btc);
    let eth = sanitize("eth", input.eth);
    let others = sanitize("others", input.others);
    let stablecoins = sanitize("stablecoins", input.stablecoins);

    let total_crypto = btc.total_value + eth.total_value + others.total_value;
    let total_assets = total_crypto + stablecoins.total_value;

    if !total_crypto.is_finite() || !total_assets.is_finite() {
        warn!(total_crypto, total_assets, "Portfolio totals overflow, returning zero allocation");
        return PortfolioAllocation::empty();
    }

    if total_assets <= 0.0 {
        debug!("Empty portfolio, returning zero allocation");
        return PortfolioAllocation::empty();
    }

    let crypto_assets = [(&BTC, btc), (&ETH, eth), (&OTHERS, others)];
    let crypto_divisor = if total_crypto > 0.0 { total_crypto } else { 1.0 };

    let crypto_constituents = crypto_assets
        .iter()
        .filter(|(_, asset)| asset.total_value > 0.0)
        .map(|(meta, asset)| {
            constituent(
                meta,
                asset.total_value,
                percent_of(asset.total_value, crypto_divisor),
                ConstituentSource::Measured,
            )
        })
        .collect();

    let simplified_crypto = crypto_assets
        .iter()
        .filter(|(_, asset)| asset.total_value > 0.0)
        .map(|(meta, asset)| {
            constituent(
                meta,
                asset.total_value,
                asset.percentage_of_portfolio,
                ConstituentSource::Measured,
            )
        })
        .collect();

    let stable_constituents = if stablecoins.total_value > 0.0 {
        STABLE_SPLIT
            .iter()
            .map(|(meta, share)| {
                constituent(
                    meta,
                    stablecoins.total_value * share,
                    share * 100.0,
                    ConstituentSource::Estimated,
                )
            })
            .collect()
    } else {
        Vec::new()
    };

    let allocation = PortfolioAllocation {
        crypto_percent: percent_of(total_crypto, total_assets),
        stable_percent: percent_of(stablecoins.total_value, total_assets),
        crypto_constituents,
        stable_constituents,
        simplified_crypto,
    };

    debug!(
        total_assets,
        crypto = format!("{:.1}%", allocation.crypto_percent),
        stable = format!("{:.1}%", allocation.stable_percent),
        "Allocation calculated"
    );

    allocation
}

fn percent_of(value: f64, total: f64) -> f64 {
    value / total * 100.0
}

fn sanitize(asset: &str, value: AssetValue) -> AssetValue {
    let clean = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
    let cleaned = AssetValue::new(
        clean(value.total_value),
        clean(value.percentage_of_portfolio),
    );
    if value.total_value != 0.0 && cleaned.total_value == 0.0 {
        warn!(asset, value = value.total_value, "Invalid asset total, treating as zero");
    }
    cleaned
}

fn constituent(meta: &AssetMeta, value: f64, percent: f64, source: ConstituentSource) -> Constituent {
    Constituent {
        symbol: meta.symbol.to_string(),
        name: meta.name.to_string(),
        value,
        percent,
        color: meta.color.to_string(),
        source,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn input(btc: f64, eth: f64, others: f64, stables: f64) -> AssetAllocationInput {
        let total = btc + eth + others + stables;
        let pct = |v: f64| if total > 0.0 { v / total * 100.0 } else { 0.0 };
        AssetAllocationInput {
            btc: AssetValue::new(btc, pct(btc)),
            eth: AssetValue::new(eth, pct(eth)),
            others: AssetValue::new(others, pct(others)),
            stablecoins: AssetValue::new(stables, pct(stables)),
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_zero_portfolio_is_empty() {
        let a = calculate_allocation(&input(0.0, 0.0, 0.0, 0.0));
        assert_eq!(a, PortfolioAllocation::empty());
        assert_eq!(a.crypto_percent, 0.0);
        assert_eq!(a.stable_percent, 0.0);
        assert!(a.is_empty());
    }

    #[test]
    fn test_half_crypto_half_stable() {
        let a = calculate_allocation(&input(30_000.0, 20_000.0, 0.0, 50_000.0));
        assert!(approx(a.crypto_percent, 50.0));
        assert!(approx(a.stable_percent, 50.0));

        assert_eq!(a.crypto_constituents.len(), 2);
        assert_eq!(a.crypto_constituents[0].symbol, "BTC");
        assert!(approx(a.crypto_constituents[0].percent, 60.0));
        assert_eq!(a.crypto_constituents[1].symbol, "ETH");
        assert!(approx(a.crypto_constituents[1].percent, 40.0));
        assert!(a.crypto_constituents.iter().all(|c| c.symbol != "ALT"));
    }

    #[test]
    fn test_simplified_crypto_uses_reported_percentages() {
        let mut raw = input(30_000.0, 20_000.0, 0.0, 50_000.0);
        // Upstream percentages are used as-is, even when inconsistent
        raw.btc.percentage_of_portfolio = 33.0;
        let a = calculate_allocation(&raw);
        assert_eq!(a.simplified_crypto.len(), 2);
        assert_eq!(a.simplified_crypto[0].percent, 33.0);
        assert!(approx(a.simplified_crypto[1].percent, 20.0));
    }

    #[test]
    fn test_stable_split_is_estimated() {
        let a = calculate_allocation(&input(0.0, 0.0, 0.0, 10_000.0));
        assert!(approx(a.stable_percent, 100.0));
        assert_eq!(a.crypto_percent, 0.0);
        assert!(a.crypto_constituents.is_empty());
        assert!(a.simplified_crypto.is_empty());

        assert_eq!(a.stable_constituents.len(), 2);
        assert_eq!(a.stable_constituents[0].symbol, "USDC");
        assert!(approx(a.stable_constituents[0].value, 6_000.0));
        assert!(approx(a.stable_constituents[1].value, 4_000.0));
        assert!(a
            .stable_constituents
            .iter()
            .all(|c| c.source == ConstituentSource::Estimated));
    }

    #[test]
    fn test_crypto_only_has_no_stable_constituents() {
        let a = calculate_allocation(&input(1_000.0, 0.0, 1_000.0, 0.0));
        assert!(approx(a.crypto_percent, 100.0));
        assert!(a.stable_constituents.is_empty());
        assert_eq!(a.crypto_constituents[1].name, "Others");
        assert!(a
            .crypto_constituents
            .iter()
            .all(|c| c.source == ConstituentSource::Measured));
    }

    #[test]
    fn test_negative_and_nan_treated_as_zero() {
        let mut raw = input(1_000.0, 0.0, 0.0, 1_000.0);
        raw.eth.total_value = -500.0;
        raw.others.total_value = f64::NAN;
        let a = calculate_allocation(&raw);
        assert!(approx(a.crypto_percent, 50.0));
        assert_eq!(a.crypto_constituents.len(), 1);
    }

    #[test]
    fn test_huge_single_asset_stays_finite() {
        let a = calculate_allocation(&input(1e307, 0.0, 0.0, 0.0));
        assert!(approx(a.crypto_percent, 100.0));
        assert_eq!(a.stable_percent, 0.0);
        assert_eq!(a.crypto_constituents.len(), 1);
        assert!(approx(a.crypto_constituents[0].percent, 100.0));
    }

    #[test]
    fn test_overflowing_totals_return_zero_state() {
        let mut raw = AssetAllocationInput::default();
        raw.btc = AssetValue::new(1e308, 50.0);
        raw.eth = AssetValue::new(1e308, 50.0);
        let a = calculate_allocation(&raw);
        assert_eq!(a, PortfolioAllocation::empty());
        assert!(a.crypto_percent.is_finite());
        assert!(a.stable_percent.is_finite());
    }

    #[test]
    fn test_calculation_is_idempotent() {
        let raw = input(12_345.0, 6_789.0, 1_000.0, 4_321.0);
        assert_eq!(calculate_allocation(&raw), calculate_allocation(&raw));
    }

    #[test]
    fn test_colors_annotated() {
        let a = calculate_allocation(&input(1.0, 1.0, 1.0, 1.0));
        let colors: Vec<&str> = a.crypto_constituents.iter().map(|c| c.color.as_str()).collect();
        assert_eq!(colors, vec!["#F7931A", "#627EEA", "#8B5CF6"]);
    }
}
