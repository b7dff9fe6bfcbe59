//! Allocation pipeline.
//!
//! sentiment → regime → target split; landing page → current allocation;
//! both → drift; regime history → strategy direction.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::allocation::{calculate_allocation, DriftConfig, DriftReport};
use crate::regime::sentiment_info;
use crate::strategy::{regime_strategy_info, ActiveStrategyResolver, DefaultStrategyResolver};
use crate::types::{
    LandingPageResponse, PortfolioAllocation, Regime, RegimeHistoryRecord, RegimeStrategyInfo,
    SentimentInfo, SentimentResponse, TargetAllocation,
};

/// Everything the dashboard renders for one data refresh.
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioView {
    pub refresh_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub total_value: f64,
    pub sentiment: SentimentInfo,
    pub regime: Regime,
    pub allocation: PortfolioAllocation,
    pub target: TargetAllocation,
    pub drift: DriftReport,
    pub strategy: RegimeStrategyInfo,
}

/// Already-resolved inputs for one refresh.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub landing_page: LandingPageResponse,
    pub sentiment: SentimentResponse,
    pub regime_history: Option<RegimeHistoryRecord>,
}

/// Composes the regime, allocation, and strategy modules.
///
/// Holds no per-refresh state: `derive` on the same snapshot yields the
/// same view apart from `refresh_id` and `generated_at`.
pub struct PortfolioPipeline {
    drift: DriftConfig,
    resolver: Box<dyn ActiveStrategyResolver>,
}

impl PortfolioPipeline {
    pub fn new(drift: DriftConfig, resolver: Box<dyn ActiveStrategyResolver>) -> Self {
        Self { drift, resolver }
    }

    pub fn drift_config(&self) -> &DriftConfig {
        &self.drift
    }

    /// Derive the full view for one snapshot.
    pub fn derive(&self, snapshot: &Snapshot) -> PortfolioView {
        let sentiment = sentiment_info(&snapshot.sentiment);
        let regime = sentiment.regime;
        let target = regime.allocation().target();

        let assets = &snapshot.landing_page.portfolio_allocation;
        let allocation = calculate_allocation(assets);
        let drift = DriftReport::new(&allocation, &target, &self.drift);

        let strategy =
            regime_strategy_info(snapshot.regime_history.as_ref(), &*self.resolver);

        let total_value = snapshot.landing_page.total_net_usd.unwrap_or_else(|| {
            assets.btc.total_value
                + assets.eth.total_value
                + assets.others.total_value
                + assets.stablecoins.total_value
        });

        let view = PortfolioView {
            refresh_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            total_value,
            sentiment,
            regime,
            allocation,
            target,
            drift,
            strategy,
        };

        info!(
            refresh_id = %view.refresh_id,
            regime = %view.regime,
            crypto = format!("{:.1}%", view.allocation.crypto_percent),
            target = format!("{:.1}%", view.target.crypto),
            delta = format!("{:.1}", view.drift.delta),
            rebalance = view.drift.needs_rebalance,
            "Portfolio view derived"
        );

        view
    }
}

impl Default for PortfolioPipeline {
    fn default() -> Self {
        Self::new(DriftConfig::default(), Box::new(DefaultStrategyResolver))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
