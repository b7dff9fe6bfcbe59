//! Dashboard API route handlers.
//!
//! All endpoints return JSON. State is shared via `Arc<DashboardState>`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::engine::pipeline::PortfolioView;
use crate::regime::{regime_table, target_allocation, RegimeSummary};
use crate::types::{SentimentInfo, TargetAllocation};

/// Refresh log entries kept in memory.
const MAX_REFRESH_LOG: usize = 100;

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Shared state accessible by all route handlers.
pub struct DashboardState {
    pub latest: RwLock<Option<PortfolioView>>,
    pub refresh_log: RwLock<Vec<RefreshLogEntry>>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self {
            latest: RwLock::new(None),
            refresh_log: RwLock::new(Vec::new()),
        }
    }

    /// Replace the latest view and append it to the refresh log.
    pub async fn publish(&self, view: PortfolioView) {
        {
            let mut log = self.refresh_log.write().await;
            log.push(RefreshLogEntry::from(&view));
            if log.len() > MAX_REFRESH_LOG {
                let excess = log.len() - MAX_REFRESH_LOG;
                log.drain(..excess);
            }
        }
        *self.latest.write().await = Some(view);
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}

pub type AppState = Arc<DashboardState>;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct RefreshLogEntry {
    pub refresh_id: String,
    pub timestamp: String,
    pub regime: String,
    pub sentiment_value: f64,
    pub crypto_percent: f64,
    pub target_crypto: f64,
    pub delta: f64,
    pub needs_rebalance: bool,
}

impl From<&PortfolioView> for RefreshLogEntry {
    fn from(view: &PortfolioView) -> Self {
        Self {
            refresh_id: view.refresh_id.to_string(),
            timestamp: view.generated_at.to_rfc3339(),
            regime: view.regime.id().to_string(),
            sentiment_value: view.sentiment.value,
            crypto_percent: view.allocation.crypto_percent,
            target_crypto: view.target.crypto,
            delta: view.drift.delta,
            needs_rebalance: view.drift.needs_rebalance,
        }
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /api/portfolio
pub async fn get_portfolio(
    State(state): State<AppState>,
) -> Result<Json<PortfolioView>, StatusCode> {
    state
        .latest
        .read()
        .await
        .clone()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// GET /api/sentiment
pub async fn get_sentiment(
    State(state): State<AppState>,
) -> Result<Json<SentimentInfo>, StatusCode> {
    state
        .latest
        .read()
        .await
        .as_ref()
        .map(|v| Json(v.sentiment.clone()))
        .ok_or(StatusCode::NOT_FOUND)
}

/// GET /api/regimes
pub async fn get_regimes() -> Json<Vec<RegimeSummary>> {
    Json(regime_table())
}

/// GET /api/targets/:regime
pub async fn get_target(Path(regime): Path<String>) -> Json<TargetAllocation> {
    Json(target_allocation(&regime))
}

/// GET /api/refreshes
pub async fn get_refreshes(State(state): State<AppState>) -> Json<Vec<RefreshLogEntry>> {
    Json(state.refresh_log.read().await.clone())
}

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::pipeline::{PortfolioPipeline, Snapshot};
    use crate::types::{LandingPageResponse, SentimentResponse};

    fn view(score: f64) -> PortfolioView {
        PortfolioPipeline::default().derive(&Snapshot {
            landing_page: LandingPageResponse {
                portfolio_allocation: Default::default(),
                total_net_usd: None,
                last_updated: None,
            },
            sentiment: SentimentResponse {
                value: score,
                status: String::new(),
                quote: None,
                timestamp: None,
            },
            regime_history: None,
        })
    }

    #[tokio::test]
    async fn test_publish_replaces_latest() {
        let state = DashboardState::new();
        state.publish(view(10.0)).await;
        state.publish(view(90.0)).await;
        let latest = state.latest.read().await;
        assert_eq!(latest.as_ref().unwrap().sentiment.value, 90.0);
        assert_eq!(state.refresh_log.read().await.len(), 2);
    }

    #[tokio::test]
    async fn test_refresh_log_is_bounded() {
        let state = DashboardState::new();
        for i in 0..(MAX_REFRESH_LOG + 5) {
            state.publish(view((i % 100) as f64)).await;
        }
        let log = state.refresh_log.read().await;
        assert_eq!(log.len(), MAX_REFRESH_LOG);
        // Oldest entries dropped first
        assert_eq!(log[0].sentiment_value, 5.0);
    }

    #[test]
    fn test_log_entry_from_empty_portfolio() {
        let entry = RefreshLogEntry::from(&view(50.0));
        assert_eq!(entry.regime, "neutral");
        assert_eq!(entry.crypto_percent, 0.0);
        assert_eq!(entry.delta, 50.0);
        assert!(entry.needs_rebalance);
    }
}
