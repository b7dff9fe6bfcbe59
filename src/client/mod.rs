//! Backend data sources.
//!
//! Defines the `PortfolioDataSource` trait and the HTTP implementation
//! talking to the Zap Pilot backend and sentiment service.

pub mod zap_api;

use anyhow::Result;
use async_trait::async_trait;

use crate::types::{LandingPageResponse, RegimeHistoryRecord, SentimentResponse};

/// Abstraction over the external APIs feeding the allocation pipeline.
///
/// Implementors only fetch and deserialize; validation of the payloads
/// beyond their shape is left to the derivation layer.
#[async_trait]
pub trait PortfolioDataSource: Send + Sync {
    /// Aggregate portfolio values for a user.
    async fn fetch_landing_page(&self, user_id: &str) -> Result<LandingPageResponse>;

    /// Current market sentiment reading.
    async fn fetch_sentiment(&self) -> Result<SentimentResponse>;

    /// Latest regime transition, or `None` when no history exists yet.
    async fn fetch_regime_history(&self) -> Result<Option<RegimeHistoryRecord>>;

    /// Source name for logging.
    fn name(&self) -> &str;
}
