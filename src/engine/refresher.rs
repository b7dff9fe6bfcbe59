//! Data refresh: fetch a snapshot from a data source and derive the view.

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::pipeline::{PortfolioPipeline, PortfolioView, Snapshot};
use crate::client::PortfolioDataSource;

/// Fetch all inputs for `user_id` concurrently.
///
/// Landing page and sentiment are required. A failed regime-history fetch
/// degrades to "no history" since it only affects presentation.
pub async fn fetch_snapshot(source: &dyn PortfolioDataSource, user_id: &str) -> Result<Snapshot> {
    let (landing_page, sentiment, history) = futures::join!(
        source.fetch_landing_page(user_id),
        source.fetch_sentiment(),
        source.fetch_regime_history(),
    );

    let landing_page = landing_page
        .with_context(|| format!("{}: landing page fetch failed", source.name()))?;
    let sentiment =
        sentiment.with_context(|| format!("{}: sentiment fetch failed", source.name()))?;

    let regime_history = match history {
        Ok(h) => h,
        Err(e) => {
            warn!(source = source.name(), error = %e, "Regime history unavailable");
            None
        }
    };

    Ok(Snapshot {
        landing_page,
        sentiment,
        regime_history,
    })
}

/// Run one full refresh cycle.
pub async fn refresh(
    source: &dyn PortfolioDataSource,
    pipeline: &PortfolioPipeline,
    user_id: &str,
) -> Result<PortfolioView> {
    info!(source = source.name(), user_id, "Starting refresh");
    let snapshot = fetch_snapshot(source, user_id).await?;
    Ok(pipeline.derive(&snapshot))
}
