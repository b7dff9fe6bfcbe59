//! Zap Pilot: regime-based DeFi portfolio allocation engine.
//!
//! Entry point. Loads configuration, initialises structured logging,
//! starts the dashboard API, and refreshes the portfolio view on a fixed
//! interval until Ctrl+C.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use zap_pilot::client::zap_api::ZapApiClient;
use zap_pilot::config;
use zap_pilot::dashboard::{self, routes::DashboardState};
use zap_pilot::engine::pipeline::PortfolioPipeline;
use zap_pilot::engine::refresher;
use zap_pilot::strategy::DefaultStrategyResolver;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let config_path =
        std::env::var("ZAP_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    let cfg = config::AppConfig::load(&config_path)?;

    init_logging();

    info!(
        name = %cfg.service.name,
        refresh_interval_secs = cfg.service.refresh_interval_secs,
        rebalance_threshold = cfg.allocation.rebalance_threshold,
        "Zap Pilot starting up"
    );

    if cfg.api.api_key_env.is_some() && cfg.api_key().is_none() {
        warn!("API key env var configured but not set, requests will be unauthenticated");
    }

    let source = ZapApiClient::from_config(&cfg)?;
    let pipeline = PortfolioPipeline::new(
        cfg.allocation.drift_config(),
        Box::new(DefaultStrategyResolver),
    );

    let state = Arc::new(DashboardState::new());
    if cfg.dashboard.enabled {
        dashboard::spawn_dashboard(state.clone(), cfg.dashboard.port);
    }

    // -- Main loop -------------------------------------------------------

    let mut interval =
        tokio::time::interval(Duration::from_secs(cfg.service.refresh_interval_secs));
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!("Entering refresh loop. Press Ctrl+C to stop.");

    loop {
        tokio::select! {
            _ = interval.tick() => {
                match refresher::refresh(&source, &pipeline, &cfg.service.user_id).await {
                    Ok(view) => state.publish(view).await,
                    Err(e) => error!(error = %e, "Refresh failed, keeping previous view"),
                }
            }
            _ = &mut shutdown => {
                info!("Shutdown signal received.");
                break;
            }
        }
    }

    info!("Zap Pilot shut down cleanly.");
    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("zap_pilot=info"));

    if std::env::var("ZAP_LOG_JSON").is_ok() {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt().with_env_filter(env_filter).with_target(true).init();
    }
}
