//! Dashboard: Axum web server exposing the derived view models.
//!
//! Serves a read-only JSON API. CORS enabled so the web front-end can call
//! it from another origin.

pub mod routes;

use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use routes::AppState;

/// Start the dashboard web server as a background task.
pub fn spawn_dashboard(state: AppState, port: u16) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = serve(state, port).await {
            error!(error = %e, "Dashboard server stopped");
        }
    })
}

/// Bind `port` and serve until the listener fails.
pub async fn serve(state: AppState, port: u16) -> Result<()> {
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind dashboard port {port}"))?;

    info!(port, "Dashboard server listening on http://localhost:{port}");

    axum::serve(listener, build_router(state))
        .await
        .context("Dashboard server error")
}

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(HeaderValue::from_static("*"))
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/portfolio", get(routes::get_portfolio))
        .route("/api/sentiment", get(routes::get_sentiment))
        .route("/api/regimes", get(routes::get_regimes))
        .route("/api/targets/:regime", get(routes::get_target))
        .route("/api/refreshes", get(routes::get_refreshes))
        .route("/health", get(routes::health))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
