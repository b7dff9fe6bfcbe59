//! Zap Pilot backend client.
//!
//! Endpoints:
//! - `GET {base}/api/v1/landing-page/portfolio-data/{user_id}`
//! - `GET {base}/api/v1/market/regime/history` (404 when no history yet)
//! - `GET {sentiment_url}`
//!
//! Auth: optional `X-API-Key` header when a key is configured.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use super::PortfolioDataSource;
use crate::config::AppConfig;
use crate::types::{LandingPageResponse, RegimeHistoryRecord, SentimentResponse, ZapError};

const SOURCE_NAME: &str = "zap-api";

/// HTTP client for the Zap Pilot backend.
pub struct ZapApiClient {
    http: Client,
    base_url: String,
    sentiment_url: String,
    api_key: Option<SecretString>,
}

impl ZapApiClient {
    pub fn new(
        base_url: &str,
        sentiment_url: &str,
        timeout: Duration,
        api_key: Option<SecretString>,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent("zap-pilot/0.1.0")
            .build()
            .context("Failed to build HTTP client for Zap API")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            sentiment_url: sentiment_url.to_string(),
            api_key,
        })
    }

    /// Build a client from application config.
    pub fn from_config(cfg: &AppConfig) -> Result<Self> {
        Self::new(
            &cfg.api.base_url,
            &cfg.api.sentiment_url,
            Duration::from_secs(cfg.api.timeout_secs),
            cfg.api_key(),
        )
    }

    fn landing_page_url(&self, user_id: &str) -> String {
        format!(
            "{}/api/v1/landing-page/portfolio-data/{}",
            self.base_url,
            urlencoding::encode(user_id)
        )
    }

    fn regime_history_url(&self) -> String {
        format!("{}/api/v1/market/regime/history", self.base_url)
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => req.header("X-API-Key", key.expose_secret().as_str()),
            None => req,
        }
    }

    /// GET `url` and decode JSON. `Ok(None)` on 404.
    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str, url: &str) -> Result<Option<T>> {
        debug!(url = %url, "Fetching {endpoint}");

        let resp = self
            .authorize(self.http.get(url))
            .send()
            .await
            .with_context(|| format!("Zap API request failed: {endpoint}"))?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(ZapError::Api {
                endpoint: endpoint.to_string(),
                message: format!("{status}: {body}"),
            }
            .into());
        }

        let data = resp
            .json::<T>()
            .await
            .with_context(|| format!("Failed to parse {endpoint} response"))?;

        Ok(Some(data))
    }
}

#[async_trait]
impl PortfolioDataSource for ZapApiClient {
    async fn fetch_landing_page(&self, user_id: &str) -> Result<LandingPageResponse> {
        let url = self.landing_page_url(user_id);
        self.get_json("landing-page", &url)
            .await?
            .ok_or_else(|| {
                ZapError::Api {
                    endpoint: "landing-page".into(),
                    message: format!("no portfolio data for {user_id}"),
                }
                .into()
            })
    }

    async fn fetch_sentiment(&self) -> Result<SentimentResponse> {
        self.get_json("sentiment", &self.sentiment_url)
            .await?
            .ok_or_else(|| {
                ZapError::Api {
                    endpoint: "sentiment".into(),
                    message: "sentiment endpoint not found".into(),
                }
                .into()
            })
    }

    async fn fetch_regime_history(&self) -> Result<Option<RegimeHistoryRecord>> {
        let url = self.regime_history_url();
        self.get_json("regime-history", &url).await
    }

    fn name(&self) -> &str {
        SOURCE_NAME
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
