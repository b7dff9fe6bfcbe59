//! Configuration loading from TOML with environment variable resolution.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Secrets (the backend API key) are referenced by env-var name in the
//! config and resolved at runtime.

use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::fs;

use crate::allocation::DriftConfig;
use crate::types::ZapError;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub service: ServiceConfig,
    pub api: ApiConfig,
    #[serde(default)]
    pub allocation: AllocationConfig,
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub name: String,
    /// Seconds between data refreshes.
    pub refresh_interval_secs: u64,
    /// Wallet / user whose portfolio is tracked.
    pub user_id: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Backend base URL serving landing page and regime history.
    pub base_url: String,
    /// Sentiment endpoint (absolute URL).
    pub sentiment_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Name of the env var holding the backend API key, if any.
    #[serde(default)]
    pub api_key_env: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AllocationConfig {
    /// Drift (percentage points) above which a rebalance is suggested.
    #[serde(default = "default_rebalance_threshold")]
    pub rebalance_threshold: f64,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            rebalance_threshold: default_rebalance_threshold(),
        }
    }
}

impl AllocationConfig {
    pub fn drift_config(&self) -> DriftConfig {
        DriftConfig {
            rebalance_threshold: self.rebalance_threshold,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub enabled: bool,
    pub port: u16,
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_rebalance_threshold() -> f64 {
    DriftConfig::default().rebalance_threshold
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::from_toml(&contents).with_context(|| format!("Failed to parse config file: {path}"))
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ZapError> {
        if self.service.refresh_interval_secs == 0 {
            return Err(ZapError::Config("refresh_interval_secs must be > 0".into()));
        }
        if self.service.user_id.trim().is_empty() {
            return Err(ZapError::Config("user_id must not be empty".into()));
        }
        let threshold = self.allocation.rebalance_threshold;
        if !threshold.is_finite() || !(0.0..=100.0).contains(&threshold) {
            return Err(ZapError::Config(format!(
                "rebalance_threshold must be within [0, 100], got {threshold}"
            )));
        }
        Ok(())
    }

    /// Resolve the backend API key, if one is configured and set.
    pub fn api_key(&self) -> Option<SecretString> {
        self.api
            .api_key_env
            .as_deref()
            .and_then(|env| Self::resolve_env(env).ok())
            .map(SecretString::new)
    }

    /// Resolve an environment variable name to its value.
    pub fn resolve_env(env_name: &str) -> Result<String> {
        std::env::var(env_name)
            .with_context(|| format!("Environment variable not set: {env_name}"))
    }
}
