//! Zap Pilot: regime-based DeFi portfolio allocation engine.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod regime;
pub mod allocation;
pub mod strategy;
pub mod client;
pub mod engine;
pub mod dashboard;
