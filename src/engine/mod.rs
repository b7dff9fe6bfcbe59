//! Engine: per-refresh derivation of the dashboard view models.
//!
//! `pipeline` turns already-fetched snapshots into a `PortfolioView`;
//! `refresher` fetches those snapshots from a `PortfolioDataSource`.

pub mod pipeline;
pub mod refresher;
