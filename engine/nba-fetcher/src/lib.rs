//! NBA stats fetcher and terminal dashboard
//!
//! Pulls league leaders and standings from stats.nba.com (or saved payload
//! files), caches them for a configurable TTL and runs them through the
//! `stats_engine` pipeline for display.

pub mod cache;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod fetcher;
pub mod logging;
pub mod models;
pub mod render;
pub mod source;

pub use cache::TtlCache;
pub use config::FetcherConfig;
pub use dashboard::{Dashboard, DataStatus, Snapshot};
pub use error::{FetchError, Result};
pub use fetcher::{with_retry, NbaStatsFetcher};
pub use models::*;
pub use source::{FileSource, StatsSource};
