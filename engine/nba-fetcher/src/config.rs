use crate::error::{FetchError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration for the stats.nba.com fetcher and its refresh cache
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Upstream API settings
    pub api: ApiConfig,

    /// Which seasons to request
    pub seasons: SeasonsConfig,

    /// Refresh cache settings
    pub cache: CacheConfig,

    /// Retry policy for transient upstream failures
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the stats API
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Pause between consecutive requests in milliseconds
    pub rate_limit_delay_ms: u64,

    /// Browser-like headers; the API rejects bare clients
    pub user_agent: String,
    pub referer: String,
    pub origin: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonsConfig {
    /// Season to request first, e.g. "2025-26"
    pub current: String,

    /// Season to fall back to when the current one has no data yet
    pub fallback: Option<String>,

    /// "Regular Season" or "Playoffs"
    pub season_type: String,

    /// Aggregation mode for player leaders
    pub per_mode: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// How long fetched payloads stay fresh, in seconds
    pub ttl_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts per request, the first one included
    pub max_retries: u32,

    /// Initial retry delay in milliseconds
    pub initial_delay_ms: u64,

    /// Maximum retry delay in milliseconds
    pub max_delay_ms: u64,

    /// Backoff multiplier
    pub backoff_multiplier: f64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://stats.nba.com/stats".to_string(),
            timeout_secs: 10,
            rate_limit_delay_ms: 600,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            referer: "https://www.nba.com/".to_string(),
            origin: "https://www.nba.com".to_string(),
        }
    }
}

impl Default for SeasonsConfig {
    fn default() -> Self {
        Self {
            current: "2025-26".to_string(),
            fallback: Some("2024-25".to_string()),
            season_type: "Regular Season".to_string(),
            per_mode: "PerGame".to_string(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_secs: 3600 }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { max_retries: 3, initial_delay_ms: 500, max_delay_ms: 5_000, backoff_multiplier: 2.0 }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn rate_limit_delay(&self) -> Duration {
        Duration::from_millis(self.rate_limit_delay_ms)
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl RetryConfig {
    /// Delay before retry number `attempt` (1-based), capped at `max_delay_ms`
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = self.backoff_multiplier.max(1.0).powi(attempt.saturating_sub(1) as i32);
        let millis = (self.initial_delay_ms as f64 * factor).min(self.max_delay_ms as f64);
        Duration::from_millis(millis as u64)
    }
}

impl SeasonsConfig {
    /// Seasons to try in order: current, then the fallback if it differs
    pub fn candidates(&self) -> Vec<&str> {
        let mut seasons = vec![self.current.as_str()];
        if let Some(fallback) = self.fallback.as_deref() {
            if fallback != self.current {
                seasons.push(fallback);
            }
        }
        seasons
    }
}

/// Whether `season` looks like "2025-26"
pub fn is_valid_season(season: &str) -> bool {
    let bytes = season.as_bytes();
    bytes.len() == 7
        && bytes[4] == b'-'
        && bytes[..4].iter().chain(&bytes[5..]).all(u8::is_ascii_digit)
}

impl FetcherConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(season) = std::env::var("NBA_SEASON") {
            config.seasons.current = season;
        }

        if let Ok(season) = std::env::var("NBA_FALLBACK_SEASON") {
            config.seasons.fallback = (!season.trim().is_empty()).then_some(season);
        }

        if let Ok(url) = std::env::var("NBA_API_BASE_URL") {
            config.api.base_url = url;
        }

        if let Ok(timeout) = std::env::var("NBA_API_TIMEOUT_SECS") {
            config.api.timeout_secs = timeout.parse().unwrap_or(10);
        }

        if let Ok(ttl) = std::env::var("NBA_CACHE_TTL_SECS") {
            config.cache.ttl_secs = ttl.parse().unwrap_or(3600);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an optional TOML file layered under
    /// `NBA__`-prefixed environment variables (e.g. `NBA__SEASONS__CURRENT`).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::from(path.as_ref()).required(false))
            .add_source(
                ::config::Environment::with_prefix("NBA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(FetchError::InvalidConfig("api.base_url must not be empty".into()));
        }
        if self.api.timeout_secs == 0 {
            return Err(FetchError::InvalidConfig("api.timeout_secs must be positive".into()));
        }
        if self.retry.max_retries == 0 {
            return Err(FetchError::InvalidConfig("retry.max_retries must be at least 1".into()));
        }
        for season in self.seasons.candidates() {
            if !is_valid_season(season) {
                return Err(FetchError::InvalidConfig(format!(
                    "season '{season}' is not in YYYY-YY form"
                )));
            }
        }
        Ok(())
    }
}
