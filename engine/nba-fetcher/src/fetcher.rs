use crate::config::{FetcherConfig, RetryConfig};
use crate::error::{FetchError, Result};
use crate::models::{parse_payload, Dataset, SeasonData};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ORIGIN, REFERER, USER_AGENT};
use reqwest::Client;
use serde_json::Value;
use stats_engine::RawRecordSet;
use std::future::Future;
use std::time::Instant;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{info, warn};

/// Client for the stats.nba.com league endpoints
pub struct NbaStatsFetcher {
    config: FetcherConfig,
    client: Client,
    last_request: Mutex<Option<Instant>>,
}

impl NbaStatsFetcher {
    /// Create a new fetcher instance
    pub fn new(config: FetcherConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_str(&config.api.user_agent)?);
        headers.insert(REFERER, HeaderValue::from_str(&config.api.referer)?);
        headers.insert(ORIGIN, HeaderValue::from_str(&config.api.origin)?);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
        headers.insert("x-nba-stats-origin", HeaderValue::from_static("stats"));
        headers.insert("x-nba-stats-token", HeaderValue::from_static("true"));

        let client =
            Client::builder().timeout(config.api.timeout()).default_headers(headers).build()?;

        Ok(Self { config, client, last_request: Mutex::new(None) })
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// Per-game league leaders for one season
    pub async fn fetch_players(&self, season: &str) -> Result<RawRecordSet> {
        let seasons = &self.config.seasons;
        let params = [
            ("LeagueID", "00"),
            ("PerMode", seasons.per_mode.as_str()),
            ("Scope", "S"),
            ("Season", season),
            ("SeasonType", seasons.season_type.as_str()),
            ("StatCategory", "PTS"),
        ];

        let payload = self.get_json("leagueleaders", &params).await?;
        let records = parse_payload(payload, Dataset::Players)?;
        info!("Successfully fetched {} player rows for {}", records.len(), season);
        Ok(records)
    }

    /// League standings for one season
    pub async fn fetch_teams(&self, season: &str) -> Result<RawRecordSet> {
        let params = [
            ("LeagueID", "00"),
            ("Season", season),
            ("SeasonType", self.config.seasons.season_type.as_str()),
        ];

        let payload = self.get_json("leaguestandingsv3", &params).await?;
        let records = parse_payload(payload, Dataset::Teams)?;
        info!("Successfully fetched {} team rows for {}", records.len(), season);
        Ok(records)
    }

    /// Fetch `dataset` for the current season, falling back to the previous
    /// season when the current one fails or has no rows yet.
    pub async fn fetch_with_fallback(&self, dataset: Dataset) -> Result<SeasonData> {
        let candidates = self.config.seasons.candidates();
        let mut last_error = None;

        for season in &candidates {
            let result = match dataset {
                Dataset::Players => self.fetch_players(season).await,
                Dataset::Teams => self.fetch_teams(season).await,
            };

            match result {
                Ok(records) if !records.is_empty() => return Ok(SeasonData::new(*season, records)),
                Ok(_) => warn!("No {} data for {}, trying next season", dataset, season),
                Err(e) => {
                    warn!("Fetching {} for {} failed: {}", dataset, season, e);
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) => Err(e),
            None => Ok(SeasonData::new(self.config.seasons.current.clone(), RawRecordSet::new())),
        }
    }

    async fn get_json(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Value> {
        let url = format!("{}/{}", self.config.api.base_url.trim_end_matches('/'), endpoint);

        with_retry(&self.config.retry, || async {
            self.throttle().await;
            info!("Fetching {} with {:?}", url, params);

            let response = self.client.get(&url).query(params).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status { url: url.clone(), status });
            }
            Ok(response.json::<Value>().await?)
        })
        .await
    }

    /// Keep at least the configured delay between consecutive requests
    async fn throttle(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let delay = self.config.api.rate_limit_delay();
            let elapsed = previous.elapsed();
            if elapsed < delay {
                sleep(delay - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

/// Run `f` until it succeeds, fails with a non-transient error, or the
/// attempt budget is spent. Delays grow by the configured multiplier.
pub async fn with_retry<F, Fut, T>(retry: &RetryConfig, mut f: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = retry.max_retries.max(1);
    let mut attempt = 1;

    loop {
        match f().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < attempts && e.is_transient() => {
                let delay = retry.delay_for(attempt);
                warn!("Attempt {} failed: {}, retrying in {:?}", attempt, e, delay);
                sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
