//! Refresh controller
//!
//! Decides when the upstream source is hit and reruns the engine on whatever
//! comes back. Fetch failures never propagate: they become an unavailable
//! status over an empty board.

use crate::cache::TtlCache;
use crate::models::{Dataset, SeasonData};
use crate::source::StatsSource;
use chrono::{DateTime, Utc};
use serde::Serialize;
use stats_engine::{build_player_board, build_team_board, EngineConfig, PlayerBoard, TeamBoard};
use std::time::Duration;
use tracing::{info, warn};

/// Where a board's data came from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DataStatus {
    Available { season: String, fetched_at: DateTime<Utc> },
    Unavailable { reason: String },
}

/// A board together with the status of the data behind it
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<B> {
    pub status: DataStatus,
    pub board: B,
}

impl<B> Snapshot<B> {
    pub fn is_available(&self) -> bool {
        matches!(self.status, DataStatus::Available { .. })
    }
}

pub struct Dashboard {
    source: Box<dyn StatsSource>,
    engine: EngineConfig,
    ttl: Duration,
    cache: TtlCache<Dataset, SeasonData>,
}

impl Dashboard {
    pub fn new(source: Box<dyn StatsSource>, engine: EngineConfig, ttl: Duration) -> Self {
        info!("Dashboard reading from {} (cache ttl {:?})", source.describe(), ttl);
        Self { source, engine, ttl, cache: TtlCache::new() }
    }

    pub fn engine_config(&self) -> &EngineConfig {
        &self.engine
    }

    pub fn source_description(&self) -> String {
        self.source.describe()
    }

    pub async fn player_board(&self) -> Snapshot<PlayerBoard> {
        match self.load(Dataset::Players).await {
            Ok(data) => Snapshot {
                board: build_player_board(&data.records, &self.engine),
                status: available(&data),
            },
            Err(reason) => {
                Snapshot { status: DataStatus::Unavailable { reason }, board: PlayerBoard::empty() }
            }
        }
    }

    pub async fn team_board(&self) -> Snapshot<TeamBoard> {
        match self.load(Dataset::Teams).await {
            Ok(data) => Snapshot {
                board: build_team_board(&data.records, &self.engine),
                status: available(&data),
            },
            Err(reason) => {
                Snapshot { status: DataStatus::Unavailable { reason }, board: TeamBoard::empty() }
            }
        }
    }

    /// Drop all cached payloads so the next board request refetches
    pub async fn refresh(&self) {
        self.cache.clear().await;
        info!("Cleared cached data; next request refetches from {}", self.source.describe());
    }

    async fn load(&self, dataset: Dataset) -> Result<SeasonData, String> {
        self.cache
            .get_or_refresh(dataset, self.ttl, || self.source.fetch(dataset))
            .await
            .map_err(|e| {
                warn!("Unable to load {}: {}", dataset, e);
                e.to_string()
            })
    }
}

fn available(data: &SeasonData) -> DataStatus {
    DataStatus::Available { season: data.season.clone(), fetched_at: data.fetched_at }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FetchError, Result};
    use async_trait::async_trait;
    use serde_json::json;
    use stats_engine::{RawRecord, RawRecordSet};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct MockSource {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    fn rows(values: Vec<serde_json::Value>) -> RawRecordSet {
        values
            .into_iter()
            .filter_map(|v| v.as_object().cloned().map(RawRecord::from))
            .collect()
    }

    #[async_trait]
    impl StatsSource for MockSource {
        async fn fetch(&self, dataset: Dataset) -> Result<SeasonData> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(FetchError::missing_result_set("upstream is down"));
            }
            let records = match dataset {
                Dataset::Players => rows(vec![
                    json!({"PLAYER": "Jalen Brunson", "TEAM": "NYK", "GP": 60, "PTS": 26.0}),
                    json!({"PLAYER": "Tyrese Haliburton", "TEAM": "IND", "GP": 58, "PTS": 18.6}),
                ]),
                Dataset::Teams => rows(vec![
                    json!({"TeamCity": "New York", "TeamName": "Knicks", "Conference": "East",
                           "WINS": 40, "LOSSES": 20}),
                ]),
            };
            Ok(SeasonData::new("2024-25", records))
        }

        fn describe(&self) -> String {
            "mock".to_string()
        }
    }

    fn dashboard(fail: bool, ttl: Duration) -> (Dashboard, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = MockSource { calls: Arc::clone(&calls), fail };
        (Dashboard::new(Box::new(source), EngineConfig::default(), ttl), calls)
    }

    #[tokio::test]
    async fn test_boards_are_built_from_source() {
        let (dashboard, _) = dashboard(false, Duration::from_secs(3600));

        let players = dashboard.player_board().await;
        assert!(players.is_available());
        assert_eq!(players.board.rankings.len(), 2);
        assert_eq!(players.board.top_scorer.as_ref().map(|p| p.team()), Some("NYK"));

        let teams = dashboard.team_board().await;
        match &teams.status {
            DataStatus::Available { season, .. } => assert_eq!(season, "2024-25"),
            other => panic!("unexpected status {other:?}"),
        }
        assert_eq!(teams.board.east.len(), 1);
    }

    #[tokio::test]
    async fn test_single_stat_leaders_look_past_the_ranking_cut() {
        let mut engine = EngineConfig::default();
        engine.ranking.top_players = 1;
        let source = MockSource { calls: Arc::new(AtomicUsize::new(0)), fail: false };
        let dashboard = Dashboard::new(Box::new(source), engine, Duration::from_secs(3600));

        let board = dashboard.player_board().await.board;
        assert_eq!(board.rankings.len(), 1);
        let scorers = board.top_by_stat(stats_engine::PlayerStat::GamesPlayed, 10, 5);
        let teams: Vec<&str> = scorers.iter().map(|p| p.team()).collect();
        assert_eq!(teams, vec!["NYK", "IND"]);
    }

    #[tokio::test]
    async fn test_cached_payload_is_reused_until_refresh() {
        let (dashboard, calls) = dashboard(false, Duration::from_secs(3600));

        dashboard.player_board().await;
        dashboard.player_board().await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        dashboard.refresh().await;
        dashboard.player_board().await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failure_yields_unavailable_empty_board() {
        let (dashboard, calls) = dashboard(true, Duration::from_secs(3600));

        let players = dashboard.player_board().await;
        assert!(!players.is_available());
        assert!(players.board.is_empty());
        match players.status {
            DataStatus::Unavailable { reason } => assert!(reason.contains("upstream is down")),
            other => panic!("unexpected status {other:?}"),
        }

        let teams = dashboard.team_board().await;
        assert!(teams.board.is_empty());

        // failures are not cached
        dashboard.player_board().await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
