use crate::error::{Result, StatsError};
use crate::models::MilestoneCategory;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the stats engine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Season shape
    pub season: SeasonConfig,

    /// Ranking eligibility and display sizes
    pub ranking: RankingConfig,

    /// Playoff heuristic parameters
    pub playoffs: PlayoffConfig,

    /// Milestone thresholds checked against projected season totals
    pub milestones: MilestoneThresholds,

    /// Record normalizer settings
    pub normalizer: NormalizerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonConfig {
    /// Games in a regular season (82 for the NBA)
    pub total_season_games: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Players with fewer games are left out of rankings and stat leaders
    pub min_games_played: u32,

    /// Size of the main player ranking
    pub top_players: usize,

    /// Upper bound for `top_players`
    pub max_top_players: usize,

    /// Rows shown in the league-wide standings
    pub top_teams: usize,

    /// Rows shown per stat leader table
    pub top_stat_players: usize,

    /// Minimum three-point attempts per game for the 3P% leaders
    pub min_three_point_attempts: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayoffConfig {
    /// Guaranteed playoff spots per conference
    pub spots_per_conference: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MilestoneThresholds {
    pub points: Vec<f64>,
    pub rebounds: Vec<f64>,
    pub assists: Vec<f64>,
    pub steals: Vec<f64>,
    pub blocks: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Fill missing team points totals from the win/loss record
    pub estimate_missing_points: bool,

    /// Points credited to a team per win when estimating
    pub winning_score: f64,

    /// Points credited to a team per loss when estimating
    pub losing_score: f64,
}

impl Default for SeasonConfig {
    fn default() -> Self {
        Self { total_season_games: 82 }
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            min_games_played: 5,
            top_players: 50,
            max_top_players: 100,
            top_teams: 30,
            top_stat_players: 10,
            min_three_point_attempts: 2.0,
        }
    }
}

impl Default for PlayoffConfig {
    fn default() -> Self {
        Self { spots_per_conference: 8 }
    }
}

impl Default for MilestoneThresholds {
    fn default() -> Self {
        Self {
            points: vec![1500.0, 2000.0, 2500.0],
            rebounds: vec![500.0, 750.0, 1000.0],
            assists: vec![500.0, 750.0, 1000.0],
            steals: vec![100.0, 150.0, 200.0],
            blocks: vec![100.0, 150.0, 200.0],
        }
    }
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self { estimate_missing_points: true, winning_score: 115.0, losing_score: 105.0 }
    }
}

impl MilestoneThresholds {
    /// Thresholds configured for one stat category
    pub fn for_category(&self, category: MilestoneCategory) -> &[f64] {
        match category {
            MilestoneCategory::Points => &self.points,
            MilestoneCategory::Rebounds => &self.rebounds,
            MilestoneCategory::Assists => &self.assists,
            MilestoneCategory::Steals => &self.steals,
            MilestoneCategory::Blocks => &self.blocks,
        }
    }
}

impl RankingConfig {
    /// Ranking size after applying the display cap
    pub fn effective_top_players(&self) -> usize {
        self.top_players.min(self.max_top_players)
    }
}

impl EngineConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(games) = std::env::var("NBA_TOTAL_SEASON_GAMES") {
            config.season.total_season_games = games.parse().unwrap_or(82);
        }

        if let Ok(min_games) = std::env::var("NBA_MIN_GAMES") {
            config.ranking.min_games_played = min_games.parse().unwrap_or(5);
        }

        if let Ok(top) = std::env::var("NBA_TOP_PLAYERS") {
            config.ranking.top_players = top.parse().unwrap_or(50);
        }

        if let Ok(top) = std::env::var("NBA_TOP_TEAMS") {
            config.ranking.top_teams = top.parse().unwrap_or(30);
        }

        if let Ok(spots) = std::env::var("NBA_PLAYOFF_SPOTS") {
            config.playoffs.spots_per_conference = spots.parse().unwrap_or(8);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an optional TOML file layered under
    /// `NBA__`-prefixed environment variables (e.g. `NBA__RANKING__TOP_PLAYERS`).
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

    /// Reject settings the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.season.total_season_games == 0 {
            return Err(StatsError::InvalidConfig("total_season_games must be positive".into()));
        }
        if self.playoffs.spots_per_conference == 0 {
            return Err(StatsError::InvalidConfig("spots_per_conference must be positive".into()));
        }
        if self.ranking.top_players == 0 || self.ranking.max_top_players == 0 {
            return Err(StatsError::InvalidConfig("player ranking size must be positive".into()));
        }
        if !(self.ranking.min_three_point_attempts >= 0.0) {
            return Err(StatsError::InvalidConfig(format!(
                "min_three_point_attempts must be non-negative, got {}",
                self.ranking.min_three_point_attempts
            )));
        }
        let scores = [self.normalizer.winning_score, self.normalizer.losing_score];
        if scores.iter().any(|s| !s.is_finite() || *s < 0.0) {
            return Err(StatsError::InvalidConfig("estimated scores must be non-negative".into()));
        }
        Ok(())
    }
}
