//! NBA Stats Engine
//!
//! Turns raw league payloads into typed player and team records, then derives
//! efficiency rankings, season projections, conference standings and a
//! playoff outlook. Every stage is a pure function from one record set to a
//! new one; inputs are never mutated.

pub mod config;
pub mod error;
pub mod models;
pub mod normalizer;
pub mod pipeline;
pub mod playoff;
pub mod projections;
pub mod ranking;
pub mod standings;

pub use config::EngineConfig;
pub use error::{Result, StatsError};
pub use models::*;
pub use normalizer::{normalize_players, normalize_teams};
pub use pipeline::{build_player_board, build_team_board, PlayerBoard, StatLeaders, TeamBoard};
pub use playoff::{get_playoff_probability, playoff_probability};
pub use projections::{
    calculate_mvp_score, get_player_milestone_projections, project_player_season_stats,
    project_team_season_record,
};
pub use ranking::{
    calculate_player_efficiency, calculate_team_rankings, calculate_team_standings,
    get_top_players_by_stat, rank_players, three_point_leaders,
};
pub use standings::{get_conference_standings, split_by_conference};
