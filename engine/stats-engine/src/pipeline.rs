//! Pipeline boards
//!
//! Compose the individual stages into the two views a dashboard renders: a
//! player board and a team board. Both are rebuilt from a raw record set on
//! every refresh and never mutated afterwards.

use crate::config::EngineConfig;
use crate::models::*;
use crate::normalizer::{normalize_players, normalize_teams};
use crate::playoff::get_playoff_probability;
use crate::projections::{
    calculate_mvp_score, get_player_milestone_projections, project_player_season_stats,
    project_team_season_record,
};
use crate::ranking::{
    calculate_player_efficiency, calculate_team_standings, get_top_players_by_stat, rank_players,
    three_point_leaders,
};
use crate::standings::split_by_conference;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

/// Stats shown as per-category leader tables
pub const LEADER_STATS: [PlayerStat; 5] = [
    PlayerStat::Points,
    PlayerStat::Rebounds,
    PlayerStat::Assists,
    PlayerStat::Steals,
    PlayerStat::Blocks,
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatLeaders {
    pub stat: PlayerStat,
    pub players: Vec<PlayerRecord>,
}

/// Everything derived from one player fetch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerBoard {
    pub generated_at: DateTime<Utc>,
    /// Players that cleared the games-played floor
    pub players_analyzed: usize,
    /// Every eligible player, projected and scored, before the ranking cut
    pub eligible: Vec<PlayerRecord>,
    /// Efficiency ranking with projections, MVP scores and milestones
    pub rankings: Vec<PlayerRecord>,
    pub top_scorer: Option<PlayerRecord>,
    pub top_rebounder: Option<PlayerRecord>,
    pub top_playmaker: Option<PlayerRecord>,
    pub stat_leaders: Vec<StatLeaders>,
    pub three_point_leaders: Vec<PlayerRecord>,
}

impl PlayerBoard {
    pub fn empty() -> Self {
        Self {
            generated_at: Utc::now(),
            players_analyzed: 0,
            eligible: Vec::new(),
            rankings: Vec::new(),
            top_scorer: None,
            top_rebounder: None,
            top_playmaker: None,
            stat_leaders: Vec::new(),
            three_point_leaders: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.players_analyzed == 0
    }

    /// Top `top_n` eligible players by any stat, not just the precomputed ones
    pub fn top_by_stat(
        &self,
        stat: PlayerStat,
        top_n: usize,
        min_games: u32,
    ) -> Vec<PlayerRecord> {
        get_top_players_by_stat(&self.eligible, stat, top_n, min_games)
    }

    /// Leader table for one stat, if it was built
    pub fn leaders(&self, stat: PlayerStat) -> &[PlayerRecord] {
        self.stat_leaders
            .iter()
            .find(|leaders| leaders.stat == stat)
            .map(|leaders| leaders.players.as_slice())
            .unwrap_or_default()
    }
}

/// Everything derived from one standings fetch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamBoard {
    pub generated_at: DateTime<Utc>,
    /// League-wide standings, trimmed to the configured size
    pub standings: Vec<TeamRecord>,
    pub east: Vec<TeamRecord>,
    pub west: Vec<TeamRecord>,
    /// Every team with its season projection and playoff probability
    pub playoff_outlook: Vec<TeamRecord>,
}

impl TeamBoard {
    pub fn empty() -> Self {
        Self {
            generated_at: Utc::now(),
            standings: Vec::new(),
            east: Vec::new(),
            west: Vec::new(),
            playoff_outlook: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.playoff_outlook.is_empty()
    }
}

/// Normalize, score, project and rank one raw player payload
pub fn build_player_board(raw: &RawRecordSet, config: &EngineConfig) -> PlayerBoard {
    let min_games = config.ranking.min_games_played;
    let total_games = config.season.total_season_games;
    let top_stat = config.ranking.top_stat_players;

    let players = normalize_players(raw);
    let eligible = calculate_player_efficiency(&players, min_games);
    let projected = project_player_season_stats(&eligible, total_games);
    let scored = calculate_mvp_score(&projected);
    let flagged = get_player_milestone_projections(&scored, &config.milestones, total_games);
    let rankings = rank_players(&flagged, config.ranking.effective_top_players(), min_games);

    let leader = |stat: PlayerStat| {
        get_top_players_by_stat(&flagged, stat, 1, min_games).into_iter().next()
    };
    let stat_leaders = LEADER_STATS
        .iter()
        .map(|&stat| StatLeaders {
            stat,
            players: get_top_players_by_stat(&flagged, stat, top_stat, min_games),
        })
        .collect();

    let board = PlayerBoard {
        generated_at: Utc::now(),
        players_analyzed: flagged.len(),
        top_scorer: leader(PlayerStat::Points),
        top_rebounder: leader(PlayerStat::Rebounds),
        top_playmaker: leader(PlayerStat::Assists),
        stat_leaders,
        three_point_leaders: three_point_leaders(
            &flagged,
            top_stat,
            config.ranking.min_three_point_attempts,
            min_games,
        ),
        rankings,
        eligible: flagged,
    };

    info!(
        "Built player board: {} raw rows, {} eligible, {} ranked",
        raw.len(),
        board.players_analyzed,
        board.rankings.len()
    );
    board
}

/// Normalize, rank, split and project one raw standings payload
pub fn build_team_board(raw: &RawRecordSet, config: &EngineConfig) -> TeamBoard {
    let teams = normalize_teams(raw, &config.normalizer);
    let standings = calculate_team_standings(&teams);
    let (east, west) = split_by_conference(&standings);
    let projected = project_team_season_record(&standings, config.season.total_season_games);
    let playoff_outlook = get_playoff_probability(
        &projected,
        config.playoffs.spots_per_conference,
        config.season.total_season_games,
    );

    let mut top = standings;
    top.truncate(config.ranking.top_teams);

    info!(
        "Built team board: {} teams ({} East, {} West)",
        playoff_outlook.len(),
        east.len(),
        west.len()
    );

    TeamBoard { generated_at: Utc::now(), standings: top, east, west, playoff_outlook }
}
