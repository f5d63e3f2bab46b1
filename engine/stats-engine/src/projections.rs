//! Season projections
//!
//! Linear extrapolation of current per-game numbers to a full season. This is
//! a pace estimate, not a statistical model.

use crate::config::MilestoneThresholds;
use crate::models::*;
use tracing::debug;

/// Smallest season fraction used when extrapolating, avoids dividing by zero
const MIN_SEASON_PROGRESS: f64 = 0.01;

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Fraction of the season a player has appeared in, clamped to [0.01, 1.0]
pub fn season_progress(games_played: u32, total_games: u32) -> f64 {
    if total_games == 0 {
        return 1.0;
    }
    (f64::from(games_played) / f64::from(total_games)).clamp(MIN_SEASON_PROGRESS, 1.0)
}

/// Games a player is on pace to play, capped at the season length
pub fn projected_total_games(games_played: u32, total_games: u32) -> u32 {
    let pace = f64::from(games_played) / season_progress(games_played, total_games);
    // pace is a whole number up to float error
    pace.min(f64::from(total_games)).round() as u32
}

/// Attach a season projection to every player
pub fn project_player_season_stats(
    players: &[PlayerRecord],
    total_games: u32,
) -> Vec<PlayerRecord> {
    let projected: Vec<PlayerRecord> = players
        .iter()
        .cloned()
        .map(|mut player| {
            player.derived.projection = Some(project_player(&player, total_games));
            player
        })
        .collect();

    debug!("Projected season stats for {} players over {} games", projected.len(), total_games);
    projected
}

fn project_player(player: &PlayerRecord, total_games: u32) -> PlayerProjection {
    let stats = &player.stats;
    let games_played = player.games_played();
    let games = projected_total_games(games_played, total_games);
    let season_total = |per_game: Option<f64>| per_game.map(|v| round1(v * f64::from(games)));

    PlayerProjection {
        projected_total_games: games,
        remaining_games: games.saturating_sub(games_played),
        projected_season_pts: season_total(stats.pts),
        projected_season_reb: season_total(stats.reb),
        projected_season_ast: season_total(stats.ast),
        projected_season_stl: season_total(stats.stl),
        projected_season_blk: season_total(stats.blk),
        projected_season_efficiency: season_total(player.derived.efficiency),
        projected_fg_pct: stats.fg_pct,
        projected_fg3_pct: stats.fg3_pct,
        projected_ft_pct: stats.ft_pct,
    }
}

/// Attach a projected final record to every team.
///
/// Remaining games are split by the current win percentage; the projected
/// totals are truncated to whole games.
pub fn project_team_season_record(teams: &[TeamRecord], total_games: u32) -> Vec<TeamRecord> {
    let projected: Vec<TeamRecord> = teams
        .iter()
        .cloned()
        .map(|mut team| {
            team.derived.projection = Some(project_team(&team.stats, total_games));
            team
        })
        .collect();

    debug!("Projected season records for {} teams over {} games", projected.len(), total_games);
    projected
}

fn project_team(stats: &TeamStats, total_games: u32) -> TeamProjection {
    let current_win_pct = stats.win_pct();
    let remaining_games = total_games.saturating_sub(stats.games_played);
    let remaining = f64::from(remaining_games);

    let projected_remaining_wins = remaining * current_win_pct;
    let projected_remaining_losses = remaining * (1.0 - current_win_pct);

    let season = f64::from(total_games);
    let (projected_point_differential, projected_total_points_for, projected_total_points_against) =
        match stats.games_played {
            0 => (0.0, 0.0, 0.0),
            games => {
                let games = f64::from(games);
                (
                    round1(stats.point_differential() / games * season),
                    round1(stats.points_for / games * season),
                    round1(stats.points_against / games * season),
                )
            }
        };

    TeamProjection {
        current_win_pct,
        remaining_games,
        projected_remaining_wins,
        projected_remaining_losses,
        // remaining share is taken to one decimal before truncating to whole games
        projected_total_wins: whole_games(stats.wins, projected_remaining_wins),
        projected_total_losses: whole_games(stats.losses, projected_remaining_losses),
        projected_point_differential,
        projected_total_points_for,
        projected_total_points_against,
    }
}

fn whole_games(current: u32, projected_remaining: f64) -> u32 {
    (f64::from(current) + round1(projected_remaining)) as u32
}

/// Flag, for every configured threshold, whether each player's projected
/// season total reaches it. Players are projected first if needed.
pub fn get_player_milestone_projections(
    players: &[PlayerRecord],
    thresholds: &MilestoneThresholds,
    total_games: u32,
) -> Vec<PlayerRecord> {
    let projected = if players.iter().any(|p| p.derived.projection.is_none()) {
        project_player_season_stats(players, total_games)
    } else {
        players.to_vec()
    };

    projected
        .into_iter()
        .map(|mut player| {
            if let Some(projection) = &player.derived.projection {
                player.derived.milestones = milestones_for(projection, thresholds);
            }
            player
        })
        .collect()
}

fn milestones_for(
    projection: &PlayerProjection,
    thresholds: &MilestoneThresholds,
) -> Vec<Milestone> {
    MilestoneCategory::ALL
        .iter()
        .flat_map(|&category| {
            let total = projection.season_total(category);
            thresholds.for_category(category).iter().map(move |&threshold| Milestone {
                category,
                threshold,
                on_pace: total.is_some_and(|t| t >= threshold),
            })
        })
        .collect()
}

/// Efficiency scaled to 0-100 against the best player in the set
pub fn calculate_mvp_score(players: &[PlayerRecord]) -> Vec<PlayerRecord> {
    let max_efficiency = players.iter().map(PlayerRecord::efficiency).fold(0.0, f64::max);

    players
        .iter()
        .cloned()
        .map(|mut player| {
            let efficiency = player.efficiency();
            player.derived.efficiency = Some(efficiency);
            player.derived.mvp_score = Some(if max_efficiency > 0.0 {
                round1(efficiency / max_efficiency * 100.0)
            } else {
                0.0
            });
            player
        })
        .collect()
}
