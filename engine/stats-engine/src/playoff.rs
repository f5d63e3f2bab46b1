//! Playoff outlook
//!
//! Bucketed heuristic over projected conference rank. The constants are
//! tuning values kept stable for output compatibility, not a calibrated model.

use crate::models::{Conference, TeamRecord};
use crate::projections::project_team_season_record;
use crate::ranking::descending;
use tracing::debug;

const SEED_BASE: f64 = 95.0;
const SEED_STEP: f64 = 0.5;
const SEED_CAP: f64 = 99.0;
const BUBBLE_BASE: f64 = 50.0;
const BUBBLE_STEP: f64 = 20.0;
const LOTTERY_BASE: f64 = 30.0;
const LOTTERY_STEP: f64 = 5.0;
const LOTTERY_FLOOR: f64 = 5.0;

/// Playoff probability (percent) for a projected conference rank when
/// `spots` teams per conference qualify.
pub fn playoff_probability(conf_rank: u32, spots: u32) -> f64 {
    let distance = i64::from(conf_rank) - i64::from(spots);

    if distance <= 0 {
        (SEED_BASE + (-distance) as f64 * SEED_STEP).min(SEED_CAP)
    } else if distance <= 2 {
        BUBBLE_BASE - distance as f64 * BUBBLE_STEP
    } else {
        (LOTTERY_BASE - distance as f64 * LOTTERY_STEP).max(LOTTERY_FLOOR)
    }
}

/// Rank each conference by projected wins and attach a playoff probability.
///
/// Season projections run first when any team lacks one. Output lists the
/// East, then the West; teams without a conference follow with no rank or
/// probability.
pub fn get_playoff_probability(
    teams: &[TeamRecord],
    spots_per_conference: u32,
    total_games: u32,
) -> Vec<TeamRecord> {
    if teams.is_empty() {
        return Vec::new();
    }

    let projected = if teams.iter().any(|t| t.derived.projection.is_none()) {
        project_team_season_record(teams, total_games)
    } else {
        teams.to_vec()
    };

    let mut outlook = Vec::with_capacity(projected.len());
    for conference in Conference::ALL {
        let mut members: Vec<TeamRecord> =
            projected.iter().filter(|t| t.conference() == Some(conference)).cloned().collect();
        members.sort_by(|a, b| {
            descending(f64::from(a.projected_total_wins()), f64::from(b.projected_total_wins()))
        });

        for (index, team) in members.iter_mut().enumerate() {
            let rank = index as u32 + 1;
            team.derived.conf_rank = Some(rank);
            team.derived.playoff_probability =
                Some(playoff_probability(rank, spots_per_conference));
        }
        debug!("Playoff outlook for {} {} teams", members.len(), conference);
        outlook.extend(members);
    }

    outlook.extend(projected.into_iter().filter(|t| t.conference().is_none()).map(|mut team| {
        team.derived.conf_rank = None;
        team.derived.playoff_probability = None;
        team
    }));
    outlook
}
