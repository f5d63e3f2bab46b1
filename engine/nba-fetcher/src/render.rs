//! Plain-text tables for the terminal dashboard

use stats_engine::{PlayerRecord, TeamRecord};
use std::fmt::Write;

const RULE_WIDTH: usize = 72;

pub fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

fn value(v: Option<f64>) -> String {
    v.map_or_else(|| "-".to_string(), |v| format!("{v:.1}"))
}

fn pct(v: Option<f64>) -> String {
    v.map_or_else(|| "-".to_string(), |v| format!("{:.1}", v * 100.0))
}

fn rank(v: Option<u32>) -> String {
    v.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// Truncate to `width` characters so columns stay aligned
fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut clipped: String = text.chars().take(width.saturating_sub(1)).collect();
        clipped.push('~');
        clipped
    }
}

/// Efficiency ranking with MVP score
pub fn player_rankings(players: &[PlayerRecord]) -> String {
    let mut out = format!(
        "{:>4}  {:<24} {:<7} {:>5} {:>5} {:>5} {:>4} {:>4} {:>5} {:>5} {:>5} {:>3}\n",
        "RK", "PLAYER", "TEAM", "PTS", "REB", "AST", "STL", "BLK", "3P%", "EFF", "MVP", "GP"
    );
    for p in players {
        let s = &p.stats;
        let _ = writeln!(
            out,
            "{:>4}  {:<24} {:<7} {:>5} {:>5} {:>5} {:>4} {:>4} {:>5} {:>5} {:>5} {:>3}",
            rank(p.derived.rank),
            clip(&p.identity().full_name(), 24),
            clip(p.team(), 7),
            value(s.pts),
            value(s.reb),
            value(s.ast),
            value(s.stl),
            value(s.blk),
            pct(s.fg3_pct),
            value(p.derived.efficiency),
            value(p.derived.mvp_score),
            p.games_played(),
        );
    }
    out
}

/// Leader table for one stat, `value_of` picks the column shown
pub fn stat_leaders(
    title: &str,
    players: &[PlayerRecord],
    value_of: impl Fn(&PlayerRecord) -> String,
) -> String {
    let mut out = format!("{title}\n");
    for p in players {
        let _ = writeln!(
            out,
            "{:>4}  {:<24} {:<7} {:>7}",
            rank(p.derived.rank),
            clip(&p.identity().full_name(), 24),
            clip(p.team(), 7),
            value_of(p),
        );
    }
    out
}

/// Projected season totals and the milestones each player is on pace for
pub fn player_projections(players: &[PlayerRecord]) -> String {
    let mut out = format!(
        "{:<24} {:>4} {:>4} {:>7} {:>6} {:>6}  {}\n",
        "PLAYER", "GP", "PROJ", "PTS", "REB", "AST", "ON PACE FOR"
    );
    for p in players {
        let Some(projection) = &p.derived.projection else { continue };
        let on_pace: Vec<String> =
            p.derived.milestones.iter().filter(|m| m.on_pace).map(|m| m.label()).collect();
        let _ = writeln!(
            out,
            "{:<24} {:>4} {:>4} {:>7} {:>6} {:>6}  {}",
            clip(&p.identity().full_name(), 24),
            p.games_played(),
            projection.projected_total_games,
            value(projection.projected_season_pts),
            value(projection.projected_season_reb),
            value(projection.projected_season_ast),
            if on_pace.is_empty() { "-".to_string() } else { on_pace.join(", ") },
        );
    }
    out
}

/// Standings with the rank column chosen by the caller
pub fn standings(teams: &[TeamRecord], rank_of: impl Fn(&TeamRecord) -> Option<u32>) -> String {
    let mut out = format!(
        "{:>3}  {:<26} {:<5} {:>3} {:>3} {:>6} {:>6} {:>6} {:>7}\n",
        "RK", "TEAM", "CONF", "W", "L", "PCT", "PPG", "OPP", "DIFF"
    );
    for t in teams {
        let _ = writeln!(
            out,
            "{:>3}  {:<26} {:<5} {:>3} {:>3} {:>6} {:>6} {:>6} {:>7}",
            rank(rank_of(t)),
            clip(t.team_name(), 26),
            t.conference().map_or_else(|| "-".to_string(), |c| c.to_string()),
            t.stats.wins,
            t.stats.losses,
            t.derived.win_pct.map_or_else(|| "-".to_string(), |v| format!("{v:.3}")),
            value(t.derived.ppg),
            value(t.derived.opp_ppg),
            value(t.derived.point_differential),
        );
    }
    out
}

/// Projected records and playoff odds, grouped by conference
pub fn playoff_outlook(teams: &[TeamRecord]) -> String {
    let mut out = format!(
        "{:>3}  {:<26} {:<5} {:>5} {:>5} {:>9} {:>7}\n",
        "RK", "TEAM", "CONF", "W", "L", "PROJ W-L", "PLAYOFF"
    );
    for t in teams {
        let (wins, losses) = t
            .derived
            .projection
            .as_ref()
            .map_or((0, 0), |p| (p.projected_total_wins, p.projected_total_losses));
        let _ = writeln!(
            out,
            "{:>3}  {:<26} {:<5} {:>5} {:>5} {:>9} {:>7}",
            rank(t.derived.conf_rank),
            clip(t.team_name(), 26),
            t.conference().map_or_else(|| "-".to_string(), |c| c.to_string()),
            t.stats.wins,
            t.stats.losses,
            format!("{wins}-{losses}"),
            t.derived.playoff_probability.map_or_else(|| "-".to_string(), |v| format!("{v:.1}%")),
        );
    }
    out
}
