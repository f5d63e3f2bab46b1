//! Record normalizer
//!
//! Turns raw upstream rows with an unpredictable schema into typed player and
//! team records. Column names are matched against alias lists, values are
//! coerced when unambiguous and defaulted otherwise. Team identity always ends
//! up as a non-numeric string, falling back to [`UNKNOWN_TEAM`].

use crate::config::NormalizerConfig;
use crate::models::*;
use serde_json::Value;
use tracing::debug;

const PLAYER_ID: &[&str] = &["id", "player_id", "person_id", "personid"];
const FIRST_NAME: &[&str] = &["first_name", "firstname"];
const LAST_NAME: &[&str] = &["last_name", "lastname", "familyname"];
const FULL_NAME: &[&str] = &["player_name", "player", "name", "full_name"];
const PLAYER_TEAM: &[&str] =
    &["team", "team_abbreviation", "team_abbr", "team_tricode", "teamtricode"];
const GAMES_PLAYED: &[&str] = &["games_played", "gp", "g"];
const MINUTES: &[&str] = &["min", "minutes", "mpg"];
const POINTS: &[&str] = &["pts", "points", "ppg"];
const REBOUNDS: &[&str] = &["reb", "rebounds", "trb"];
const ASSISTS: &[&str] = &["ast", "assists"];
const STEALS: &[&str] = &["stl", "steals"];
const BLOCKS: &[&str] = &["blk", "blocks"];
const FG_PCT: &[&str] = &["fg_pct", "fgpct"];
const FG3_PCT: &[&str] = &["fg3_pct", "fg3pct", "three_pct"];
const FT_PCT: &[&str] = &["ft_pct", "ftpct"];
const FG3M: &[&str] = &["fg3m"];
const FG3A: &[&str] = &["fg3a"];
const TURNOVERS: &[&str] = &["turnover", "turnovers", "tov"];

const TEAM_ID: &[&str] = &["team_id", "teamid", "id"];
const TEAM_NAME: &[&str] = &["team_name", "full_name", "team_full_name"];
const TEAM_CITY: &[&str] = &["team_city", "teamcity", "city"];
const TEAM_NICKNAME: &[&str] = &["team_name_short", "teamname", "nickname"];
const CONFERENCE: &[&str] = &["conference", "conf"];
const WINS: &[&str] = &["wins", "w"];
const LOSSES: &[&str] = &["losses", "l"];
const POINTS_FOR: &[&str] = &["points_for", "pf", "pts"];
const POINTS_AGAINST: &[&str] = &["points_against", "pa", "opp_pts"];

const NULL_LITERALS: &[&str] = &["nan", "none", "null", "n/a"];

/// Normalize raw player rows into typed player records
pub fn normalize_players(raw: &RawRecordSet) -> Vec<PlayerRecord> {
    let players: Vec<PlayerRecord> = raw.iter().map(normalize_player).collect();

    let unknown = players.iter().filter(|p| p.team() == UNKNOWN_TEAM).count();
    debug!("Normalized {} player rows ({} without a usable team)", players.len(), unknown);

    players
}

/// Normalize raw standings rows into typed team records
pub fn normalize_teams(raw: &RawRecordSet, config: &NormalizerConfig) -> Vec<TeamRecord> {
    let teams: Vec<TeamRecord> = raw.iter().map(|row| normalize_team(row, config)).collect();

    let unknown = teams.iter().filter(|t| t.team_name() == UNKNOWN_TEAM).count();
    let unaffiliated = teams.iter().filter(|t| t.conference().is_none()).count();
    debug!(
        "Normalized {} team rows ({} without a usable name, {} without a conference)",
        teams.len(),
        unknown,
        unaffiliated
    );

    teams
}

fn normalize_player(row: &RawRecord) -> PlayerRecord {
    let mut first_name = text(row.lookup(FIRST_NAME));
    let mut last_name = text(row.lookup(LAST_NAME));

    if first_name.is_empty() && last_name.is_empty() {
        let full = text(row.lookup(FULL_NAME));
        match full.split_once(' ') {
            Some((first, last)) => {
                first_name = first.to_string();
                last_name = last.trim().to_string();
            }
            None => first_name = full,
        }
    }

    let identity = PlayerIdentity {
        id: row.lookup(PLAYER_ID).and_then(coerce_id),
        first_name,
        last_name,
        team: team_identity(row.lookup(PLAYER_TEAM)),
    };

    let stats = PlayerStats {
        games_played: count(row.lookup(GAMES_PLAYED)),
        min: stat(row.lookup(MINUTES)),
        pts: stat(row.lookup(POINTS)),
        reb: stat(row.lookup(REBOUNDS)),
        ast: stat(row.lookup(ASSISTS)),
        stl: stat(row.lookup(STEALS)),
        blk: stat(row.lookup(BLOCKS)),
        fg_pct: stat(row.lookup(FG_PCT)),
        fg3_pct: stat(row.lookup(FG3_PCT)),
        ft_pct: stat(row.lookup(FT_PCT)),
        fg3m: stat(row.lookup(FG3M)),
        fg3a: stat(row.lookup(FG3A)),
        turnover: stat(row.lookup(TURNOVERS)),
    };

    PlayerRecord::new(identity, stats)
}

fn normalize_team(row: &RawRecord, config: &NormalizerConfig) -> TeamRecord {
    let mut team_name = team_identity(row.lookup(TEAM_NAME));
    if team_name == UNKNOWN_TEAM {
        let city = identity_text(row.lookup(TEAM_CITY));
        let nickname = identity_text(row.lookup(TEAM_NICKNAME));
        team_name = match (city, nickname) {
            (Some(city), Some(nickname)) => format!("{city} {nickname}"),
            (None, Some(nickname)) => nickname,
            _ => UNKNOWN_TEAM.to_string(),
        };
    }

    let conference = row.lookup(CONFERENCE).and_then(Value::as_str).and_then(Conference::parse);

    let identity =
        TeamIdentity { team_id: row.lookup(TEAM_ID).and_then(coerce_id), team_name, conference };

    let wins = count(row.lookup(WINS)).unwrap_or(0);
    let losses = count(row.lookup(LOSSES)).unwrap_or(0);
    let games_played =
        count(row.lookup(GAMES_PLAYED)).unwrap_or_else(|| wins.saturating_add(losses));

    let (est_for, est_against) = if config.estimate_missing_points {
        let (w, l) = (f64::from(wins), f64::from(losses));
        (
            w * config.winning_score + l * config.losing_score,
            w * config.losing_score + l * config.winning_score,
        )
    } else {
        (0.0, 0.0)
    };

    let stats = TeamStats {
        wins,
        losses,
        games_played,
        points_for: stat(row.lookup(POINTS_FOR)).unwrap_or(est_for),
        points_against: stat(row.lookup(POINTS_AGAINST)).unwrap_or(est_against),
    };

    TeamRecord::new(identity, stats)
}

/// Canonical team identity: a non-blank, non-numeric string or "Unknown"
fn team_identity(value: Option<&Value>) -> String {
    identity_text(value).unwrap_or_else(|| UNKNOWN_TEAM.to_string())
}

fn identity_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => {
            let trimmed = s.trim();
            let unusable = trimmed.is_empty()
                || NULL_LITERALS.iter().any(|lit| trimmed.eq_ignore_ascii_case(lit))
                || parse_numeric_text(trimmed).is_some();
            (!unusable).then(|| trimmed.to_string())
        }
        // a number where a team belongs is a corrupted column, not a team
        _ => None,
    }
}

fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if NULL_LITERALS.iter().any(|lit| trimmed.eq_ignore_ascii_case(lit)) {
                String::new()
            } else {
                trimmed.to_string()
            }
        }
        _ => String::new(),
    }
}

fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_numeric_text(s),
        _ => None,
    }
}

/// Parses plain numbers and `MM:SS` minute strings
fn parse_numeric_text(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if let Some((minutes, seconds)) = trimmed.split_once(':') {
        let minutes: f64 = minutes.trim().parse().ok()?;
        let seconds: f64 = seconds.trim().parse().ok()?;
        if !(0.0..60.0).contains(&seconds) {
            return None;
        }
        return Some(minutes + seconds / 60.0).filter(|v| v.is_finite());
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Non-negative stat value; anything else counts as absent
fn stat(value: Option<&Value>) -> Option<f64> {
    value.and_then(coerce_number).filter(|v| *v >= 0.0)
}

fn count(value: Option<&Value>) -> Option<u32> {
    stat(value).map(|v| v.min(f64::from(u32::MAX)) as u32)
}

fn coerce_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64().filter(|v| v.is_finite() && v.fract() == 0.0).map(|v| v as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
