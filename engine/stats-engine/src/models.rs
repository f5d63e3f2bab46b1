use crate::error::StatsError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Team identity used when the upstream row carries no usable team
pub const UNKNOWN_TEAM: &str = "Unknown";

// ---------------------------------------------------------------------------
// Raw upstream rows
// ---------------------------------------------------------------------------

/// One schema-free upstream row, field name to JSON scalar
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(Map<String, Value>);

impl RawRecord {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// First value found under any of `aliases`, matched case-insensitively
    pub fn lookup(&self, aliases: &[&str]) -> Option<&Value> {
        aliases.iter().find_map(|alias| {
            self.0.get(*alias).or_else(|| {
                self.0.iter().find(|(key, _)| key.eq_ignore_ascii_case(alias)).map(|(_, v)| v)
            })
        })
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for RawRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Ordered collection of raw upstream rows, prior to normalization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecordSet {
    records: Vec<RawRecord>,
}

impl RawRecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build rows from a header list and positional row values.
    ///
    /// Short rows simply lack the trailing fields; extra values are dropped.
    pub fn from_table(headers: &[String], rows: &[Vec<Value>]) -> Self {
        rows.iter()
            .map(|row| headers.iter().cloned().zip(row.iter().cloned()).collect::<RawRecord>())
            .collect()
    }

    pub fn push(&mut self, record: RawRecord) {
        self.records.push(record);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RawRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<RawRecord> for RawRecordSet {
    fn from_iter<I: IntoIterator<Item = RawRecord>>(iter: I) -> Self {
        Self { records: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a RawRecordSet {
    type Item = &'a RawRecord;
    type IntoIter = std::slice::Iter<'a, RawRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

// ---------------------------------------------------------------------------
// Players
// ---------------------------------------------------------------------------

/// Who a player is. Fixed at ingestion; pipeline stages only ever read it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PlayerIdentity {
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub team: String,
}

impl PlayerIdentity {
    /// "First Last", or "Unknown" when both parts are blank
    pub fn full_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        let name = name.trim();
        if name.is_empty() {
            "Unknown".to_string()
        } else {
            name.to_string()
        }
    }
}

/// Per-game stats as ingested. `None` means the upstream row did not carry it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlayerStats {
    pub games_played: Option<u32>,
    pub min: Option<f64>,
    pub pts: Option<f64>,
    pub reb: Option<f64>,
    pub ast: Option<f64>,
    pub stl: Option<f64>,
    pub blk: Option<f64>,
    pub fg_pct: Option<f64>,
    pub fg3_pct: Option<f64>,
    pub ft_pct: Option<f64>,
    pub fg3m: Option<f64>,
    pub fg3a: Option<f64>,
    pub turnover: Option<f64>,
}

impl PlayerStats {
    /// PTS + REB + AST + STL + BLK, missing terms counted as zero
    pub fn efficiency(&self) -> f64 {
        [self.pts, self.reb, self.ast, self.stl, self.blk].iter().map(|v| v.unwrap_or(0.0)).sum()
    }
}

/// Season projection for one player
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerProjection {
    pub projected_total_games: u32,
    pub remaining_games: u32,
    pub projected_season_pts: Option<f64>,
    pub projected_season_reb: Option<f64>,
    pub projected_season_ast: Option<f64>,
    pub projected_season_stl: Option<f64>,
    pub projected_season_blk: Option<f64>,
    pub projected_season_efficiency: Option<f64>,
    // rates are carried forward, not extrapolated
    pub projected_fg_pct: Option<f64>,
    pub projected_fg3_pct: Option<f64>,
    pub projected_ft_pct: Option<f64>,
}

impl PlayerProjection {
    /// Projected season total for a milestone category
    pub fn season_total(&self, category: MilestoneCategory) -> Option<f64> {
        match category {
            MilestoneCategory::Points => self.projected_season_pts,
            MilestoneCategory::Rebounds => self.projected_season_reb,
            MilestoneCategory::Assists => self.projected_season_ast,
            MilestoneCategory::Steals => self.projected_season_stl,
            MilestoneCategory::Blocks => self.projected_season_blk,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MilestoneCategory {
    Points,
    Rebounds,
    Assists,
    Steals,
    Blocks,
}

impl MilestoneCategory {
    pub const ALL: [MilestoneCategory; 5] = [
        MilestoneCategory::Points,
        MilestoneCategory::Rebounds,
        MilestoneCategory::Assists,
        MilestoneCategory::Steals,
        MilestoneCategory::Blocks,
    ];

    pub fn abbreviation(&self) -> &'static str {
        match self {
            MilestoneCategory::Points => "pts",
            MilestoneCategory::Rebounds => "rebs",
            MilestoneCategory::Assists => "asts",
            MilestoneCategory::Steals => "stls",
            MilestoneCategory::Blocks => "blks",
        }
    }
}

/// Whether a player's projected season total reaches a threshold
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Milestone {
    pub category: MilestoneCategory,
    pub threshold: f64,
    pub on_pace: bool,
}

impl Milestone {
    /// Label such as `2000_pts_pace`
    pub fn label(&self) -> String {
        format!("{}_{}_pace", self.threshold, self.category.abbreviation())
    }
}

/// Values computed by the pipeline. Never holds identity data.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlayerDerived {
    pub efficiency: Option<f64>,
    pub rank: Option<u32>,
    pub projection: Option<PlayerProjection>,
    pub mvp_score: Option<f64>,
    pub milestones: Vec<Milestone>,
}

/// A player row: immutable identity, ingested stats, derived metrics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerRecord {
    identity: PlayerIdentity,
    pub stats: PlayerStats,
    pub derived: PlayerDerived,
}

impl PlayerRecord {
    pub fn new(identity: PlayerIdentity, stats: PlayerStats) -> Self {
        Self { identity, stats, derived: PlayerDerived::default() }
    }

    pub fn identity(&self) -> &PlayerIdentity {
        &self.identity
    }

    pub fn team(&self) -> &str {
        &self.identity.team
    }

    pub fn games_played(&self) -> u32 {
        self.stats.games_played.unwrap_or(0)
    }

    /// Stored efficiency, or computed from stats when not yet derived
    pub fn efficiency(&self) -> f64 {
        self.derived.efficiency.unwrap_or_else(|| self.stats.efficiency())
    }

    /// Whether a projected season total reaches `threshold`
    pub fn is_on_pace(&self, category: MilestoneCategory, threshold: f64) -> bool {
        self.derived
            .milestones
            .iter()
            .any(|m| m.category == category && m.threshold == threshold && m.on_pace)
    }
}

/// Stat a player ranking can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerStat {
    Points,
    Rebounds,
    Assists,
    Steals,
    Blocks,
    Minutes,
    GamesPlayed,
    FieldGoalPct,
    ThreePointPct,
    FreeThrowPct,
    ThreePointersMade,
    ThreePointAttempts,
    Turnovers,
    Efficiency,
    MvpScore,
}

impl PlayerStat {
    /// The value a record carries for this stat, if any
    pub fn value(&self, record: &PlayerRecord) -> Option<f64> {
        let stats = &record.stats;
        match self {
            PlayerStat::Points => stats.pts,
            PlayerStat::Rebounds => stats.reb,
            PlayerStat::Assists => stats.ast,
            PlayerStat::Steals => stats.stl,
            PlayerStat::Blocks => stats.blk,
            PlayerStat::Minutes => stats.min,
            PlayerStat::GamesPlayed => stats.games_played.map(f64::from),
            PlayerStat::FieldGoalPct => stats.fg_pct,
            PlayerStat::ThreePointPct => stats.fg3_pct,
            PlayerStat::FreeThrowPct => stats.ft_pct,
            PlayerStat::ThreePointersMade => stats.fg3m,
            PlayerStat::ThreePointAttempts => stats.fg3a,
            PlayerStat::Turnovers => stats.turnover,
            PlayerStat::Efficiency => Some(record.efficiency()),
            PlayerStat::MvpScore => record.derived.mvp_score,
        }
    }

    pub fn field_name(&self) -> &'static str {
        match self {
            PlayerStat::Points => "pts",
            PlayerStat::Rebounds => "reb",
            PlayerStat::Assists => "ast",
            PlayerStat::Steals => "stl",
            PlayerStat::Blocks => "blk",
            PlayerStat::Minutes => "min",
            PlayerStat::GamesPlayed => "games_played",
            PlayerStat::FieldGoalPct => "fg_pct",
            PlayerStat::ThreePointPct => "fg3_pct",
            PlayerStat::FreeThrowPct => "ft_pct",
            PlayerStat::ThreePointersMade => "fg3m",
            PlayerStat::ThreePointAttempts => "fg3a",
            PlayerStat::Turnovers => "turnover",
            PlayerStat::Efficiency => "efficiency",
            PlayerStat::MvpScore => "mvp_score",
        }
    }
}

impl fmt::Display for PlayerStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

impl FromStr for PlayerStat {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stat = match s.trim().to_ascii_lowercase().as_str() {
            "pts" | "points" => PlayerStat::Points,
            "reb" | "rebounds" => PlayerStat::Rebounds,
            "ast" | "assists" => PlayerStat::Assists,
            "stl" | "steals" => PlayerStat::Steals,
            "blk" | "blocks" => PlayerStat::Blocks,
            "min" | "minutes" => PlayerStat::Minutes,
            "gp" | "games_played" => PlayerStat::GamesPlayed,
            "fg_pct" => PlayerStat::FieldGoalPct,
            "fg3_pct" => PlayerStat::ThreePointPct,
            "ft_pct" => PlayerStat::FreeThrowPct,
            "fg3m" => PlayerStat::ThreePointersMade,
            "fg3a" => PlayerStat::ThreePointAttempts,
            "tov" | "turnover" | "turnovers" => PlayerStat::Turnovers,
            "efficiency" => PlayerStat::Efficiency,
            "mvp_score" => PlayerStat::MvpScore,
            _ => return Err(StatsError::UnknownStat(s.to_string())),
        };
        Ok(stat)
    }
}

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Conference {
    East,
    West,
}

impl Conference {
    pub const ALL: [Conference; 2] = [Conference::East, Conference::West];

    /// Accepts "East", "Eastern", "E" and the West equivalents, any case
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "east" | "eastern" | "e" => Some(Conference::East),
            "west" | "western" | "w" => Some(Conference::West),
            _ => None,
        }
    }
}

impl fmt::Display for Conference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conference::East => f.write_str("East"),
            Conference::West => f.write_str("West"),
        }
    }
}

/// Who a team is. Fixed at ingestion; pipeline stages only ever read it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TeamIdentity {
    pub team_id: Option<i64>,
    pub team_name: String,
    pub conference: Option<Conference>,
}

/// Season record as ingested
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TeamStats {
    pub wins: u32,
    pub losses: u32,
    pub games_played: u32,
    pub points_for: f64,
    pub points_against: f64,
}

impl TeamStats {
    pub fn decided_games(&self) -> u32 {
        self.wins.saturating_add(self.losses)
    }

    /// wins / (wins + losses), zero before the first game
    pub fn win_pct(&self) -> f64 {
        match self.decided_games() {
            0 => 0.0,
            games => f64::from(self.wins) / f64::from(games),
        }
    }

    pub fn point_differential(&self) -> f64 {
        self.points_for - self.points_against
    }
}

/// Season projection for one team
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamProjection {
    pub current_win_pct: f64,
    pub remaining_games: u32,
    pub projected_remaining_wins: f64,
    pub projected_remaining_losses: f64,
    pub projected_total_wins: u32,
    pub projected_total_losses: u32,
    pub projected_point_differential: f64,
    pub projected_total_points_for: f64,
    pub projected_total_points_against: f64,
}

/// Values computed by the pipeline. Never holds identity data.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TeamDerived {
    pub win_pct: Option<f64>,
    pub point_differential: Option<f64>,
    pub ppg: Option<f64>,
    pub opp_ppg: Option<f64>,
    pub overall_rank: Option<u32>,
    pub conf_rank: Option<u32>,
    pub projection: Option<TeamProjection>,
    pub playoff_probability: Option<f64>,
}

/// A team row: immutable identity, ingested record, derived metrics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamRecord {
    identity: TeamIdentity,
    pub stats: TeamStats,
    pub derived: TeamDerived,
}

impl TeamRecord {
    pub fn new(identity: TeamIdentity, stats: TeamStats) -> Self {
        Self { identity, stats, derived: TeamDerived::default() }
    }

    pub fn identity(&self) -> &TeamIdentity {
        &self.identity
    }

    pub fn team_name(&self) -> &str {
        &self.identity.team_name
    }

    pub fn conference(&self) -> Option<Conference> {
        self.identity.conference
    }

    /// Stored point differential, or computed from the raw totals
    pub fn point_differential(&self) -> f64 {
        self.derived.point_differential.unwrap_or_else(|| self.stats.point_differential())
    }

    pub fn projected_total_wins(&self) -> u32 {
        self.derived.projection.as_ref().map_or(0, |p| p.projected_total_wins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lebron() -> PlayerRecord {
        PlayerRecord::new(
            PlayerIdentity {
                id: Some(2544),
                first_name: "LeBron".to_string(),
                last_name: "James".to_string(),
                team: "LAL".to_string(),
            },
            PlayerStats {
                games_played: Some(50),
                pts: Some(25.5),
                reb: Some(7.2),
                ast: Some(7.8),
                stl: Some(1.2),
                blk: Some(0.8),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_raw_record_lookup_is_case_insensitive() {
        let record: RawRecord =
            [("TEAM_ABBREVIATION", json!("BOS")), ("PTS", json!(26.9))].into_iter().collect();

        assert_eq!(record.lookup(&["team", "team_abbreviation"]), Some(&json!("BOS")));
        assert_eq!(record.lookup(&["pts"]), Some(&json!(26.9)));
        assert_eq!(record.lookup(&["reb"]), None);
    }

    #[test]
    fn test_raw_record_set_from_table() {
        let headers = vec!["PLAYER_ID".to_string(), "PLAYER".to_string(), "PTS".to_string()];
        let rows = vec![
            vec![json!(1), json!("Luka Doncic"), json!(33.9)],
            vec![json!(2), json!("Short Row")],
        ];

        let set = RawRecordSet::from_table(&headers, &rows);
        assert_eq!(set.len(), 2);
        let first = set.iter().next().unwrap();
        assert_eq!(first.get("PTS"), Some(&json!(33.9)));
        let second = set.iter().nth(1).unwrap();
        assert_eq!(second.len(), 2);
        assert_eq!(second.get("PTS"), None);
    }

    #[test]
    fn test_efficiency_sums_five_counting_stats() {
        let player = lebron();
        assert!((player.efficiency() - 42.5).abs() < 1e-9);
    }

    #[test]
    fn test_efficiency_treats_missing_as_zero() {
        let stats = PlayerStats { pts: Some(10.0), ast: Some(4.0), ..Default::default() };
        assert_eq!(stats.efficiency(), 14.0);
        assert_eq!(PlayerStats::default().efficiency(), 0.0);
    }

    #[test]
    fn test_full_name() {
        assert_eq!(lebron().identity().full_name(), "LeBron James");
        let nameless = PlayerIdentity {
            id: None,
            first_name: String::new(),
            last_name: " ".to_string(),
            team: UNKNOWN_TEAM.to_string(),
        };
        assert_eq!(nameless.full_name(), "Unknown");
    }

    #[test]
    fn test_player_stat_parsing() {
        assert_eq!("pts".parse::<PlayerStat>().unwrap(), PlayerStat::Points);
        assert_eq!("FG3_PCT".parse::<PlayerStat>().unwrap(), PlayerStat::ThreePointPct);
        assert_eq!("tov".parse::<PlayerStat>().unwrap(), PlayerStat::Turnovers);
        assert!(matches!("dunks".parse::<PlayerStat>(), Err(StatsError::UnknownStat(_))));
    }

    #[test]
    fn test_player_stat_value() {
        let player = lebron();
        assert_eq!(PlayerStat::Points.value(&player), Some(25.5));
        assert_eq!(PlayerStat::GamesPlayed.value(&player), Some(50.0));
        assert_eq!(PlayerStat::FieldGoalPct.value(&player), None);
        assert_eq!(PlayerStat::MvpScore.value(&player), None);
    }

    #[test]
    fn test_conference_parse() {
        assert_eq!(Conference::parse("East"), Some(Conference::East));
        assert_eq!(Conference::parse(" western "), Some(Conference::West));
        assert_eq!(Conference::parse("Central"), None);
    }

    #[test]
    fn test_team_win_pct() {
        let stats = TeamStats { wins: 50, losses: 30, games_played: 80, ..Default::default() };
        assert_eq!(stats.win_pct(), 0.625);
        assert_eq!(TeamStats::default().win_pct(), 0.0);
    }

    #[test]
    fn test_milestone_label() {
        let milestone =
            Milestone { category: MilestoneCategory::Points, threshold: 2000.0, on_pace: true };
        assert_eq!(milestone.label(), "2000_pts_pace");
    }
}
