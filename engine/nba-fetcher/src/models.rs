use crate::error::{FetchError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use stats_engine::{RawRecord, RawRecordSet};
use std::fmt;

/// The two payloads the dashboard needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dataset {
    Players,
    Teams,
}

impl Dataset {
    /// Result set name the endpoint uses for this dataset
    pub fn result_set_name(&self) -> &'static str {
        match self {
            Dataset::Players => "LeagueLeaders",
            Dataset::Teams => "Standings",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dataset::Players => f.write_str("players"),
            Dataset::Teams => f.write_str("teams"),
        }
    }
}

/// One fetched payload, tagged with the season it came from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonData {
    pub season: String,
    pub fetched_at: DateTime<Utc>,
    pub records: RawRecordSet,
}

impl SeasonData {
    pub fn new(season: impl Into<String>, records: RawRecordSet) -> Self {
        Self { season: season.into(), fetched_at: Utc::now(), records }
    }
}

/// stats.nba.com response envelope. Leaders endpoints use `resultSet`,
/// standings use `resultSets`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatsResponse {
    #[serde(rename = "resultSet")]
    pub result_set: Option<ResultSet>,

    #[serde(rename = "resultSets", default)]
    pub result_sets: Vec<ResultSet>,
}

/// A header row plus positional data rows
#[derive(Debug, Clone, Deserialize)]
pub struct ResultSet {
    #[serde(default)]
    pub name: String,

    pub headers: Vec<String>,

    #[serde(rename = "rowSet")]
    pub row_set: Vec<Vec<Value>>,
}

impl StatsResponse {
    /// The result set called `name`, else the first one present
    pub fn table(&self, name: &str) -> Option<&ResultSet> {
        let all = || self.result_set.iter().chain(self.result_sets.iter());
        all().find(|set| set.name.eq_ignore_ascii_case(name)).or_else(|| all().next())
    }
}

impl ResultSet {
    pub fn to_records(&self) -> RawRecordSet {
        RawRecordSet::from_table(&self.headers, &self.row_set)
    }
}

/// Turn a payload into raw rows.
///
/// Accepts a stats.nba.com envelope, a bare `ResultSet`, or an array of
/// row objects (the shape of locally saved snapshots).
pub fn parse_payload(payload: Value, dataset: Dataset) -> Result<RawRecordSet> {
    if let Value::Array(rows) = payload {
        return Ok(rows
            .into_iter()
            .filter_map(|row| match row {
                Value::Object(map) => Some(RawRecord::from(map)),
                _ => None,
            })
            .collect());
    }

    if !payload.is_object() {
        return Err(FetchError::missing_result_set(format!(
            "expected an object or array for {dataset}, got {payload}"
        )));
    }

    if payload.get("headers").is_some() && payload.get("rowSet").is_some() {
        let set: ResultSet = serde_json::from_value(payload)?;
        return Ok(set.to_records());
    }

    let response: StatsResponse = serde_json::from_value(payload)?;
    response
        .table(dataset.result_set_name())
        .map(ResultSet::to_records)
        .ok_or_else(|| FetchError::missing_result_set(format!("no table for {dataset}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_leaders_envelope() {
        let payload = json!({
            "resource": "leagueleaders",
            "resultSet": {
                "name": "LeagueLeaders",
                "headers": ["PLAYER_ID", "PLAYER", "TEAM", "GP", "PTS"],
                "rowSet": [
                    [1628983, "Shai Gilgeous-Alexander", "OKC", 76, 32.7],
                    [1630162, "Anthony Edwards", "MIN", 79, 27.6]
                ]
            }
        });

        let records = parse_payload(payload, Dataset::Players).unwrap();
        assert_eq!(records.len(), 2);
        let first = records.iter().next().unwrap();
        assert_eq!(first.get("TEAM"), Some(&json!("OKC")));
        assert_eq!(first.get("PTS"), Some(&json!(32.7)));
    }

    #[test]
    fn test_parse_standings_picks_named_table() {
        let payload = json!({
            "resultSets": [
                {"name": "Other", "headers": ["X"], "rowSet": [[1]]},
                {
                    "name": "Standings",
                    "headers": ["TeamID", "TeamCity", "TeamName", "Conference", "WINS", "LOSSES"],
                    "rowSet": [[1610612738, "Boston", "Celtics", "East", 61, 21]]
                }
            ]
        });

        let records = parse_payload(payload, Dataset::Teams).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records.iter().next().unwrap().get("TeamCity"), Some(&json!("Boston")));
    }

    #[test]
    fn test_parse_row_array() {
        let payload = json!([{"team": "BOS", "pts": 20.1}, "junk", {"team": "NYK"}]);
        let records = parse_payload(payload, Dataset::Players).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_parse_bare_result_set() {
        let payload = json!({"headers": ["PLAYER"], "rowSet": [["Jalen Brunson"]]});
        assert_eq!(parse_payload(payload, Dataset::Players).unwrap().len(), 1);
    }

    #[test]
    fn test_missing_result_set() {
        let err = parse_payload(json!({"message": "throttled"}), Dataset::Teams).unwrap_err();
        assert!(matches!(err, FetchError::MissingResultSet(_)));
        let err = parse_payload(json!(42), Dataset::Teams).unwrap_err();
        assert!(matches!(err, FetchError::MissingResultSet(_)));
    }
}
