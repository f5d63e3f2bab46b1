//! Where raw payloads come from

use crate::error::{FetchError, Result};
use crate::fetcher::NbaStatsFetcher;
use crate::models::{parse_payload, Dataset, SeasonData};
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use tracing::info;

/// A provider of raw player and team payloads
#[async_trait]
pub trait StatsSource: Send + Sync {
    /// Fetch one dataset
    async fn fetch(&self, dataset: Dataset) -> Result<SeasonData>;

    /// Short label for logs and headers
    fn describe(&self) -> String;
}

#[async_trait]
impl StatsSource for NbaStatsFetcher {
    async fn fetch(&self, dataset: Dataset) -> Result<SeasonData> {
        self.fetch_with_fallback(dataset).await
    }

    fn describe(&self) -> String {
        format!("stats.nba.com ({})", self.config().seasons.current)
    }
}

/// Reads previously saved payloads from disk
#[derive(Debug, Clone)]
pub struct FileSource {
    pub players: Option<PathBuf>,
    pub teams: Option<PathBuf>,
    /// Season label attached to the loaded data
    pub season: String,
}

impl FileSource {
    pub fn new(
        players: Option<PathBuf>,
        teams: Option<PathBuf>,
        season: impl Into<String>,
    ) -> Self {
        Self { players, teams, season: season.into() }
    }

    fn path(&self, dataset: Dataset) -> Option<&PathBuf> {
        match dataset {
            Dataset::Players => self.players.as_ref(),
            Dataset::Teams => self.teams.as_ref(),
        }
    }
}

#[async_trait]
impl StatsSource for FileSource {
    async fn fetch(&self, dataset: Dataset) -> Result<SeasonData> {
        let path = self
            .path(dataset)
            .ok_or_else(|| FetchError::InvalidConfig(format!("no {dataset} file configured")))?;

        let contents = tokio::fs::read_to_string(path).await?;
        let payload: Value = serde_json::from_str(&contents)?;
        let records = parse_payload(payload, dataset)?;

        info!("Loaded {} {} rows from {}", records.len(), dataset, path.display());
        Ok(SeasonData::new(self.season.clone(), records))
    }

    fn describe(&self) -> String {
        format!("local files ({})", self.season)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_file_source_reads_saved_payload() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"resultSet": {{"name": "LeagueLeaders", "headers": ["PLAYER", "PTS"],
                "rowSet": [["Jayson Tatum", 26.8], ["Jaylen Brown", 22.2]]}}}}"#
        )
        .unwrap();

        let source = FileSource::new(Some(file.path().to_path_buf()), None, "2024-25");
        let data = source.fetch(Dataset::Players).await.unwrap();
        assert_eq!(data.season, "2024-25");
        assert_eq!(data.records.len(), 2);
    }

    #[tokio::test]
    async fn test_file_source_without_path() {
        let source = FileSource::new(None, None, "2024-25");
        let err = source.fetch(Dataset::Teams).await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn test_file_source_missing_file() {
        let source = FileSource::new(None, Some(PathBuf::from("/nonexistent/teams.json")), "x");
        assert!(matches!(source.fetch(Dataset::Teams).await, Err(FetchError::Io(_))));
    }

    #[tokio::test]
    async fn test_file_source_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let source = FileSource::new(None, Some(file.path().to_path_buf()), "2024-25");
        assert!(matches!(source.fetch(Dataset::Teams).await, Err(FetchError::Json(_))));
    }
}
