//! # Command Line Interface
//!
//! Terminal dashboard over the stats engine.

use crate::dashboard::{DataStatus, Dashboard, Snapshot};
use crate::render;
use anyhow::Result;
use clap::{Parser, Subcommand};
use stats_engine::{PlayerBoard, PlayerStat, TeamBoard};
use std::path::PathBuf;

/// NBA season rankings, projections and playoff outlook
#[derive(Parser, Debug)]
#[command(name = "nba-stats")]
#[command(about = "NBA season rankings, projections and playoff outlook")]
pub struct Cli {
    /// TOML configuration file (missing file means defaults)
    #[arg(short, long, default_value = "nba-stats.toml")]
    pub config: PathBuf,

    /// Season to request, e.g. 2025-26
    #[arg(short, long)]
    pub season: Option<String>,

    /// Number of players in the main ranking
    #[arg(long)]
    pub top: Option<usize>,

    /// Minimum games played to be ranked
    #[arg(long)]
    pub min_games: Option<u32>,

    /// Read player rows from a saved JSON payload instead of the API
    #[arg(long)]
    pub players_file: Option<PathBuf>,

    /// Read standings rows from a saved JSON payload instead of the API
    #[arg(long)]
    pub teams_file: Option<PathBuf>,

    /// View to print
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Efficiency ranking with MVP scores
    Players,
    /// Per-stat leaders, or a single stat's leaders
    Leaders {
        /// Stat to rank by, e.g. pts, reb, fg3_pct
        #[arg(long)]
        stat: Option<String>,
    },
    /// Projected season totals and milestone pace
    Projections,
    /// League standings and the conference split
    Standings,
    /// Projected records and playoff probability
    Playoffs,
    /// Everything above
    All,
}

impl Cli {
    /// Whether both datasets come from local files
    pub fn uses_files(&self) -> bool {
        self.players_file.is_some() || self.teams_file.is_some()
    }
}

/// CLI handler
pub struct CliHandler {
    dashboard: Dashboard,
}

impl CliHandler {
    pub fn new(dashboard: Dashboard) -> Self {
        Self { dashboard }
    }

    /// Handle CLI commands
    pub async fn handle_command(&self, command: Commands) -> Result<()> {
        println!("🏀 NBA Season Analyzer ({})", self.dashboard.source_description());
        println!("{}", render::rule());

        match command {
            Commands::Players => self.show_players().await,
            Commands::Leaders { stat } => self.show_leaders(stat.as_deref()).await?,
            Commands::Projections => self.show_projections().await,
            Commands::Standings => self.show_standings().await,
            Commands::Playoffs => self.show_playoffs().await,
            Commands::All => {
                self.show_players().await;
                self.show_leaders(None).await?;
                self.show_projections().await;
                self.show_standings().await;
                self.show_playoffs().await;
            }
        }
        Ok(())
    }

    async fn players(&self) -> Option<PlayerBoard> {
        usable(self.dashboard.player_board().await)
    }

    async fn teams(&self) -> Option<TeamBoard> {
        usable(self.dashboard.team_board().await)
    }

    async fn show_players(&self) {
        let Some(board) = self.players().await else { return };

        println!("📊 Player Rankings ({} players analyzed)", board.players_analyzed);
        let headline = [
            ("Top Scorer (PPG)", &board.top_scorer, PlayerStat::Points),
            ("Top Rebounder (RPG)", &board.top_rebounder, PlayerStat::Rebounds),
            ("Top Playmaker (APG)", &board.top_playmaker, PlayerStat::Assists),
        ];
        for (label, leader, stat) in headline {
            if let Some(player) = leader {
                let value = stat.value(player).unwrap_or(0.0);
                println!("  {label}: {} {value:.1}", player.identity().full_name());
            }
        }
        println!();
        println!("{}", render::player_rankings(&board.rankings));
    }

    async fn show_leaders(&self, stat: Option<&str>) -> Result<()> {
        let requested = stat.map(str::parse::<PlayerStat>).transpose()?;
        let Some(board) = self.players().await else { return Ok(()) };
        let config = self.dashboard.engine_config();

        match requested {
            Some(stat) => {
                let leaders = board.top_by_stat(
                    stat,
                    config.ranking.top_stat_players,
                    config.ranking.min_games_played,
                );
                println!("{}", leader_table(stat, &leaders));
            }
            None => {
                for leaders in &board.stat_leaders {
                    println!("{}", leader_table(leaders.stat, &leaders.players));
                }
                let title = format!(
                    "🎯 3P% Leaders (min {:.1} 3PA per game)",
                    config.ranking.min_three_point_attempts
                );
                println!(
                    "{}",
                    render::stat_leaders(&title, &board.three_point_leaders, |p| {
                        p.stats.fg3_pct.map_or_else(|| "-".into(), |v| format!("{:.1}", v * 100.0))
                    })
                );
            }
        }
        Ok(())
    }

    async fn show_projections(&self) {
        let Some(board) = self.players().await else { return };
        let games = self.dashboard.engine_config().season.total_season_games;
        println!("📈 Season Projections ({games} games)");
        println!("{}", render::player_projections(&board.rankings));
    }

    async fn show_standings(&self) {
        let Some(board) = self.teams().await else { return };
        println!("🏆 League Standings");
        println!("{}", render::standings(&board.standings, |t| t.derived.overall_rank));
        println!("Eastern Conference");
        println!("{}", render::standings(&board.east, |t| t.derived.conf_rank));
        println!("Western Conference");
        println!("{}", render::standings(&board.west, |t| t.derived.conf_rank));
    }

    async fn show_playoffs(&self) {
        let Some(board) = self.teams().await else { return };
        let spots = self.dashboard.engine_config().playoffs.spots_per_conference;
        println!("🎟️ Playoff Outlook ({spots} spots per conference)");
        println!("{}", render::playoff_outlook(&board.playoff_outlook));
    }
}

fn leader_table(stat: PlayerStat, players: &[stats_engine::PlayerRecord]) -> String {
    let title = format!("⭐ {} Leaders", stat.field_name().to_uppercase());
    render::stat_leaders(&title, players, |p| {
        stat.value(p).map_or_else(|| "-".into(), |v| format!("{v:.1}"))
    })
}

/// Print the data status and hand back the board only when there is data
fn usable<B>(snapshot: Snapshot<B>) -> Option<B> {
    match snapshot.status {
        DataStatus::Available { season, fetched_at } => {
            println!("Season {season}, fetched {}", fetched_at.format("%Y-%m-%d %H:%M:%S UTC"));
            Some(snapshot.board)
        }
        DataStatus::Unavailable { reason } => {
            println!("❌ Data unavailable: {reason}");
            println!("This could be due to API rate limits or network issues. Try again shortly.");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_overrides_and_command() {
        let cli = Cli::parse_from([
            "nba-stats",
            "--season",
            "2024-25",
            "--top",
            "25",
            "--min-games",
            "10",
            "leaders",
            "--stat",
            "reb",
        ]);
        assert_eq!(cli.season.as_deref(), Some("2024-25"));
        assert_eq!(cli.top, Some(25));
        assert_eq!(cli.min_games, Some(10));
        assert_eq!(cli.command, Some(Commands::Leaders { stat: Some("reb".to_string()) }));
        assert!(!cli.uses_files());
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["nba-stats", "--players-file", "players.json"]);
        assert_eq!(cli.config, PathBuf::from("nba-stats.toml"));
        assert!(cli.command.is_none());
        assert!(cli.uses_files());
    }
}
