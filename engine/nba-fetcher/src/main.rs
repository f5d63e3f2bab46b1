use anyhow::{Context, Result};
use clap::Parser;
use nba_fetcher::cli::{Cli, CliHandler, Commands};
use nba_fetcher::logging::initialize_logging;
use nba_fetcher::{Dashboard, FetcherConfig, FileSource, NbaStatsFetcher, StatsSource};
use stats_engine::EngineConfig;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    initialize_logging("info")?;

    let cli = Cli::parse();

    let mut engine = EngineConfig::load(&cli.config)
        .with_context(|| format!("loading engine settings from {}", cli.config.display()))?;
    let mut fetcher = FetcherConfig::load(&cli.config)
        .with_context(|| format!("loading fetcher settings from {}", cli.config.display()))?;

    if let Some(top) = cli.top {
        engine.ranking.top_players = top;
    }
    if let Some(min_games) = cli.min_games {
        engine.ranking.min_games_played = min_games;
    }
    if let Some(season) = &cli.season {
        fetcher.seasons.current = season.clone();
    }
    engine.validate().context("invalid engine settings")?;

    let source: Box<dyn StatsSource> = if cli.uses_files() {
        Box::new(FileSource::new(
            cli.players_file.clone(),
            cli.teams_file.clone(),
            fetcher.seasons.current.clone(),
        ))
    } else {
        Box::new(NbaStatsFetcher::new(fetcher.clone()).context("building stats.nba.com client")?)
    };
    info!("Using {}", source.describe());

    let dashboard = Dashboard::new(source, engine, fetcher.cache.ttl());
    let handler = CliHandler::new(dashboard);
    handler.handle_command(cli.command.unwrap_or(Commands::All)).await
}
