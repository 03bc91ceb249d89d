mod report;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::fs::{self, OpenOptions};

use playerdna_core::{
    config::{self, AppConfig},
    source::{ChainedSource, FallbackAchievementSource, PlayerSource, SteamAchievementSource},
    AchievementCurator, GameRef, PlayerSession,
};
use tracing_subscriber::{prelude::*, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "playerdna", about = "Player DNA achievement curation")]
struct Cli {
    /// Steam id to inspect; defaults to the configured profile.
    #[arg(long, global = true, env = "PLAYERDNA_STEAM_ID")]
    steam_id: Option<String>,

    /// Emit JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Rarity-diverse showcase across the most completed games.
    Notable {
        /// Number of achievements to show.
        #[arg(long)]
        count: Option<usize>,
    },
    /// Achievements for one game.
    Game {
        /// Steam app id.
        app_id: String,
        /// Display name, used to pick a fallback template.
        #[arg(long)]
        name: Option<String>,
    },
    /// Player stats and PCSR profile.
    Profile,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;
    let cli = Cli::parse();

    config::ensure_default_config()?;
    let config = AppConfig::load()?;
    let steam_id = cli.steam_id.clone().unwrap_or_else(|| config.steam_id.clone());

    let players = PlayerSource::new(&config)?;
    let achievements = ChainedSource::new(
        SteamAchievementSource::new(&config, &steam_id)?,
        FallbackAchievementSource::new(players.fallback().clone(), &steam_id),
    );
    let session = PlayerSession::with_optional_seed(&steam_id, config.jitter_seed);

    match cli.command {
        Command::Notable { count } => {
            let curator = AchievementCurator::new(
                count.unwrap_or(config.notable_count),
                config.game_limit,
            );
            let games = players.owned_games(&steam_id)?;
            if games.is_empty() {
                tracing::warn!("no game library snapshot for {steam_id}");
            }
            let notable = curator.collect_notable(&session, &achievements, &games).await;
            report::achievements(&notable, cli.json)
        }
        Command::Game { app_id, name } => {
            let game = players
                .owned_games(&steam_id)?
                .into_iter()
                .find(|game| game.app_id.as_deref() == Some(app_id.as_str()))
                .map(|game| game.to_ref())
                .unwrap_or_else(|| GameRef {
                    id: format!("game-{app_id}"),
                    name: name.clone().unwrap_or_else(|| format!("App {app_id}")),
                    app_id: Some(app_id.clone()),
                });
            let curator = AchievementCurator::new(config.notable_count, config.game_limit);
            let list = curator
                .fetch_achievements_for_game(&session, &achievements, &game)
                .await;
            report::achievements(&list, cli.json)
        }
        Command::Profile => {
            let stats = players.player_stats(&steam_id).await?;
            let profile = players.pcsr_profile();
            report::profile(&stats, &profile, cli.json)
        }
    }
}

fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("playerdna.log");

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .compact()
        .with_ansi(false)
        .with_writer(move || {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
                .expect("failed to open log file")
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(())
}
