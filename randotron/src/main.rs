use anyhow::{Context as _, Result};
use clap::Parser;
use commonware_runtime::{tokio, Runner};
use std::path::PathBuf;
use tracing::info;
use treasure_hunt_randotron::{Config, Engine};

#[derive(Parser, Debug)]
#[command(author, version, about = "Randomly play treasure hunt with a set of bots.")]
struct Args {
    /// Path to the YAML config file
    #[arg(long)]
    config: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load from config file
    let config_file = std::fs::read_to_string(&args.config)
        .with_context(|| format!("could not read config file {}", args.config.display()))?;
    let config: Config =
        serde_yaml::from_str(&config_file).context("could not parse config file")?;
    let config = config.validate()?;

    // Setup logging
    if config.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_max_level(config.log_level)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_max_level(config.log_level)
            .init();
    }
    info!(
        players = config.players,
        rounds = config.rounds,
        seed = config.seed,
        "Starting randotron"
    );

    // Start runtime
    let executor = tokio::Runner::new(tokio::Config::default());
    let summary = executor.start(|_| async move { Engine::new(config).await?.run().await })?;
    info!(?summary, "Finished");
    Ok(())
}
