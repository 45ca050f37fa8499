//! Scenario runner for Trellis
//!
//! Replays a TOML scenario against the in-memory store and prints the
//! outcome of every action plus the final notification inboxes as JSON.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use trellis_core::{SocialEffects, TrellisConfig};
use trellis_effects::CompositeEffects;
use trellis_social::{SocialConfig, SocialEngine};
use trellis_cli::{run, Report, Scenario};

/// Clock origin for seeded runs: 2024-01-01T00:00:00Z
const SIMULATED_START_MS: u64 = 1_704_067_200_000;
const SIMULATED_STEP_MS: u64 = 1_000;

#[derive(Parser)]
#[command(name = "trellis")]
#[command(about = "Trellis - engagement and social-graph engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario file against a fresh in-memory store
    Run {
        /// Scenario TOML file
        scenario: PathBuf,
    },
}

async fn replay<E>(effects: E, config: SocialConfig, scenario: &Scenario) -> Result<Report>
where
    E: SocialEffects + 'static,
{
    let engine = SocialEngine::new(Arc::new(effects), config);
    run(&engine, scenario).await
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = SocialConfig::load(cli.config.as_deref()).context("failed to load config")?;
    let log_level = if cli.verbose {
        "debug"
    } else {
        config.log_level.as_str()
    };
    trellis_effects::logging::init_tracing(log_level)?;

    match cli.command {
        Commands::Run { scenario } => {
            let parsed = Scenario::load(&scenario)?;
            tracing::info!(
                scenario = %scenario.display(),
                users = parsed.users.len(),
                posts = parsed.posts.len(),
                actions = parsed.actions.len(),
                "running scenario"
            );

            let report = match parsed.seed {
                Some(seed) => {
                    let effects =
                        CompositeEffects::simulated(seed, SIMULATED_START_MS, SIMULATED_STEP_MS);
                    replay(effects, config, &parsed).await?
                }
                None => replay(CompositeEffects::production(), config, &parsed).await?,
            };

            println!("{}", serde_json::to_string_pretty(&report)?);
            if report.failures() > 0 {
                tracing::info!(failures = report.failures(), "scenario finished with failed actions");
            }
        }
    }

    Ok(())
}
