use anyhow::Result;
use buffer::BufferClient;
use clap::{Parser, Subcommand};
use common::Config;
use orchestrator::{DailyRun, RunOutcome};
use std::env;
use tracing::{warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Schedules the day's curated posts. Meant to be triggered once a day.
#[derive(Parser)]
#[command(name = "orchestrator", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the Buffer profiles connected to the access token and exit
    Streams,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load environment variables
    let _ = dotenv::dotenv();

    let level = env::var("CURATOR_LOG_LEVEL")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::from_env()?;

    match cli.command {
        Some(Command::Streams) => {
            let profiles = BufferClient::new(&config.buffer).list_profiles().await?;
            for profile in profiles {
                println!("{}\t{}", profile.service, profile.id);
            }
        }
        None => {
            let run = DailyRun::from_config(&config)?;
            if let RunOutcome::Completed(report) = run.run().await? {
                if !report.failed.is_empty() {
                    warn!("{} posts could not be scheduled", report.failed.len());
                }
            }
        }
    }

    Ok(())
}
