mod ingest;
mod output;
mod score;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "brandex")]
#[command(about = "Brand Experience Score pipeline for competitive social data")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Score a post export and write aggregate tables
    Score(score::ScoreArgs),
    /// Validate a brand roster file and list its canonical brands
    Roster {
        /// Path to the roster YAML
        path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Score(args) => score::run_score(&args),
        Commands::Roster { path } => {
            let roster = brandex_core::load_roster(&path)?;
            println!("{} brands in roster:", roster.len());
            for name in roster.names() {
                println!("  {name}");
            }
            Ok(())
        }
    }
}
