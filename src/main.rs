//! Nimbus
//!
//! Offline insights report from an observations file (JSON array or CSV).
//!
//! ```text
//! nimbus report observations.json --city Recife
//! nimbus report observations.csv --now 2024-06-10T12:00:00Z --no-narrative
//! ```

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use nimbus::config::Config;
use nimbus::insights::{FixedClock, InsightEngine, SystemClock};
use nimbus::storage::{import_file, InMemoryStore};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "nimbus")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Weather insights from periodic observations")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the insights report for an observations file as JSON
    Report {
        /// Observations file (.json or .csv)
        file: PathBuf,
        /// Restrict the report to one city (exact match)
        #[arg(short, long)]
        city: Option<String>,
        /// Anchor the seven-day window at this RFC 3339 instant instead of now
        #[arg(long)]
        now: Option<String>,
        /// Skip the AI summary even when a provider is configured
        #[arg(long)]
        no_narrative: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::load_default();
    nimbus::logging::init(&config.logging);

    match cli.command {
        Commands::Report {
            file,
            city,
            now,
            no_narrative,
        } => {
            let imported = import_file(&file)?;

            tracing::info!(
                file = ?file,
                rows = imported.rows_processed,
                failed = imported.rows_failed,
                "Observations loaded"
            );
            for error in imported.errors.iter().take(10) {
                tracing::warn!("{}", error);
            }

            let store = Arc::new(InMemoryStore::with_observations(imported.observations));
            let mut engine = InsightEngine::new(store);

            engine = match now.as_deref() {
                Some(instant) => {
                    let anchor = DateTime::parse_from_rfc3339(instant)
                        .map_err(|e| format!("Invalid --now '{}': {}", instant, e))?
                        .with_timezone(&Utc);
                    engine.with_clock(Arc::new(FixedClock(anchor)))
                }
                None => engine.with_clock(Arc::new(SystemClock)),
            };

            if !no_narrative {
                if let Some(narrator) = config.narrative.adapter()? {
                    tracing::info!(model = %config.narrative.model, "Narrative augmentation enabled");
                    engine = engine.with_narrator(narrator);
                }
            }

            let outcome = engine.generate_insights(city.as_deref()).await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
    }

    Ok(())
}
