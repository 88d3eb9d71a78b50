//! Nimbus CLI
//!
//! Command-line client for a running Nimbus API server:
//! - Import observation files
//! - Show insights and per-city stats
//! - Check status
//! - Generate a default config file

use clap::{Parser, Subcommand};
use nimbus::storage::import_file;
use serde_json::Value;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nimbus-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Client for the Nimbus weather insights API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL
    #[arg(long, default_value = "http://localhost:4000", global = true)]
    pub api_url: String,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Upload observations from a JSON or CSV file
    Import {
        /// Path to the observations file
        path: PathBuf,
        /// Parse and validate only
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the insights report for the last seven days
    Insights {
        /// City (exact match)
        #[arg(short, long)]
        city: Option<String>,
    },

    /// Show per-city aggregates
    Stats {
        /// City (exact match)
        #[arg(short, long)]
        city: Option<String>,
    },

    /// Show server status
    Status,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Import { path, dry_run } => {
            if !path.exists() {
                eprintln!("File not found: {:?}", path);
                std::process::exit(1);
            }

            let result = import_file(&path)?;

            println!("Import results:");
            println!("  Rows processed: {}", result.rows_processed);
            println!("  Rows failed: {}", result.rows_failed);
            println!("  Valid observations: {}", result.observations.len());

            if !result.errors.is_empty() {
                println!();
                println!("Errors (first 10):");
                for error in result.errors.iter().take(10) {
                    println!("  {}", error);
                }
            }

            if dry_run {
                println!();
                println!("(Dry run - no data was uploaded)");
            } else if !result.observations.is_empty() {
                println!();
                println!("Uploading...");

                let mut success = 0;
                let mut failed = 0;

                for observation in &result.observations {
                    match client
                        .post(format!("{}/api/v1/weather/logs", cli.api_url))
                        .json(observation)
                        .send()
                        .await
                    {
                        Ok(resp) if resp.status().is_success() => success += 1,
                        _ => failed += 1,
                    }
                }

                println!("  Uploaded: {}", success);
                if failed > 0 {
                    println!("  Failed: {}", failed);
                }
            }
        }

        Commands::Insights { city } => {
            let data = fetch_data(&client, &cli.api_url, "weather/insights", city.as_deref()).await?;

            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                print_insights(&data);
            }
        }

        Commands::Stats { city } => {
            let data = fetch_data(&client, &cli.api_url, "weather/stats", city.as_deref()).await?;

            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                print_stats(&data);
            }
        }

        Commands::Status => {
            let response = client
                .get(format!("{}/health", cli.api_url))
                .send()
                .await;

            match response {
                Ok(resp) if resp.status().is_success() => {
                    let health: Value = resp.json().await?;

                    println!("Nimbus v{}", env!("CARGO_PKG_VERSION"));
                    println!();
                    println!(
                        "API Status: {}",
                        health["status"].as_str().unwrap_or("unknown")
                    );
                    println!("Observations: {}", health["records"].as_u64().unwrap_or(0));
                    println!(
                        "AI summary: {}",
                        if health["narrative_enabled"].as_bool().unwrap_or(false) {
                            "enabled"
                        } else {
                            "disabled"
                        }
                    );

                    if let Some(uptime) = health["uptime_seconds"].as_u64() {
                        println!();
                        println!("Uptime: {}", format_duration(uptime));
                    }
                }
                Ok(resp) => {
                    eprintln!("API returned error: {}", resp.status());
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("Cannot connect to Nimbus API at {}", cli.api_url);
                    eprintln!("Error: {}", e);
                    eprintln!();
                    eprintln!("Make sure the Nimbus API server is running:");
                    eprintln!("  cargo run --bin nimbus-api");
                    std::process::exit(1);
                }
            }
        }

        Commands::Config { output } => {
            let config = nimbus::config::generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

/// GET an `/api/v1` endpoint and unwrap its `data` field
async fn fetch_data(
    client: &reqwest::Client,
    api_url: &str,
    endpoint: &str,
    city: Option<&str>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut request = client.get(format!("{}/api/v1/{}", api_url, endpoint));
    if let Some(city) = city {
        request = request.query(&[("city", city)]);
    }

    let response = request.send().await?;
    if !response.status().is_success() {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        eprintln!("Request failed ({}): {}", status, text);
        std::process::exit(1);
    }

    let mut body: Value = response.json().await?;
    Ok(body["data"].take())
}

fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else if seconds < 86400 {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    } else {
        format!("{}d {}h", seconds / 86400, (seconds % 86400) / 3600)
    }
}

fn print_insights(data: &Value) {
    if data.get("period").is_none() {
        println!("{}", data["message"].as_str().unwrap_or("No data"));
        return;
    }

    let period = &data["period"];
    println!(
        "Period: {} -> {} ({} records)",
        period["start"].as_str().unwrap_or("-"),
        period["end"].as_str().unwrap_or("-"),
        period["totalRecords"].as_u64().unwrap_or(0)
    );
    println!();

    println!("{:<12} {:>8} {:>8} {:>8}", "Metric", "Avg", "Min", "Max");
    println!("{}", "-".repeat(40));
    for (label, key) in [
        ("Temperature", "temperature"),
        ("Humidity", "humidity"),
        ("Wind speed", "windSpeed"),
    ] {
        let summary = &data["statistics"][key];
        println!(
            "{:<12} {:>8} {:>8} {:>8}",
            label,
            fmt_number(&summary["avg"]),
            fmt_number(&summary["min"]),
            fmt_number(&summary["max"])
        );
    }
    println!();

    println!(
        "Most common condition: {}",
        data["mostCommonCondition"].as_str().unwrap_or("-")
    );

    if let Some(insights) = data["insights"].as_array() {
        if !insights.is_empty() {
            println!();
            println!("Insights:");
            for insight in insights {
                println!("  - {}", insight.as_str().unwrap_or_default());
            }
        }
    }

    if let Some(summary) = data["aiSummary"].as_str() {
        println!();
        println!("AI summary: {}", summary);
    }
}

fn print_stats(data: &Value) {
    let rows = match data.as_array() {
        Some(r) if !r.is_empty() => r,
        _ => {
            println!("No data");
            return;
        }
    };

    println!(
        "{:<20} {:>8} {:>8} {:>8} {:>8} {:>8}",
        "City", "Records", "Avg °C", "Min °C", "Max °C", "Hum %"
    );
    println!("{}", "-".repeat(66));

    for row in rows {
        println!(
            "{:<20} {:>8} {:>8} {:>8} {:>8} {:>8}",
            row["city"].as_str().unwrap_or("-"),
            row["total_records"].as_u64().unwrap_or(0),
            fmt_number(&row["avg_temperature"]),
            fmt_number(&row["min_temperature"]),
            fmt_number(&row["max_temperature"]),
            fmt_number(&row["avg_humidity"])
        );
    }
}

fn fmt_number(value: &Value) -> String {
    value
        .as_f64()
        .map(|v| format!("{:.1}", v))
        .unwrap_or_else(|| "-".to_string())
}
