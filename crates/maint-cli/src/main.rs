//! Predictive Maintenance CLI
//!
//! A command-line tool for checking service health and requesting
//! explained predictions from the predictive maintenance API.

mod client;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{health, predict};
use std::path::PathBuf;

/// Predictive Maintenance CLI
#[derive(Parser)]
#[command(name = "pmctl")]
#[command(author, version, about = "CLI for the Predictive Maintenance API", long_about = None)]
pub struct Cli {
    /// API endpoint URL (can also be set via PMCTL_API_URL env var)
    #[arg(long, env = "PMCTL_API_URL")]
    pub api_url: Option<String>,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show which models and explainers the service has loaded
    Health,

    /// Request an explained prediction
    #[command(subcommand)]
    Predict(PredictCommands),
}

#[derive(Subcommand)]
pub enum PredictCommands {
    /// Classify gas turbine condition
    Engine {
        /// JSON file holding one engine reading
        #[arg(long, short, conflicts_with = "preset", required_unless_present = "preset")]
        input: Option<PathBuf>,

        /// Built-in reading
        #[arg(long, value_enum)]
        preset: Option<predict::EnginePreset>,

        /// Number of features to show
        #[arg(long, default_value_t = 5)]
        top: usize,
    },

    /// Estimate compressor and turbine decay
    Naval {
        /// JSON file holding one naval reading
        #[arg(long, short, conflicts_with = "preset", required_unless_present = "preset")]
        input: Option<PathBuf>,

        /// Built-in reading
        #[arg(long, value_enum)]
        preset: Option<predict::NavalPreset>,

        /// Number of features to show
        #[arg(long, default_value_t = 5)]
        top: usize,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        output::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let api_url = config::Config::load()?.resolve_api_url(cli.api_url);

    // Initialize client
    let client = client::ApiClient::new(&api_url)?;

    // Execute command
    match cli.command {
        Commands::Health => {
            health::show_health(&client, cli.format).await?;
        }
        Commands::Predict(predict_cmd) => match predict_cmd {
            PredictCommands::Engine { input, preset, top } => {
                let reading = predict::engine_reading(input.as_deref(), preset)?;
                predict::predict_engine(&client, &reading, top, cli.format).await?;
            }
            PredictCommands::Naval { input, preset, top } => {
                let reading = predict::naval_reading(input.as_deref(), preset)?;
                predict::predict_naval(&client, &reading, top, cli.format).await?;
            }
        },
    }

    Ok(())
}
