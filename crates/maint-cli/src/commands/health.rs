//! Health CLI command

use anyhow::Result;
use colored::Colorize;
use tabled::Tabled;

use crate::client::{ApiClient, HealthStatus};
use crate::output::{color_loaded, color_status, print_json, print_table, OutputFormat};

/// Row for the artifact table
#[derive(Tabled)]
struct ArtifactRow {
    #[tabled(rename = "Domain")]
    domain: &'static str,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Explainer")]
    explainer: String,
}

fn artifact_rows(health: &HealthStatus) -> Vec<ArtifactRow> {
    vec![
        ArtifactRow {
            domain: "engine",
            model: color_loaded(health.engine_model_loaded),
            explainer: color_loaded(health.engine_explainer_loaded),
        },
        ArtifactRow {
            domain: "naval",
            model: color_loaded(health.naval_model_loaded),
            explainer: color_loaded(health.naval_explainer_loaded),
        },
    ]
}

/// Show service health
pub async fn show_health(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let health: HealthStatus = client.get("health").await?;

    match format {
        OutputFormat::Json => print_json(&health)?,
        OutputFormat::Table => {
            println!("{} {}", "Status:".bold(), color_status(&health.status));
            println!();
            print_table(&artifact_rows(&health));
        }
    }

    Ok(())
}
