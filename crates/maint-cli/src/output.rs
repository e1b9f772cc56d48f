//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print a table from a list of items
pub fn print_table<T: Tabled>(items: &[T]) {
    if items.is_empty() {
        println!("{}", "No items found".yellow());
        return;
    }
    let table = Table::new(items).with(Style::rounded()).to_string();
    println!("{}", table);
}

/// Print any response as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Format probability as percentage
pub fn format_probability(probability: f64) -> String {
    format!("{:.1}%", probability * 100.0)
}

/// Signed contribution with fixed precision
pub fn format_contribution(value: f64) -> String {
    format!("{:+.4}", value)
}

/// Color a loaded flag
pub fn color_loaded(loaded: bool) -> String {
    if loaded {
        "loaded".green().to_string()
    } else {
        "missing".red().to_string()
    }
}

/// Color status based on value
pub fn color_status(status: &str) -> String {
    match status.to_lowercase().as_str() {
        "healthy" | "normal" => status.green().to_string(),
        "degraded" | "minor fault" => status.yellow().to_string(),
        "critical fault" => status.red().to_string(),
        _ => status.to_string(),
    }
}

/// Color a contribution by sign: positive pushes the prediction up
pub fn color_contribution(value: f64) -> String {
    let formatted = format_contribution(value);
    if value > 0.0 {
        formatted.red().to_string()
    } else if value < 0.0 {
        formatted.green().to_string()
    } else {
        formatted.dimmed().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_probability() {
        assert_eq!(format_probability(0.5), "50.0%");
        assert_eq!(format_probability(0.0123), "1.2%");
    }

    #[test]
    fn test_format_contribution() {
        assert_eq!(format_contribution(0.25), "+0.2500");
        assert_eq!(format_contribution(-0.000049), "-0.0000");
    }
}
