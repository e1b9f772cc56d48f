//! Prediction CLI commands

use anyhow::{Context, Result};
use clap::ValueEnum;
use colored::Colorize;
use maint_lib::models::{EngineReading, NavalReading};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::Path;
use tabled::Tabled;

use crate::client::{ApiClient, EnginePrediction, NavalPrediction};
use crate::output::{
    color_contribution, color_status, format_probability, print_json, print_table, OutputFormat,
};

/// Built-in engine readings
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EnginePreset {
    /// Steady cruise at mid lever
    Cruise,
    /// High lever with hot, pressurized turbine exit
    Surge,
}

/// Built-in naval readings
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NavalPreset {
    /// Freshly serviced plant
    Drydock,
    /// Worn plant under trial load
    SeaTrial,
}

impl EnginePreset {
    pub fn reading(&self) -> EngineReading {
        match self {
            EnginePreset::Cruise => EngineReading {
                lever_position: 0.51,
                ship_speed: 15.4,
                gt_shaft_torque: 510.0,
                gt_rpm: 3500.0,
                gg_rpm: 7900.0,
                starboard_propeller_torque: 455.0,
                port_propeller_torque: 447.0,
                hp_turbine_exit_temperature: 850.0,
                compressor_inlet_air_temperature: 295.0,
                compressor_outlet_air_temperature: 450.0,
                hp_turbine_exit_pressure: 15.5,
            },
            EnginePreset::Surge => EngineReading {
                lever_position: 0.78,
                ship_speed: 9.4,
                gt_shaft_torque: 690.0,
                gt_rpm: 4020.0,
                gg_rpm: 8800.0,
                starboard_propeller_torque: 520.0,
                port_propeller_torque: 515.0,
                hp_turbine_exit_temperature: 910.0,
                compressor_inlet_air_temperature: 302.0,
                compressor_outlet_air_temperature: 480.0,
                hp_turbine_exit_pressure: 18.2,
            },
        }
    }
}

impl NavalPreset {
    pub fn reading(&self) -> NavalReading {
        match self {
            NavalPreset::Drydock => NavalReading {
                lever_position: 0.52,
                ship_speed_knots: 14.8,
                gt_shaft_torque_kn_m: 490.0,
                gt_rpm: 3600.0,
                gg_rpm: 8100.0,
                starboard_propeller_torque_kn: 460.0,
                port_propeller_torque_kn: 458.0,
                hp_turbine_exit_temperature_c: 840.0,
                compressor_inlet_air_temperature_c: 294.0,
                compressor_outlet_air_temperature_c: 452.0,
                hp_turbine_exit_pressure_psi: 16.0,
                compressor_inlet_air_pressure_psi: 14.5,
                compressor_outlet_air_pressure_bar: 17.5,
                gt_exhaust_gas_pressure_psi: 15.8,
                turbine_injection_control: 1.6,
                fuel_flow_kg_s: 0.78,
            },
            NavalPreset::SeaTrial => NavalReading {
                lever_position: 0.81,
                ship_speed_knots: 21.0,
                gt_shaft_torque_kn_m: 720.0,
                gt_rpm: 4150.0,
                gg_rpm: 9050.0,
                starboard_propeller_torque_kn: 590.0,
                port_propeller_torque_kn: 588.0,
                hp_turbine_exit_temperature_c: 935.0,
                compressor_inlet_air_temperature_c: 298.0,
                compressor_outlet_air_temperature_c: 488.0,
                hp_turbine_exit_pressure_psi: 19.1,
                compressor_inlet_air_pressure_psi: 14.5,
                compressor_outlet_air_pressure_bar: 21.3,
                gt_exhaust_gas_pressure_psi: 16.4,
                turbine_injection_control: 2.3,
                fuel_flow_kg_s: 1.15,
            },
        }
    }
}

/// Row for the feature contribution table
#[derive(Tabled)]
struct ContributionRow {
    #[tabled(rename = "Feature")]
    feature: String,
    #[tabled(rename = "Contribution")]
    contribution: String,
}

/// Row for the class probability table
#[derive(Tabled)]
struct ProbabilityRow {
    #[tabled(rename = "Condition")]
    condition: &'static str,
    #[tabled(rename = "Probability")]
    probability: String,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid reading in {}", path.display()))
}

/// Reading from `--input`, or the chosen preset
pub fn engine_reading(input: Option<&Path>, preset: Option<EnginePreset>) -> Result<EngineReading> {
    match (input, preset) {
        (Some(path), _) => read_json(path),
        (None, Some(preset)) => Ok(preset.reading()),
        (None, None) => anyhow::bail!("Either --input or --preset is required"),
    }
}

/// Reading from `--input`, or the chosen preset
pub fn naval_reading(input: Option<&Path>, preset: Option<NavalPreset>) -> Result<NavalReading> {
    match (input, preset) {
        (Some(path), _) => read_json(path),
        (None, Some(preset)) => Ok(preset.reading()),
        (None, None) => anyhow::bail!("Either --input or --preset is required"),
    }
}

/// Largest contributions first, by magnitude
pub fn top_features(importance: &BTreeMap<String, f64>, top: usize) -> Vec<(String, f64)> {
    let mut ranked: Vec<(String, f64)> = importance
        .iter()
        .map(|(name, value)| (name.clone(), *value))
        .collect();
    ranked.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(top);
    ranked
}

fn contribution_rows(importance: &BTreeMap<String, f64>, top: usize) -> Vec<ContributionRow> {
    top_features(importance, top)
        .into_iter()
        .map(|(feature, value)| ContributionRow {
            feature,
            contribution: color_contribution(value),
        })
        .collect()
}

/// Request an engine condition prediction
pub async fn predict_engine(
    client: &ApiClient,
    reading: &EngineReading,
    top: usize,
    format: OutputFormat,
) -> Result<()> {
    let result: EnginePrediction = client.post("predict/engine", reading).await?;

    match format {
        OutputFormat::Json => print_json(&result)?,
        OutputFormat::Table => {
            println!("{}", "Engine Condition".bold());
            println!("{}", "=".repeat(50));
            println!(
                "Prediction:             {} ({})",
                color_status(&result.condition),
                result.prediction
            );
            println!();

            let probabilities = vec![
                ProbabilityRow {
                    condition: "Normal",
                    probability: format_probability(result.probabilities.normal),
                },
                ProbabilityRow {
                    condition: "Minor Fault",
                    probability: format_probability(result.probabilities.minor_fault),
                },
                ProbabilityRow {
                    condition: "Critical Fault",
                    probability: format_probability(result.probabilities.critical_fault),
                },
            ];
            print_table(&probabilities);
            println!();

            println!("{}", "Top Contributing Features".bold());
            print_table(&contribution_rows(&result.feature_importance, top));
        }
    }

    Ok(())
}

/// Request naval decay estimates
pub async fn predict_naval(
    client: &ApiClient,
    reading: &NavalReading,
    top: usize,
    format: OutputFormat,
) -> Result<()> {
    let result: NavalPrediction = client.post("predict/naval", reading).await?;

    match format {
        OutputFormat::Json => print_json(&result)?,
        OutputFormat::Table => {
            println!("{}", "Naval Propulsion Decay".bold());
            println!("{}", "=".repeat(50));
            println!(
                "Compressor decay:       {}",
                format!("{:.4}", result.predictions.compressor_decay).cyan()
            );
            println!(
                "Turbine decay:          {}",
                format!("{:.4}", result.predictions.turbine_decay).cyan()
            );
            println!();

            println!("{}", "Top Features (compressor)".bold());
            print_table(&contribution_rows(&result.feature_importance.compressor, top));
            println!();

            println!("{}", "Top Features (turbine)".bold());
            print_table(&contribution_rows(&result.feature_importance.turbine, top));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_top_features_by_magnitude() {
        let importance: BTreeMap<String, f64> = [
            ("Ship_speed", 0.1),
            ("Lever_position", -0.4),
            ("HP_Turbine_exit_pressure", 0.3),
            ("Port_Propeller_Torque", 0.0),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let top = top_features(&importance, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].0, "Lever_position");
        assert_eq!(top[1].0, "HP_Turbine_exit_pressure");
    }

    #[test]
    fn test_top_features_larger_than_map() {
        let importance: BTreeMap<String, f64> = [("Ship_speed".to_string(), 0.2)].into_iter().collect();
        assert_eq!(top_features(&importance, 5).len(), 1);
        assert!(top_features(&importance, 0).is_empty());
    }

    #[test]
    fn test_preset_reading() {
        let reading = engine_reading(None, Some(EnginePreset::Surge)).unwrap();
        assert_eq!(reading.hp_turbine_exit_temperature, 910.0);
        assert!(engine_reading(None, None).is_err());
    }

    #[test]
    fn test_input_file_reading() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reading.json");
        let body = serde_json::to_string(&NavalPreset::SeaTrial.reading()).unwrap();
        std::fs::write(&path, body).unwrap();

        let reading = naval_reading(Some(&path), None).unwrap();
        assert_eq!(reading, NavalPreset::SeaTrial.reading());
    }

    #[test]
    fn test_input_file_missing_field() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reading.json");
        std::fs::write(&path, r#"{"Lever_position": 0.5}"#).unwrap();

        let err = engine_reading(Some(&path), None).unwrap_err();
        assert!(format!("{:#}", err).contains("Ship_speed"));
    }
}
