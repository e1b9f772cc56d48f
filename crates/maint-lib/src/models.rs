//! Core data models for the maintenance service

use serde::{Deserialize, Serialize};
use std::fmt;

/// Independent prediction context with its own schema, model and explainer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    /// Gas turbine fault classification
    Engine,
    /// Naval propulsion decay regression
    Naval,
}

impl Domain {
    pub const ALL: [Domain; 2] = [Domain::Engine, Domain::Naval];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Engine => "engine",
            Domain::Naval => "naval",
        }
    }

    /// Capitalized name used in client-facing messages
    pub fn display_name(&self) -> &'static str {
        match self {
            Domain::Engine => "Engine",
            Domain::Naval => "Naval",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Engine sensor reading, one per request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineReading {
    #[serde(rename = "Lever_position")]
    pub lever_position: f64,
    #[serde(rename = "Ship_speed")]
    pub ship_speed: f64,
    #[serde(rename = "Gas_Turbine_shaft_torque")]
    pub gt_shaft_torque: f64,
    #[serde(rename = "Gas_Turbine_rate_of_revolutions")]
    pub gt_rpm: f64,
    #[serde(rename = "Gas_Generator_rate_of_revolutions")]
    pub gg_rpm: f64,
    #[serde(rename = "Starboard_Propeller_Torque")]
    pub starboard_propeller_torque: f64,
    #[serde(rename = "Port_Propeller_Torque")]
    pub port_propeller_torque: f64,
    #[serde(rename = "HP_Turbine_exit_temperature")]
    pub hp_turbine_exit_temperature: f64,
    #[serde(rename = "GT_Compressor_inlet_air_temperature")]
    pub compressor_inlet_air_temperature: f64,
    #[serde(rename = "GT_Compressor_outlet_air_temperature")]
    pub compressor_outlet_air_temperature: f64,
    #[serde(rename = "HP_Turbine_exit_pressure")]
    pub hp_turbine_exit_pressure: f64,
}

/// Naval propulsion sensor reading, one per request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavalReading {
    #[serde(rename = "Lever_position")]
    pub lever_position: f64,
    #[serde(rename = "Ship_speed_knots")]
    pub ship_speed_knots: f64,
    #[serde(rename = "Gas_Turbine_shaft_torque_kN_m")]
    pub gt_shaft_torque_kn_m: f64,
    #[serde(rename = "Gas_Turbine_rate_of_revolutions_rpm")]
    pub gt_rpm: f64,
    #[serde(rename = "Gas_Generator_rate_of_revolutions_rpm")]
    pub gg_rpm: f64,
    #[serde(rename = "Starboard_Propeller_Torque_kN")]
    pub starboard_propeller_torque_kn: f64,
    #[serde(rename = "Port_Propeller_Torque_kN")]
    pub port_propeller_torque_kn: f64,
    #[serde(rename = "HP_Turbine_exit_temperature_C")]
    pub hp_turbine_exit_temperature_c: f64,
    #[serde(rename = "GT_Compressor_inlet_air_temperature_C")]
    pub compressor_inlet_air_temperature_c: f64,
    #[serde(rename = "GT_Compressor_outlet_air_temperature_C")]
    pub compressor_outlet_air_temperature_c: f64,
    #[serde(rename = "HP_Turbine_exit_pressure_psi")]
    pub hp_turbine_exit_pressure_psi: f64,
    #[serde(rename = "GT_Compressor_inlet_air_pressure_psi")]
    pub compressor_inlet_air_pressure_psi: f64,
    #[serde(rename = "GT_Compressor_outlet_air_pressure_bar")]
    pub compressor_outlet_air_pressure_bar: f64,
    #[serde(rename = "Gas_Turbine_exhaust_gas_pressure_psi")]
    pub gt_exhaust_gas_pressure_psi: f64,
    // Column name carries the training dataset's spelling
    #[serde(rename = "Turbine_Injecton_Control")]
    pub turbine_injection_control: f64,
    #[serde(rename = "Fuel_flow_lg_s")]
    pub fuel_flow_kg_s: f64,
}

/// Engine condition predicted by the fault classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultClass {
    Normal = 0,
    MinorFault = 1,
    CriticalFault = 2,
}

impl FaultClass {
    pub const COUNT: usize = 3;

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(FaultClass::Normal),
            1 => Some(FaultClass::MinorFault),
            2 => Some(FaultClass::CriticalFault),
            _ => None,
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Human readable condition name
    pub fn name(&self) -> &'static str {
        match self {
            FaultClass::Normal => "Normal",
            FaultClass::MinorFault => "Minor Fault",
            FaultClass::CriticalFault => "Critical Fault",
        }
    }
}

/// Decay coefficients predicted by the naval regressor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecayTargets {
    pub compressor_decay: f64,
    pub turbine_decay: f64,
}

impl DecayTargets {
    /// Output names in model output order
    pub const NAMES: [&'static str; 2] = ["compressor_decay", "turbine_decay"];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_class_table() {
        assert_eq!(FaultClass::from_index(0).map(|c| c.name()), Some("Normal"));
        assert_eq!(FaultClass::from_index(1).map(|c| c.name()), Some("Minor Fault"));
        assert_eq!(FaultClass::from_index(2).map(|c| c.name()), Some("Critical Fault"));
        assert!(FaultClass::from_index(3).is_none());
        assert_eq!(FaultClass::CriticalFault.index(), 2);
    }

    #[test]
    fn test_naval_reading_ignores_unknown_fields() {
        let payload = serde_json::json!({
            "Lever_position": 0.5,
            "Ship_speed_knots": 10,
            "Gas_Turbine_shaft_torque_kN_m": 100,
            "Gas_Turbine_rate_of_revolutions_rpm": 100,
            "Gas_Generator_rate_of_revolutions_rpm": 100,
            "Starboard_Propeller_Torque_kN": 100,
            "Port_Propeller_Torque_kN": 100,
            "HP_Turbine_exit_temperature_C": 100,
            "GT_Compressor_inlet_air_temperature_C": 100,
            "GT_Compressor_outlet_air_temperature_C": 100,
            "HP_Turbine_exit_pressure_psi": 100,
            "GT_Compressor_inlet_air_pressure_psi": 100,
            "GT_Compressor_outlet_air_pressure_bar": 100,
            "Gas_Turbine_exhaust_gas_pressure_psi": 100,
            "Turbine_Injecton_Control": 1,
            "Fuel_flow_lg_s": 1,
            "GT_Compressor_decay_state_coefficient": 1,
        });
        let reading: NavalReading = serde_json::from_value(payload).unwrap();
        assert_eq!(reading.turbine_injection_control, 1.0);
    }

    #[test]
    fn test_engine_reading_rejects_missing_field() {
        let payload = serde_json::json!({ "Lever_position": 0.5 });
        assert!(serde_json::from_value::<EngineReading>(payload).is_err());
    }
}
