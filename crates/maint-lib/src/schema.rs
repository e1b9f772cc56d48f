//! Training-time column order for each domain
//!
//! Every model and explainer artifact is fit on vectors laid out in exactly
//! this order. The codec, the artifact validation and the attribution
//! labelling all read the same static tables, so they cannot drift apart.

use crate::models::{Domain, EngineReading, NavalReading};

/// One column of a feature schema
pub struct FieldDescriptor<R> {
    pub position: usize,
    pub name: &'static str,
    read: fn(&R) -> f64,
}

impl<R> FieldDescriptor<R> {
    const fn new(position: usize, name: &'static str, read: fn(&R) -> f64) -> Self {
        Self {
            position,
            name,
            read,
        }
    }

    /// Read this column's value out of a reading
    pub fn read(&self, reading: &R) -> f64 {
        (self.read)(reading)
    }
}

/// Ordered, immutable list of field descriptors for one domain
pub struct FeatureSchema<R: 'static> {
    domain: Domain,
    fields: &'static [FieldDescriptor<R>],
}

impl<R: 'static> FeatureSchema<R> {
    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn fields(&self) -> &'static [FieldDescriptor<R>] {
        self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }
}

static ENGINE_FIELDS: [FieldDescriptor<EngineReading>; 11] = [
    FieldDescriptor::new(0, "Lever_position", |r| r.lever_position),
    FieldDescriptor::new(1, "Ship_speed", |r| r.ship_speed),
    FieldDescriptor::new(2, "Gas_Turbine_shaft_torque", |r| r.gt_shaft_torque),
    FieldDescriptor::new(3, "Gas_Turbine_rate_of_revolutions", |r| r.gt_rpm),
    FieldDescriptor::new(4, "Gas_Generator_rate_of_revolutions", |r| r.gg_rpm),
    FieldDescriptor::new(5, "Starboard_Propeller_Torque", |r| {
        r.starboard_propeller_torque
    }),
    FieldDescriptor::new(6, "Port_Propeller_Torque", |r| r.port_propeller_torque),
    FieldDescriptor::new(7, "HP_Turbine_exit_temperature", |r| {
        r.hp_turbine_exit_temperature
    }),
    FieldDescriptor::new(8, "GT_Compressor_inlet_air_temperature", |r| {
        r.compressor_inlet_air_temperature
    }),
    FieldDescriptor::new(9, "GT_Compressor_outlet_air_temperature", |r| {
        r.compressor_outlet_air_temperature
    }),
    FieldDescriptor::new(10, "HP_Turbine_exit_pressure", |r| {
        r.hp_turbine_exit_pressure
    }),
];

static NAVAL_FIELDS: [FieldDescriptor<NavalReading>; 16] = [
    FieldDescriptor::new(0, "Lever_position", |r| r.lever_position),
    FieldDescriptor::new(1, "Ship_speed_knots", |r| r.ship_speed_knots),
    FieldDescriptor::new(2, "Gas_Turbine_shaft_torque_kN_m", |r| {
        r.gt_shaft_torque_kn_m
    }),
    FieldDescriptor::new(3, "Gas_Turbine_rate_of_revolutions_rpm", |r| r.gt_rpm),
    FieldDescriptor::new(4, "Gas_Generator_rate_of_revolutions_rpm", |r| r.gg_rpm),
    FieldDescriptor::new(5, "Starboard_Propeller_Torque_kN", |r| {
        r.starboard_propeller_torque_kn
    }),
    FieldDescriptor::new(6, "Port_Propeller_Torque_kN", |r| {
        r.port_propeller_torque_kn
    }),
    FieldDescriptor::new(7, "HP_Turbine_exit_temperature_C", |r| {
        r.hp_turbine_exit_temperature_c
    }),
    FieldDescriptor::new(8, "GT_Compressor_inlet_air_temperature_C", |r| {
        r.compressor_inlet_air_temperature_c
    }),
    FieldDescriptor::new(9, "GT_Compressor_outlet_air_temperature_C", |r| {
        r.compressor_outlet_air_temperature_c
    }),
    FieldDescriptor::new(10, "HP_Turbine_exit_pressure_psi", |r| {
        r.hp_turbine_exit_pressure_psi
    }),
    FieldDescriptor::new(11, "GT_Compressor_inlet_air_pressure_psi", |r| {
        r.compressor_inlet_air_pressure_psi
    }),
    FieldDescriptor::new(12, "GT_Compressor_outlet_air_pressure_bar", |r| {
        r.compressor_outlet_air_pressure_bar
    }),
    FieldDescriptor::new(13, "Gas_Turbine_exhaust_gas_pressure_psi", |r| {
        r.gt_exhaust_gas_pressure_psi
    }),
    FieldDescriptor::new(14, "Turbine_Injecton_Control", |r| {
        r.turbine_injection_control
    }),
    FieldDescriptor::new(15, "Fuel_flow_lg_s", |r| r.fuel_flow_kg_s),
];

/// Engine classifier column order
pub static ENGINE_SCHEMA: FeatureSchema<EngineReading> = FeatureSchema {
    domain: Domain::Engine,
    fields: &ENGINE_FIELDS,
};

/// Naval regressor column order
pub static NAVAL_SCHEMA: FeatureSchema<NavalReading> = FeatureSchema {
    domain: Domain::Naval,
    fields: &NAVAL_FIELDS,
};

/// Column names for a domain, independent of its reading type
pub fn feature_names(domain: Domain) -> Vec<&'static str> {
    match domain {
        Domain::Engine => ENGINE_SCHEMA.names().collect(),
        Domain::Naval => NAVAL_SCHEMA.names().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn assert_positions_match<R: 'static>(schema: &FeatureSchema<R>) {
        for (index, field) in schema.fields().iter().enumerate() {
            assert_eq!(field.position, index, "field {} out of place", field.name);
        }
        let unique: HashSet<_> = schema.names().collect();
        assert_eq!(unique.len(), schema.len());
    }

    #[test]
    fn test_engine_schema_layout() {
        assert_eq!(ENGINE_SCHEMA.len(), 11);
        assert_eq!(ENGINE_SCHEMA.domain(), Domain::Engine);
        assert_positions_match(&ENGINE_SCHEMA);
        assert_eq!(ENGINE_SCHEMA.fields()[0].name, "Lever_position");
        assert_eq!(ENGINE_SCHEMA.fields()[10].name, "HP_Turbine_exit_pressure");
    }

    #[test]
    fn test_naval_schema_layout() {
        assert_eq!(NAVAL_SCHEMA.len(), 16);
        assert_eq!(NAVAL_SCHEMA.domain(), Domain::Naval);
        assert_positions_match(&NAVAL_SCHEMA);
        assert_eq!(NAVAL_SCHEMA.fields()[14].name, "Turbine_Injecton_Control");
        assert_eq!(NAVAL_SCHEMA.fields()[15].name, "Fuel_flow_lg_s");
    }

    #[test]
    fn test_feature_names_follow_schema() {
        assert_eq!(feature_names(Domain::Engine).len(), 11);
        assert_eq!(feature_names(Domain::Naval), NAVAL_SCHEMA.names().collect::<Vec<_>>());
    }

    #[test]
    fn test_schema_names_match_serde_names() {
        // The JSON keys of a reading are the training column names
        let reading = crate::test_support::engine_reading();
        let value = serde_json::to_value(&reading).unwrap();
        let object = value.as_object().unwrap();
        for field in ENGINE_SCHEMA.fields() {
            assert_eq!(object[field.name].as_f64(), Some(field.read(&reading)));
        }
        assert_eq!(object.len(), ENGINE_SCHEMA.len());
    }
}
