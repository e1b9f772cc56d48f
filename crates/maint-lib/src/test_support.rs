//! Shared fixtures for unit tests

use crate::artifact::{ArtifactKind, ArtifactLayout, ExplainerArtifact, ModelArtifact, Task};
use crate::ensemble::{Node, Tree, TreeEnsemble};
use crate::models::{Domain, EngineReading, NavalReading};
use crate::schema::feature_names;
use std::fs;
use std::path::Path;

pub(crate) fn engine_reading() -> EngineReading {
    EngineReading {
        lever_position: 0.5,
        ship_speed: 10.0,
        gt_shaft_torque: 100.0,
        gt_rpm: 100.0,
        gg_rpm: 100.0,
        starboard_propeller_torque: 100.0,
        port_propeller_torque: 100.0,
        hp_turbine_exit_temperature: 100.0,
        compressor_inlet_air_temperature: 100.0,
        compressor_outlet_air_temperature: 100.0,
        hp_turbine_exit_pressure: 100.0,
    }
}

pub(crate) fn cruise_reading() -> EngineReading {
    EngineReading {
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
    }
}

pub(crate) fn surge_reading() -> EngineReading {
    EngineReading {
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
    }
}

pub(crate) fn naval_reading() -> NavalReading {
    NavalReading {
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
    }
}

fn names(domain: Domain) -> Option<Vec<String>> {
    Some(feature_names(domain).into_iter().map(String::from).collect())
}

/// Three classes keyed on ship speed, turbine exit temperature, exit
/// pressure and shaft torque
fn engine_ensemble() -> TreeEnsemble {
    TreeEnsemble {
        num_features: 11,
        num_outputs: 3,
        base_score: vec![0.5; 3],
        feature_names: names(Domain::Engine),
        trees: vec![
            Tree::new(
                0,
                vec![
                    Node::split(1, 12.0, 1, 2, 100.0),
                    Node::leaf(0.9, 60.0),
                    Node::leaf(-0.3, 40.0),
                ],
            ),
            Tree::new(
                0,
                vec![
                    Node::split(7, 880.0, 1, 2, 100.0),
                    Node::split(1, 8.0, 3, 4, 70.0),
                    Node::leaf(-0.6, 30.0),
                    Node::leaf(0.2, 30.0),
                    Node::leaf(0.5, 40.0),
                ],
            ),
            Tree::new(
                1,
                vec![
                    Node::split(7, 880.0, 1, 2, 100.0),
                    Node::leaf(-0.4, 65.0),
                    Node::split(10, 17.0, 3, 4, 35.0),
                    Node::leaf(0.7, 20.0),
                    Node::leaf(0.2, 15.0),
                ],
            ),
            Tree::new(
                2,
                vec![
                    Node::split(10, 17.0, 1, 2, 100.0),
                    Node::split(2, 600.0, 3, 4, 80.0),
                    Node::leaf(1.2, 20.0),
                    Node::leaf(-0.5, 50.0),
                    Node::leaf(0.3, 30.0),
                ],
            ),
            Tree::new(
                2,
                vec![
                    Node::split(2, 650.0, 1, 2, 100.0),
                    Node::leaf(-0.1, 70.0),
                    Node::leaf(0.6, 30.0),
                ],
            ),
        ],
    }
}

/// Compressor decay on outlet pressure and fuel flow, turbine decay on
/// turbine rpm and injection control
fn naval_ensemble() -> TreeEnsemble {
    TreeEnsemble {
        num_features: 16,
        num_outputs: 2,
        base_score: vec![0.975, 0.9875],
        feature_names: names(Domain::Naval),
        trees: vec![
            Tree::new(
                0,
                vec![
                    Node::split(12, 15.0, 1, 2, 100.0),
                    Node::leaf(-0.01, 40.0),
                    Node::split(15, 0.8, 3, 4, 60.0),
                    Node::leaf(0.005, 35.0),
                    Node::leaf(0.012, 25.0),
                ],
            ),
            Tree::new(
                1,
                vec![
                    Node::split(3, 3800.0, 1, 2, 100.0),
                    Node::leaf(0.004, 55.0),
                    Node::leaf(-0.006, 45.0),
                ],
            ),
            Tree::new(
                1,
                vec![
                    Node::split(14, 1.7, 1, 2, 100.0),
                    Node::leaf(0.002, 50.0),
                    Node::leaf(-0.001, 50.0),
                ],
            ),
        ],
    }
}

pub(crate) fn engine_model() -> ModelArtifact {
    ModelArtifact {
        task: Task::Multiclass,
        ensemble: engine_ensemble(),
    }
}

pub(crate) fn engine_explainer() -> ExplainerArtifact {
    ExplainerArtifact {
        expected_value: None,
        ensemble: engine_ensemble(),
    }
}

pub(crate) fn naval_model() -> ModelArtifact {
    ModelArtifact {
        task: Task::Regression,
        ensemble: naval_ensemble(),
    }
}

pub(crate) fn naval_explainer() -> ExplainerArtifact {
    ExplainerArtifact {
        expected_value: None,
        ensemble: naval_ensemble(),
    }
}

/// Write valid model and explainer files for `domains` under `root`
pub(crate) fn write_artifacts(root: &Path, domains: &[Domain]) {
    let layout = ArtifactLayout::new(root);
    fs::create_dir_all(&layout.models_dir).unwrap();
    fs::create_dir_all(&layout.explainers_dir).unwrap();

    for domain in domains {
        let (model, explainer) = match domain {
            Domain::Engine => (engine_model(), engine_explainer()),
            Domain::Naval => (naval_model(), naval_explainer()),
        };
        fs::write(
            layout.path(*domain, ArtifactKind::Model),
            serde_json::to_vec_pretty(&model).unwrap(),
        )
        .unwrap();
        fs::write(
            layout.path(*domain, ArtifactKind::Explainer),
            serde_json::to_vec_pretty(&explainer).unwrap(),
        )
        .unwrap();
    }
}
