//! Per-feature attribution aligned to predicted outputs

use super::PredictionResult;
use crate::artifact::ExplainerArtifact;
use crate::error::AttributionError;
use crate::schema::FeatureSchema;
use ndarray::{Array3, ArrayView1, Axis};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::time::Instant;
use tracing::debug;

/// Feature name to contribution score, in schema order
#[derive(Debug, Clone, PartialEq)]
pub struct AttributionMap {
    entries: Vec<(&'static str, f64)>,
}

impl AttributionMap {
    fn from_slice<R: 'static>(schema: &FeatureSchema<R>, slice: ArrayView1<'_, f64>) -> Self {
        let entries = schema
            .fields()
            .iter()
            .zip(slice.iter())
            .map(|(field, score)| (field.name, *score))
            .collect();
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, score)| *score)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(name, _)| *name).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all contributions
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, score)| score).sum()
    }
}

impl Serialize for AttributionMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, score) in &self.entries {
            map.serialize_entry(name, score)?;
        }
        map.end()
    }
}

/// Attribution maps for one prediction
#[derive(Debug, Clone, PartialEq)]
pub enum Attribution {
    /// Winning class only
    Class(AttributionMap),
    /// Both decay targets
    Targets {
        compressor: AttributionMap,
        turbine: AttributionMap,
    },
}

/// Wraps a loaded explainer and relabels its output with schema names
pub struct AttributionEngine<'a, R: 'static> {
    explainer: Option<&'a ExplainerArtifact>,
    schema: &'static FeatureSchema<R>,
}

impl<'a, R: 'static> AttributionEngine<'a, R> {
    pub fn new(explainer: Option<&'a ExplainerArtifact>, schema: &'static FeatureSchema<R>) -> Self {
        Self { explainer, schema }
    }

    /// Raw contribution tensor shaped `[batch, feature, output]` for one row
    pub fn contributions(&self, vector: &[f64]) -> Result<Array3<f64>, AttributionError> {
        let explainer = self.explainer.ok_or(AttributionError::ExplainerUnavailable)?;
        if vector.len() != explainer.num_features() || vector.len() != self.schema.len() {
            return Err(AttributionError::DimensionMismatch {
                expected: explainer.num_features(),
                actual: vector.len(),
            });
        }

        let start = Instant::now();
        let values = explainer
            .ensemble
            .shap_values(vector)
            .map_err(|(tree, _)| AttributionError::DegenerateCover { tree })?;

        for (feature, row) in values.axis_iter(Axis(0)).enumerate() {
            if row.iter().any(|v| !v.is_finite()) {
                return Err(AttributionError::NonFinite { feature });
            }
        }
        debug!(elapsed_us = start.elapsed().as_micros(), "Attribution computed");
        Ok(values.insert_axis(Axis(0)))
    }

    /// Baseline per output, `None` when no explainer is loaded
    pub fn expected_values(&self) -> Option<Vec<f64>> {
        self.explainer.map(|e| e.expected_values())
    }

    /// Select the slices the prediction calls for
    pub fn explain(
        &self,
        vector: &[f64],
        result: &PredictionResult,
    ) -> Result<Attribution, AttributionError> {
        let tensor = self.contributions(vector)?;
        let row = tensor.index_axis(Axis(0), 0);
        let arity = row.len_of(Axis(1));
        let slice = |index: usize| {
            if index >= arity {
                return Err(AttributionError::OutputOutOfRange { index, arity });
            }
            Ok(AttributionMap::from_slice(
                self.schema,
                row.index_axis(Axis(1), index),
            ))
        };

        match result {
            PredictionResult::Classification { label, .. } => {
                Ok(Attribution::Class(slice(label.index())?))
            }
            PredictionResult::Regression { .. } => Ok(Attribution::Targets {
                compressor: slice(0)?,
                turbine: slice(1)?,
            }),
        }
    }
}
