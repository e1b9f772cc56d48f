//! Reading to feature vector encoding
//!
//! The vector layout is taken from the domain's [`FeatureSchema`], never from
//! the reading's own field order, so it always matches the column order the
//! artifacts were fit on.

use crate::schema::FeatureSchema;

/// Encodes typed readings into ordered numeric vectors
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureVectorCodec;

impl FeatureVectorCodec {
    /// Pure and deterministic; assumes the reading already passed validation
    pub fn encode<R: 'static>(reading: &R, schema: &FeatureSchema<R>) -> Vec<f64> {
        schema
            .fields()
            .iter()
            .map(|field| field.read(reading))
            .collect()
    }
}
