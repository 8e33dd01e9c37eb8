//! Feature Vectors - one-hot encoding and schema alignment
//!
//! Two stages:
//! 1. [`EncodedRecord`]: the record spread over the full encoded vocabulary
//!    (`ENCODED_LAYOUT` order).
//! 2. [`AlignedRow`]: the encoded values reindexed onto the model's
//!    [`ColumnSchema`]. Schema columns the encoder never produces are 0,
//!    vocabulary columns missing from the schema are dropped.

use serde::Serialize;

use super::layout::{feature_index, AGE_COLUMN, ENCODED_COUNT};
use super::record::AccidentRecord;
use crate::logic::model::ColumnSchema;

// ============================================================================
// ENCODED RECORD
// ============================================================================

/// Full-vocabulary one-hot encoding of a single record
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EncodedRecord {
    /// Values in order defined by ENCODED_LAYOUT
    pub values: [f32; ENCODED_COUNT],
}

impl EncodedRecord {
    /// Encode a record. Exactly one indicator per categorical field is set.
    pub fn from_record(record: &AccidentRecord) -> Self {
        let mut values = [0.0f32; ENCODED_COUNT];

        if let Some(i) = feature_index(AGE_COLUMN) {
            values[i] = record.age() as f32;
        }

        let indicators = [
            record.weather().column(),
            record.vehicle_type().column(),
            record.road_type().column(),
        ];
        for column in indicators {
            if let Some(i) = feature_index(column) {
                values[i] = 1.0;
            }
        }

        Self { values }
    }

    /// Get values as slice
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    /// Get value by column name
    pub fn get_by_name(&self, name: &str) -> Option<f32> {
        feature_index(name).map(|i| self.values[i])
    }
}

// ============================================================================
// ALIGNED ROW
// ============================================================================

/// Encoded record reindexed onto a model's column schema
///
/// `columns` always equals the schema it was built from, in the same order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedRow {
    /// CRC32 of the schema this row was aligned to
    pub schema_hash: u32,
    columns: Vec<String>,
    values: Vec<f32>,
}

impl AlignedRow {
    /// Reindex an encoded record onto `schema`, filling unseen columns with 0
    pub fn align(encoded: &EncodedRecord, schema: &ColumnSchema) -> Self {
        let values = schema
            .iter()
            .map(|column| encoded.get_by_name(column).unwrap_or(0.0))
            .collect();

        Self {
            schema_hash: schema.hash(),
            columns: schema.columns().to_vec(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Get values as slice (schema order)
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    /// Get value by column name
    pub fn get_by_name(&self, name: &str) -> Option<f32> {
        self.columns
            .iter()
            .position(|c| c == name)
            .map(|i| self.values[i])
    }

    /// (column, value) pairs in schema order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> + '_ {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    /// Convert to JSON-serializable format for logging
    pub fn to_log_entry(&self) -> serde_json::Value {
        serde_json::json!({
            "schema_hash": format!("{:08x}", self.schema_hash),
            "named_values": self.iter()
                .map(|(name, value)| serde_json::json!({ "column": name, "value": value }))
                .collect::<Vec<_>>(),
        })
    }
}

/// One-hot encode `record` and align it to `schema`
pub fn encode(record: &AccidentRecord, schema: &ColumnSchema) -> AlignedRow {
    AlignedRow::align(&EncodedRecord::from_record(record), schema)
}
