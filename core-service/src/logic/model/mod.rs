//! Model Module - AI/ML Inference Engine
//!
//! Model stores, column schema resolution and severity mapping.
//! The pipeline only sees the `ModelStore` trait, so the backend can be
//! swapped without touching the encoder.

pub mod inference;
pub mod linear;
pub mod schema;
pub mod severity;

// Re-export common types
pub use inference::{load_model, InferenceError, ModelMetadata, ModelStore, OnnxModelStore};
pub use linear::{LinearModel, LinearModelStore};
pub use schema::{check_consistency, resolve, ColumnSchema, ResolvedSchema, SchemaError, SchemaSource};
pub use severity::{severity_label, Severity};
