//! Features Module - Feature Encoding Engine
//!
//! Turns a raw accident record into the row the model expects.
//! The vocabulary is fixed at compile time in `layout.rs`; alignment to
//! the model's column order happens in `vector.rs`.

pub mod layout;
pub mod record;
pub mod vector;


// Re-export common types
pub use layout::{RoadType, VehicleType, Weather, UnknownCategory, ENCODED_COUNT, ENCODED_LAYOUT};
pub use record::{AccidentRecord, RecordError, DEFAULT_AGE, MAX_AGE, MIN_AGE};
pub use vector::{encode, AlignedRow, EncodedRecord};
