//! Road Accident Severity - Core prediction pipeline
//!
//! Loads a trained casualty-severity classifier, resolves the column
//! layout it was trained on, one-hot encodes accident records onto that
//! layout and maps the predicted class to a severity label.

pub mod constants;
pub mod logic;

pub use logic::config::PredictorConfig;
pub use logic::features::{
    encode, AccidentRecord, AlignedRow, RecordError, RoadType, VehicleType, Weather,
    DEFAULT_AGE, MAX_AGE, MIN_AGE,
};
pub use logic::model::{
    severity_label, ColumnSchema, InferenceError, ModelStore, SchemaError, SchemaSource, Severity,
};
pub use logic::predictor::{EngineStatus, Prediction, Predictor, PredictorError};
