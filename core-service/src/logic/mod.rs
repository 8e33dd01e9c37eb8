//! Logic Module - Prediction Pipeline
//!
//! - `features/` - Raw record, categorical vocabulary, one-hot alignment
//! - `model/` - Model stores (ONNX, linear), schema resolution, severity
//! - `predictor` - The assembled encode → predict → map pipeline

pub mod config;
pub mod features;
pub mod model;
pub mod predictor;
