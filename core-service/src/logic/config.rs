//! Predictor configuration

use std::path::PathBuf;

use crate::constants;

/// Where the predictor loads its artifacts from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictorConfig {
    /// Model artifact (`.onnx` or `.json`)
    pub model_path: PathBuf,

    /// Fallback schema file, read only when the model has no feature names
    pub columns_path: PathBuf,
}

impl PredictorConfig {
    pub fn new(model_path: impl Into<PathBuf>, columns_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            columns_path: columns_path.into(),
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::new(constants::get_model_path(), constants::get_columns_path())
    }
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self::new(constants::DEFAULT_MODEL_PATH, constants::DEFAULT_COLUMNS_PATH)
    }
}
