//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! To change where the model artifacts live, only edit this file
//! (or set the matching environment variables).

/// Default model artifact path
///
/// `.onnx` selects the ONNX Runtime store, `.json` the linear store.
pub const DEFAULT_MODEL_PATH: &str = "casualty_model.onnx";

/// Default fallback schema file (JSON array of column names)
pub const DEFAULT_COLUMNS_PATH: &str = "model_columns.json";

/// ONNX custom metadata key holding the trained feature names
pub const FEATURE_NAMES_METADATA_KEY: &str = "feature_names";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Road Accident Severity";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get model artifact path from environment or use default
pub fn get_model_path() -> String {
    std::env::var("MODEL_PATH")
        .unwrap_or_else(|_| DEFAULT_MODEL_PATH.to_string())
}

/// Get fallback schema path from environment or use default
pub fn get_columns_path() -> String {
    std::env::var("COLUMNS_PATH")
        .unwrap_or_else(|_| DEFAULT_COLUMNS_PATH.to_string())
}
