//! Inference Engine - Model Store abstraction + ONNX Runtime backend
//!
//! A model store is loaded once at startup and then only read.
//! Two artifact formats are supported, chosen by file extension:
//! - `.onnx`: classifier exported to ONNX, run through ONNX Runtime
//! - `.json`: linear classifier (see `linear.rs`), run natively

use std::path::{Path, PathBuf};

use ndarray::Array2;
use parking_lot::Mutex;
use serde::Serialize;
use ort::session::{Session, builder::GraphOptimizationLevel};
use ort::value::{Tensor, ValueType};

use super::linear::LinearModelStore;
use crate::constants::FEATURE_NAMES_METADATA_KEY;
use crate::logic::features::AlignedRow;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Model metadata
#[derive(Debug, Clone, Serialize)]
pub struct ModelMetadata {
    pub model_path: String,
    pub model_type: String,       // "onnx" or "linear"
    pub input_width: Option<usize>,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

impl ModelMetadata {
    pub fn new(model_path: impl Into<String>, model_type: &str, input_width: Option<usize>) -> Self {
        Self {
            model_path: model_path.into(),
            model_type: model_type.to_string(),
            input_width,
            loaded_at: chrono::Utc::now(),
        }
    }
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("model not found: {0}")]
    NotFound(PathBuf),

    #[error("unsupported model format: {0} (expected .onnx or .json)")]
    UnsupportedFormat(PathBuf),

    #[error("failed to load model: {0}")]
    Load(String),

    #[error("model introspection failed: {0}")]
    Introspection(String),

    #[error("row has {actual} features but the model expects {expected}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("inference failed: {0}")]
    Runtime(String),
}

// ============================================================================
// MODEL STORE TRAIT
// ============================================================================

/// Trained classifier, opaque to the rest of the pipeline
pub trait ModelStore: Send + Sync {
    /// Predict the class code for one aligned row
    fn predict(&self, row: &AlignedRow) -> Result<i64, InferenceError>;

    /// Feature names recorded at training time, if the artifact has them
    fn feature_names(&self) -> Result<Option<Vec<String>>, InferenceError>;

    /// Number of input features, when the artifact declares it
    fn input_width(&self) -> Option<usize>;

    fn metadata(&self) -> &ModelMetadata;
}

/// Load a model store, picking the backend from the file extension
pub fn load_model(path: &Path) -> Result<Box<dyn ModelStore>, InferenceError> {
    if !path.exists() {
        return Err(InferenceError::NotFound(path.to_path_buf()));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("onnx") => Ok(Box::new(OnnxModelStore::load(path)?)),
        Some("json") => Ok(Box::new(LinearModelStore::load(path)?)),
        _ => Err(InferenceError::UnsupportedFormat(path.to_path_buf())),
    }
}

// ============================================================================
// ONNX IMPLEMENTATION
// ============================================================================

/// Output holding the predicted class (skl2onnx naming)
const LABEL_OUTPUT: &str = "label";

pub struct OnnxModelStore {
    // Session::run needs exclusive access
    session: Mutex<Session>,
    output_name: String,
    metadata: ModelMetadata,
}

impl OnnxModelStore {
    /// Load ONNX model from file
    pub fn load(model_path: &Path) -> Result<Self, InferenceError> {
        log::info!("Loading ONNX model from: {}", model_path.display());

        let session = Session::builder()
            .map_err(|e| InferenceError::Load(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| InferenceError::Load(format!("Failed to set optimization: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| InferenceError::Load(format!("Failed to load model: {}", e)))?;

        Self::from_session(session, model_path.display().to_string())
    }

    fn from_session(session: Session, model_path: String) -> Result<Self, InferenceError> {
        let output_name = session
            .outputs
            .iter()
            .find(|o| o.name == LABEL_OUTPUT)
            .or_else(|| session.outputs.first())
            .map(|o| o.name.clone())
            .ok_or_else(|| InferenceError::Load("No output defined".to_string()))?;

        // Dimension 0 is the batch; a negative size means dynamic
        let input_width = session.inputs.first().and_then(|input| match &input.input_type {
            ValueType::Tensor { shape, .. } => shape
                .get(1)
                .copied()
                .filter(|&d| d > 0)
                .map(|d| d as usize),
            _ => None,
        });

        log::info!(
            "ONNX model loaded successfully (output: {}, inputs: {})",
            output_name,
            input_width.map_or_else(|| "dynamic".to_string(), |w| w.to_string())
        );

        Ok(Self {
            session: Mutex::new(session),
            output_name,
            metadata: ModelMetadata::new(model_path, "onnx", input_width),
        })
    }
}

impl ModelStore for OnnxModelStore {
    fn predict(&self, row: &AlignedRow) -> Result<i64, InferenceError> {
        if let Some(expected) = self.metadata.input_width {
            if expected != row.len() {
                return Err(InferenceError::ShapeMismatch {
                    expected,
                    actual: row.len(),
                });
            }
        }

        let input_array = Array2::<f32>::from_shape_vec((1, row.len()), row.as_slice().to_vec())
            .map_err(|e| InferenceError::Runtime(format!("Array error: {}", e)))?;

        let input_tensor = Tensor::from_array(input_array)
            .map_err(|e| InferenceError::Runtime(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError::Runtime(format!("Inference failed: {}", e)))?;

        let output = outputs
            .get(&self.output_name)
            .ok_or_else(|| InferenceError::Runtime("No output".to_string()))?;

        let (_, labels) = output
            .try_extract_tensor::<i64>()
            .map_err(|e| InferenceError::Runtime(format!("Extract error: {}", e)))?;

        let label = labels.first().copied();
        label.ok_or_else(|| InferenceError::Runtime("Empty label output".to_string()))
    }

    /// Reads the `feature_names` custom metadata property (JSON array)
    fn feature_names(&self) -> Result<Option<Vec<String>>, InferenceError> {
        let session = self.session.lock();
        let metadata = session
            .metadata()
            .map_err(|e| InferenceError::Introspection(e.to_string()))?;

        let raw = metadata
            .custom(FEATURE_NAMES_METADATA_KEY)
            .map_err(|e| InferenceError::Introspection(e.to_string()))?;

        match raw {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| InferenceError::Introspection(format!("bad {}: {}", FEATURE_NAMES_METADATA_KEY, e))),
            None => Ok(None),
        }
    }

    fn input_width(&self) -> Option<usize> {
        self.metadata.input_width
    }

    fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::{encode, AccidentRecord, RoadType, VehicleType, Weather};
    use crate::logic::model::ColumnSchema;
    use tempfile::tempdir;

    const ONNX_FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/casualty_model.onnx");
    const COLUMNS_FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/model_columns.json");

    #[test]
    fn test_load_missing_model() {
        let dir = tempdir().unwrap();
        let err = load_model(&dir.path().join("casualty_model.onnx")).err().unwrap();
        assert!(matches!(err, InferenceError::NotFound(_)));
    }

    #[test]
    fn test_load_unsupported_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("casualty_model.pkl");
        std::fs::write(&path, b"\x80\x04").unwrap();

        let err = load_model(&path).err().unwrap();
        assert!(matches!(err, InferenceError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_load_dispatches_json_to_linear() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/casualty_model.json");
        let model = load_model(Path::new(path)).unwrap();
        assert_eq!(model.metadata().model_type, "linear");
        assert_eq!(model.input_width(), Some(12));
    }

    #[test]
    fn test_corrupt_onnx_fails_to_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("casualty_model.onnx");
        std::fs::write(&path, b"not an onnx graph").unwrap();

        let err = load_model(&path).err().unwrap();
        assert!(matches!(err, InferenceError::Load(_)));
    }

    #[test]
    fn test_onnx_introspection() {
        let model = load_model(Path::new(ONNX_FIXTURE)).unwrap();
        assert_eq!(model.metadata().model_type, "onnx");
        assert_eq!(model.input_width(), Some(12));

        let expected = ColumnSchema::from_file(Path::new(COLUMNS_FIXTURE)).unwrap();
        let names = model.feature_names().unwrap().unwrap();
        assert_eq!(names, expected.columns());
    }

    #[test]
    fn test_onnx_predicts_label_output() {
        let model = OnnxModelStore::load(Path::new(ONNX_FIXTURE)).unwrap();
        // The graph lists the float scores first; the int64 label must win
        assert_eq!(model.output_name, LABEL_OUTPUT);

        let schema = ColumnSchema::from_file(Path::new(COLUMNS_FIXTURE)).unwrap();

        let fatal = AccidentRecord::new(16, VehicleType::Bike, Weather::Snowy, RoadType::RuralRoad).unwrap();
        assert_eq!(model.predict(&encode(&fatal, &schema)).unwrap(), 0);

        let slight = AccidentRecord::new(30, VehicleType::Car, Weather::Clear, RoadType::Highway).unwrap();
        assert_eq!(model.predict(&encode(&slight, &schema)).unwrap(), 2);
    }

    #[test]
    fn test_onnx_rejects_wrong_width() {
        let model = load_model(Path::new(ONNX_FIXTURE)).unwrap();

        let full = ColumnSchema::from_file(Path::new(COLUMNS_FIXTURE)).unwrap();
        let short = ColumnSchema::new(full.columns()[..11].to_vec()).unwrap();
        let record = AccidentRecord::new(40, VehicleType::Bus, Weather::Rainy, RoadType::Highway).unwrap();

        let err = model.predict(&encode(&record, &short)).unwrap_err();
        assert!(matches!(err, InferenceError::ShapeMismatch { expected: 12, actual: 11 }));
    }
}
