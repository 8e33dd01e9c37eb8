//! Predictor - encode → predict → map pipeline
//!
//! Built once at startup by [`Predictor::init`], then shared read-only.
//! Holds the loaded model, the resolved column schema and inference stats.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use super::config::PredictorConfig;
use super::features::{encode, AccidentRecord, AlignedRow};
use super::model::{
    check_consistency, load_model, resolve, ColumnSchema, InferenceError, ModelStore,
    ResolvedSchema, SchemaError, SchemaSource, Severity,
};

#[derive(Debug, thiserror::Error)]
pub enum PredictorError {
    #[error(transparent)]
    Model(#[from] InferenceError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// One prediction, with the row that was fed to the model
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub class_code: i64,
    pub severity: Severity,
    pub label: &'static str,
    pub row: AlignedRow,
    pub inference_time_us: u64,
}

/// Engine Status for UI
#[derive(Debug, Clone, Serialize)]
pub struct EngineStatus {
    pub model_loaded: bool,
    pub model_name: String,
    pub model_type: String,
    pub model_loaded_at: chrono::DateTime<chrono::Utc>,
    pub schema_source: SchemaSource,
    pub schema_columns: usize,
    pub schema_hash: String,
    pub avg_latency_ms: f32,
    pub inference_count: u64,
}

pub struct Predictor {
    model: Box<dyn ModelStore>,
    resolved: ResolvedSchema,
    latency_sum_us: AtomicU64,
    inference_count: AtomicU64,
}

impl Predictor {
    /// Load the model, resolve its schema and check they agree
    pub fn init(config: &PredictorConfig) -> Result<Self, PredictorError> {
        let model = load_model(&config.model_path)?;
        let resolved = resolve(model.as_ref(), &config.columns_path)?;
        Self::from_parts(model, resolved)
    }

    pub fn from_parts(model: Box<dyn ModelStore>, resolved: ResolvedSchema) -> Result<Self, PredictorError> {
        check_consistency(&resolved.schema, model.as_ref())?;

        log::info!(
            "Predictor ready: model={} ({}), schema from {} ({} columns, hash {:08x})",
            model.metadata().model_path,
            model.metadata().model_type,
            resolved.source,
            resolved.schema.len(),
            resolved.schema.hash()
        );

        Ok(Self {
            model,
            resolved,
            latency_sum_us: AtomicU64::new(0),
            inference_count: AtomicU64::new(0),
        })
    }

    pub fn schema(&self) -> &ColumnSchema {
        &self.resolved.schema
    }

    pub fn schema_source(&self) -> &SchemaSource {
        &self.resolved.source
    }

    /// Encode a record onto this predictor's schema without predicting
    pub fn encode(&self, record: &AccidentRecord) -> AlignedRow {
        encode(record, &self.resolved.schema)
    }

    pub fn predict(&self, record: &AccidentRecord) -> Result<Prediction, InferenceError> {
        let start_time = std::time::Instant::now();

        let row = self.encode(record);
        log::debug!("Aligned row: {}", row.to_log_entry());

        let class_code = self.model.predict(&row)?;
        let severity = Severity::from_class(class_code);
        if severity == Severity::Unknown {
            log::warn!("Model returned unexpected class {}", class_code);
        }

        let inference_time = start_time.elapsed().as_micros() as u64;

        // Track metrics
        self.latency_sum_us.fetch_add(inference_time, Ordering::Relaxed);
        self.inference_count.fetch_add(1, Ordering::Relaxed);

        Ok(Prediction {
            class_code,
            severity,
            label: severity.label(),
            row,
            inference_time_us: inference_time,
        })
    }

    pub fn status(&self) -> EngineStatus {
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        let count = self.inference_count.load(Ordering::Relaxed);
        let avg = if count > 0 { (sum as f32 / count as f32) / 1000.0 } else { 0.0 };

        let metadata = self.model.metadata();
        EngineStatus {
            model_loaded: true,
            model_name: metadata.model_path.clone(),
            model_type: metadata.model_type.clone(),
            model_loaded_at: metadata.loaded_at,
            schema_source: self.resolved.source.clone(),
            schema_columns: self.resolved.schema.len(),
            schema_hash: format!("{:08x}", self.resolved.schema.hash()),
            avg_latency_ms: avg,
            inference_count: count,
        }
    }
}
