//! Prediction request and response payloads

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use severity_core::{
    AccidentRecord, Prediction, RecordError, RoadType, SchemaSource, Severity, VehicleType, Weather,
};

/// Accident details, from the HTML form or the JSON API
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PredictRequest {
    #[validate(range(min = 16, max = 100, message = "driver age must be between 16 and 100"))]
    pub age: u32,
    pub vehicle_type: VehicleType,
    pub weather: Weather,
    pub road_type: RoadType,
}

impl PredictRequest {
    pub fn to_record(&self) -> Result<AccidentRecord, RecordError> {
        AccidentRecord::new(self.age, self.vehicle_type, self.weather, self.road_type)
    }
}

#[derive(Debug, Serialize)]
pub struct FeatureValue {
    pub column: String,
    pub value: f32,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub prediction_id: Uuid,
    pub class_code: i64,
    pub severity: Severity,
    pub label: String,
    /// Aligned row, in schema order
    pub features: Vec<FeatureValue>,
    pub schema_hash: String,
    pub inference_time_us: u64,
}

impl PredictResponse {
    pub fn new(prediction_id: Uuid, prediction: &Prediction) -> Self {
        Self {
            prediction_id,
            class_code: prediction.class_code,
            severity: prediction.severity,
            label: prediction.label.to_string(),
            features: prediction
                .row
                .iter()
                .map(|(column, value)| FeatureValue {
                    column: column.to_string(),
                    value,
                })
                .collect(),
            schema_hash: format!("{:08x}", prediction.row.schema_hash),
            inference_time_us: prediction.inference_time_us,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SchemaResponse {
    pub columns: Vec<String>,
    pub source: SchemaSource,
    pub hash: String,
}
