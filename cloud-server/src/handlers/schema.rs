//! Column schema handler

use axum::{extract::State, Json};

use crate::AppState;
use crate::models::SchemaResponse;

/// Columns the model expects, and where they were resolved from
pub async fn get(State(state): State<AppState>) -> Json<SchemaResponse> {
    let schema = state.predictor.schema();

    Json(SchemaResponse {
        columns: schema.columns().to_vec(),
        source: state.predictor.schema_source().clone(),
        hash: format!("{:08x}", schema.hash()),
    })
}
