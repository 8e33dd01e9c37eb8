//! Prediction handlers

use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection},
        State,
    },
    response::Html,
    Form, Json,
};
use severity_core::Prediction;
use uuid::Uuid;
use validator::Validate;

use crate::{AppState, AppResult};
use crate::models::{PredictRequest, PredictResponse};
use crate::views;

/// Validate, encode and predict on a blocking thread
async fn run(state: &AppState, req: &PredictRequest) -> AppResult<(Uuid, Prediction)> {
    req.validate()?;
    let record = req.to_record()?;

    let predictor = state.predictor.clone();
    let prediction = tokio::task::spawn_blocking(move || predictor.predict(&record)).await??;

    let id = Uuid::new_v4();
    tracing::info!(
        "Prediction {}: age={} vehicle={} weather={} road={} -> {} (class {}, {}us)",
        id,
        req.age,
        req.vehicle_type,
        req.weather,
        req.road_type,
        prediction.label,
        prediction.class_code,
        prediction.inference_time_us
    );

    Ok((id, prediction))
}

/// Form submission: result page with the processed features
pub async fn submit(
    State(state): State<AppState>,
    req: Result<Form<PredictRequest>, FormRejection>,
) -> AppResult<Html<String>> {
    let Form(req) = req?;
    let (_, prediction) = run(&state, &req).await?;
    Ok(Html(views::result_page(&req, &prediction)))
}

/// JSON API
pub async fn predict(
    State(state): State<AppState>,
    req: Result<Json<PredictRequest>, JsonRejection>,
) -> AppResult<Json<PredictResponse>> {
    let Json(req) = req?;
    let (id, prediction) = run(&state, &req).await?;
    Ok(Json(PredictResponse::new(id, &prediction)))
}
