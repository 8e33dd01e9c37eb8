//! Road Accident Severity - Prediction Form Server
//!
//! Serves the accident form and runs each submission through the
//! severity predictor.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  SEVERITY PREDICTION SERVER                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌───────────┐  ┌─────────────────────────┐  │
//! │  │  Form     │  │  JSON     │  │  Predictor (startup)    │  │
//! │  │  Pages    │  │  API      │  │  model + column schema  │  │
//! │  │  (Axum)   │  │  (Axum)   │  │                         │  │
//! │  └─────┬─────┘  └─────┬─────┘  └────────────┬────────────┘  │
//! │        └──────────────┼─────────────────────┘               │
//! │                       ▼                                     │
//! │        encode → align → predict → severity label            │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod models;
mod handlers;
mod views;
mod error;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use severity_core::Predictor;
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "severity_web=debug,severity_core=info,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    tracing::info!("{} server starting...", severity_core::constants::APP_NAME);
    tracing::info!("Model: {}", config.predictor.model_path.display());
    tracing::info!("Fallback columns: {}", config.predictor.columns_path.display());

    // Load model and column schema once; nothing can be served without them
    let predictor = Predictor::init(&config.predictor)
        .context("Failed to initialize predictor")?;

    // Build application state
    let state = AppState {
        predictor: Arc::new(predictor),
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await
        .context("Server error")?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<Predictor>,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    // Form pages
    let page_routes = Router::new()
        .route("/", get(handlers::form::index))
        .route("/predict", post(handlers::predict::submit));

    // JSON API
    let api_routes = Router::new()
        .route("/health", get(handlers::health::check))
        .route("/api/v1/predict", post(handlers::predict::predict))
        .route("/api/v1/schema", get(handlers::schema::get));

    // Combine all routes
    Router::new()
        .merge(page_routes)
        .merge(api_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use severity_core::PredictorConfig;
    use tower::ServiceExt;

    const FIXTURES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../core-service/fixtures");

    fn test_state() -> AppState {
        let predictor_config = PredictorConfig::new(
            format!("{}/casualty_model.json", FIXTURES),
            format!("{}/model_columns.json", FIXTURES),
        );
        let predictor = Predictor::init(&predictor_config).unwrap();

        AppState {
            predictor: Arc::new(predictor),
            config: config::Config {
                port: 0,
                environment: "test".to_string(),
                predictor: predictor_config,
            },
        }
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn form_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/predict")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn json_request(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/predict")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_form_page() {
        let app = create_router(test_state());
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Driver Age"));
        assert!(html.contains("Predict Severity"));
    }

    #[tokio::test]
    async fn test_form_submission_fatal() {
        let app = create_router(test_state());
        let response = app
            .oneshot(form_request("age=16&vehicle_type=Bike&weather=Snowy&road_type=Rural+Road"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Predicted Accident Severity: Fatal Injury"));
        assert!(html.contains("See processed features"));
        assert!(html.contains("<td>Road_Type_Rural Road</td><td>1</td>"));
        assert!(html.contains("<td>Age</td><td>16</td>"));
    }

    #[tokio::test]
    async fn test_json_prediction() {
        let app = create_router(test_state());
        let response = app
            .oneshot(json_request(serde_json::json!({
                "age": 30,
                "vehicle_type": "Car",
                "weather": "Clear",
                "road_type": "Highway"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["class_code"], 2);
        assert_eq!(body["severity"], "slight");
        assert_eq!(body["label"], "Slight Injury");

        let features = body["features"].as_array().unwrap();
        assert_eq!(features.len(), 12);
        assert_eq!(features[0]["column"], "Age");
        assert_eq!(features[0]["value"], 30.0);
        assert_eq!(features[1]["column"], "Weather_Clear");
        assert_eq!(features[1]["value"], 1.0);
    }

    #[tokio::test]
    async fn test_age_out_of_range_rejected() {
        for age in [15, 101] {
            let app = create_router(test_state());
            let response = app
                .oneshot(json_request(serde_json::json!({
                    "age": age,
                    "vehicle_type": "Car",
                    "weather": "Clear",
                    "road_type": "Highway"
                })))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "age {}", age);
        }
    }

    async fn assert_bad_request(request: Request<Body>, needle: &str) {
        let response = create_router(test_state()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );

        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["status"], 400);
        let message = body["error"].as_str().unwrap();
        assert!(message.contains(needle), "{}", message);
    }

    #[tokio::test]
    async fn test_unknown_category_rejected() {
        assert_bad_request(
            form_request("age=30&vehicle_type=Boat&weather=Clear&road_type=Highway"),
            "unknown Vehicle_Type value: \"Boat\"",
        )
        .await;

        assert_bad_request(
            json_request(serde_json::json!({
                "age": 30,
                "vehicle_type": "Car",
                "weather": "Sunny",
                "road_type": "Highway"
            })),
            "unknown Weather value: \"Sunny\"",
        )
        .await;
    }

    #[tokio::test]
    async fn test_non_numeric_age_rejected() {
        assert_bad_request(
            form_request("age=abc&vehicle_type=Car&weather=Clear&road_type=Highway"),
            "invalid digit",
        )
        .await;

        assert_bad_request(
            json_request(serde_json::json!({
                "age": "thirty",
                "vehicle_type": "Car",
                "weather": "Clear",
                "road_type": "Highway"
            })),
            "age",
        )
        .await;
    }

    #[tokio::test]
    async fn test_schema_endpoint() {
        let app = create_router(test_state());
        let response = app
            .oneshot(Request::builder().uri("/api/v1/schema").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["columns"].as_array().unwrap().len(), 12);
        assert_eq!(body["source"]["kind"], "from_model");
    }

    #[tokio::test]
    async fn test_health_reports_engine() {
        let app = create_router(test_state());
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["engine"]["model_loaded"], true);
        assert_eq!(body["engine"]["model_type"], "linear");
        assert!(body["engine"]["model_loaded_at"].is_string());
    }
}
