//! Record store HTTP routes
//!
//! | Method | Path | Namespace |
//! |---|---|---|
//! | POST | `/save_health_details` | health details |
//! | GET | `/get_health_details/:user_id` | health details |
//! | POST | `/receive_dietary_data` | dietary data |
//! | GET | `/get_dietary_data/:user_id` | dietary data |
//! | GET | `/health` | - |

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::build_info::BuildInfo;
use crate::models::Namespace;
use crate::store::{RecordStore, StoreError};

/// Build the router over `store`
pub fn router(store: RecordStore) -> Router {
    Router::new()
        .route("/save_health_details", post(save_health_details))
        .route("/get_health_details/:user_id", get(get_health_details))
        .route("/receive_dietary_data", post(receive_dietary_data))
        .route("/get_dietary_data/:user_id", get(get_dietary_data))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

/// Error body `{"error": ...}` with the status matching the store error
struct ApiError(StoreError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            StoreError::MissingUserId { .. } => StatusCode::BAD_REQUEST,
            StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
            other => {
                error!("record store failure: {}", other);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError(e)
    }
}

/// Body as JSON, `None` when empty or unparseable
fn parse_body(body: &Bytes) -> Option<Value> {
    if body.is_empty() {
        return None;
    }
    serde_json::from_slice(body).ok()
}

fn save(
    store: &RecordStore,
    namespace: Namespace,
    body: &Bytes,
    message: &'static str,
) -> Result<Json<Value>, ApiError> {
    let user_id = store.put(namespace, parse_body(body))?;
    info!(namespace = namespace.as_str(), %user_id, "record stored");
    Ok(Json(json!({ "message": message })))
}

fn load(store: &RecordStore, namespace: Namespace, user_id: &str) -> Result<Json<Value>, ApiError> {
    Ok(Json(store.get(namespace, user_id)?.payload))
}

async fn save_health_details(
    State(store): State<RecordStore>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    save(&store, Namespace::HealthDetails, &body, "Health details saved successfully")
}

async fn get_health_details(
    State(store): State<RecordStore>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    load(&store, Namespace::HealthDetails, &user_id)
}

async fn receive_dietary_data(
    State(store): State<RecordStore>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    save(&store, Namespace::DietaryData, &body, "Dietary data received successfully")
}

async fn get_dietary_data(
    State(store): State<RecordStore>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    load(&store, Namespace::DietaryData, &user_id)
}

async fn health(State(store): State<RecordStore>) -> Json<Value> {
    let info = BuildInfo::current();
    Json(json!({
        "status": "healthy",
        "version": info.version,
        "build_number": info.build_number,
        "store": store.backend_kind(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
