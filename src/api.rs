// SWIFT Code Directory - REST API with Axum
//
// Thin transport layer: every handler locks the shared service, calls one
// operation and maps the outcome onto a status code + JSON body.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::db::SqliteStore;
use crate::error::{DirectoryError, ErrorCategory};
use crate::projection::{CountryGroup, SwiftCodeView};
use crate::service::SwiftCodeService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    service: Arc<Mutex<SwiftCodeService<SqliteStore>>>,
}

impl AppState {
    pub fn new(service: SwiftCodeService<SqliteStore>) -> Self {
        Self {
            service: Arc::new(Mutex::new(service)),
        }
    }

    fn service(&self) -> Result<MutexGuard<'_, SwiftCodeService<SqliteStore>>, ApiError> {
        self.service.lock().map_err(|_| ApiError::Poisoned)
    }
}

/// `{"message": "..."}` body used for acknowledgements and errors
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

// ============================================================================
// Error mapping
// ============================================================================

#[derive(Debug)]
pub enum ApiError {
    Directory(DirectoryError),
    /// Body that is not JSON or does not deserialise into a view
    Payload(JsonRejection),
    Poisoned,
}

impl From<DirectoryError> for ApiError {
    fn from(err: DirectoryError) -> Self {
        ApiError::Directory(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Payload(rejection)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Directory(err) => {
                let status = match err.category() {
                    ErrorCategory::Conflict => StatusCode::CONFLICT,
                    ErrorCategory::NotFound => StatusCode::NOT_FOUND,
                    ErrorCategory::BadRequest => StatusCode::BAD_REQUEST,
                    ErrorCategory::Internal => {
                        error!("request failed: {}", err);
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (status, err.to_string())
            }
            ApiError::Payload(rejection) => {
                warn!("unreadable request body: {}", rejection.body_text());
                (StatusCode::BAD_REQUEST, rejection.body_text())
            }
            ApiError::Poisoned => {
                error!("directory lock poisoned");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Directory unavailable".to_string(),
                )
            }
        };

        (status, MessageResponse::new(message)).into_response()
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /health - Health check
async fn health_check() -> impl IntoResponse {
    MessageResponse::new("OK")
}

/// POST /v1/swift-codes - Add a SWIFT code
async fn add_swift_code(
    State(state): State<AppState>,
    payload: Result<Json<SwiftCodeView>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(view) = payload?;
    state.service()?.add_code(&view)?;
    Ok(MessageResponse::new("SWIFT code data added successfully."))
}

/// GET /v1/swift-codes/:swift_code - One code, headquarters with branches
async fn get_swift_code(
    State(state): State<AppState>,
    Path(swift_code): Path<String>,
) -> Result<Json<SwiftCodeView>, ApiError> {
    let view = state.service()?.get_code(&swift_code)?;
    Ok(Json(view))
}

/// DELETE /v1/swift-codes/:swift_code
async fn delete_swift_code(
    State(state): State<AppState>,
    Path(swift_code): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.service()?.delete_code(&swift_code)?;
    Ok(MessageResponse::new("SWIFT code data deleted successfully."))
}

/// GET /v1/swift-codes/country/:country_iso2 - All codes of a country
async fn get_country_codes(
    State(state): State<AppState>,
    Path(country_iso2): Path<String>,
) -> Result<Json<CountryGroup>, ApiError> {
    let group = state.service()?.get_country(&country_iso2)?;
    Ok(Json(group))
}

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/", post(add_swift_code))
        .route("/country/:country_iso2", get(get_country_codes))
        .route("/:swift_code", get(get_swift_code).delete(delete_swift_code))
        .with_state(state);

    Router::new()
        .route("/health", get(health_check))
        .nest("/v1/swift-codes", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request};
    use tower::ServiceExt;

    fn create_app() -> Router {
        let service = SwiftCodeService::new(SqliteStore::open_in_memory().unwrap());
        router(AppState::new(service))
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    fn payload(code: &str, is_headquarter: bool) -> serde_json::Value {
        serde_json::json!({
            "address": "Street 1",
            "bankName": "Bank A",
            "countryIS02": "PL",
            "countryName": "POLAND",
            "isHeadquarter": is_headquarter,
            "swiftCode": code,
        })
    }

    #[tokio::test]
    async fn test_add_get_delete_flow() {
        let app = create_app();

        let (status, body) = send(
            &app,
            Method::POST,
            "/v1/swift-codes",
            Some(payload("AAAABBCCXXX", true)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "SWIFT code data added successfully.");

        send(&app, Method::POST, "/v1/swift-codes", Some(payload("AAAABBCC001", false))).await;

        let (status, body) = send(&app, Method::GET, "/v1/swift-codes/AAAABBCCXXX", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["countryName"], "POLAND");
        assert_eq!(body["branches"][0]["swiftCode"], "AAAABBCC001");
        assert!(body["branches"][0].get("countryName").is_none());

        let (status, body) = send(&app, Method::DELETE, "/v1/swift-codes/AAAABBCC001", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "SWIFT code data deleted successfully.");

        let (status, body) = send(&app, Method::GET, "/v1/swift-codes/AAAABBCC001", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "SWIFT code: AAAABBCC001 not found.");
    }

    #[tokio::test]
    async fn test_duplicate_is_conflict() {
        let app = create_app();
        send(&app, Method::POST, "/v1/swift-codes", Some(payload("AAAABBCC001", false))).await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/v1/swift-codes",
            Some(payload("AAAABBCC001", false)),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["message"], "SWIFT code already exists: AAAABBCC001");
    }

    #[tokio::test]
    async fn test_invalid_payload_is_bad_request() {
        let app = create_app();
        let mut bad = payload("AAAABBCC001", false);
        bad["bankName"] = serde_json::json!("");

        let (status, body) = send(&app, Method::POST, "/v1/swift-codes", Some(bad)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["message"],
            "Invalid input SWIFT code DTO format BankBranch: Bank name is mandatory."
        );
    }

    #[tokio::test]
    async fn test_mistyped_payload_is_bad_request_with_message() {
        let app = create_app();
        let bad = serde_json::json!({"swiftCode": "AAAABBCC001", "isHeadquarter": "yes"});

        let (status, body) = send(&app, Method::POST, "/v1/swift-codes", Some(bad)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().is_some_and(|m| m.contains("isHeadquarter")));
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request_with_message() {
        let app = create_app();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/v1/swift-codes")
            .header("content-type", "application/json")
            .body(Body::from("{\"swiftCode\": "))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_country_listing() {
        let app = create_app();
        send(&app, Method::POST, "/v1/swift-codes", Some(payload("AAAABBCCXXX", true))).await;

        let (status, body) = send(&app, Method::GET, "/v1/swift-codes/country/PL", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["countryIS02"], "PL");
        assert_eq!(body["countryName"], "POLAND");
        assert_eq!(body["branches"].as_array().map(|a| a.len()), Some(1));

        let (status, body) = send(&app, Method::GET, "/v1/swift-codes/country/TT", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "No SWIFT codes found for country: TT");
    }
}
