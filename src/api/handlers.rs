//! HTTP handlers for the analyze endpoint

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};
use uuid::Uuid;

use super::models::{error_codes, AnalyzeMenuRequest, ApiError};
use crate::error::AnalysisError;
use crate::menu::service::{MenuAnalysis, MenuAnalysisService};
use crate::metrics::METRICS;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<MenuAnalysisService>,
}

/// Identity arrives as an `X-User-Id` header from the upstream auth proxy
fn authenticated_user(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get("X-User-Id")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v).ok())
}

/// Analyze a menu against the caller's preference profile
///
/// POST /api/v1/menus/analyze
pub async fn analyze_menu(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<AnalyzeMenuRequest>,
) -> Result<Json<MenuAnalysis>, (StatusCode, Json<ApiError>)> {
    let start = Instant::now();

    let Some(user_id) = authenticated_user(&headers) else {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ApiError::new(error_codes::UNAUTHORIZED, "Unauthorized")),
        ));
    };

    let (source, outcome) = match (&request.text, &request.image) {
        (Some(text), _) => {
            info!(%user_id, "menu analyze request: text");
            ("text", state.service.analyze_text(user_id, text).await)
        }
        (None, Some(image)) => {
            let Some(location) = &request.location else {
                METRICS.record_analyze("image", false);
                return Err((
                    StatusCode::BAD_REQUEST,
                    Json(ApiError::new(
                        error_codes::VALIDATION_ERROR,
                        "Image analysis requires a location",
                    )),
                ));
            };
            info!(%user_id, location = %location.name, "menu analyze request: image");
            (
                "image",
                state.service.analyze_image(user_id, image, location).await,
            )
        }
        (None, None) => {
            METRICS.record_analyze("none", false);
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ApiError::new(
                    error_codes::VALIDATION_ERROR,
                    "No menu text or image provided",
                )),
            ));
        }
    };

    METRICS
        .analyze_duration
        .with_label_values(&[source])
        .observe(start.elapsed().as_secs_f64());

    match outcome {
        Ok(analysis) => {
            METRICS.record_analyze(source, true);
            Ok(Json(analysis))
        }
        Err(e) => {
            METRICS.record_analyze(source, false);
            error!(%user_id, error = %e, "menu analysis failed");
            Err(map_error(e))
        }
    }
}

/// Map the error taxonomy to HTTP statuses
fn map_error(e: AnalysisError) -> (StatusCode, Json<ApiError>) {
    let (status, code) = match &e {
        AnalysisError::InvalidInput(_) => (StatusCode::BAD_REQUEST, error_codes::VALIDATION_ERROR),
        AnalysisError::Unauthorized => (StatusCode::UNAUTHORIZED, error_codes::UNAUTHORIZED),
        AnalysisError::ProfileNotFound(_) => (StatusCode::NOT_FOUND, error_codes::NOT_FOUND),
        AnalysisError::ExtractionUnavailable(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            error_codes::EXTRACTION_ERROR,
        ),
        AnalysisError::PersistenceUnavailable(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            error_codes::PERSISTENCE_ERROR,
        ),
        AnalysisError::Config(_) | AnalysisError::Internal(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            error_codes::INTERNAL_ERROR,
        ),
    };
    (status, Json(ApiError::new(code, e.to_string())))
}

/// Liveness probe
///
/// GET /health
pub async fn health() -> &'static str {
    "ok"
}

/// Prometheus text-format export
///
/// GET /metrics
pub async fn metrics() -> String {
    METRICS.export_prometheus()
}
