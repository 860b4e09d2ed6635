//! # HTTP API Module
//!
//! JSON-over-HTTP access to the progress model.
//!
//! Endpoints:
//! - `GET  /health`               - liveness
//! - `POST /progress`             - full progress report
//! - `POST /progress/next`        - next incomplete lecture
//! - `POST /certificates`         - generate a certificate identifier
//! - `POST /certificates/format`  - display form of an identifier
//!
//! Course and progress bodies are decoded leniently: a malformed structure is
//! the empty case, never an error.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use lectern_core::{
    Clock, CountingMode, LecternError, LecturePosition, ProgressCalculator, ProgressReport,
    SystemClock, format_value_for_display, generate, optional_course, optional_progress,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// =============================================================================
// CONFIGURATION & STATE
// =============================================================================

/// Default bind host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default bind port.
pub const DEFAULT_PORT: u16 = 8080;

/// Server bind configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// Bind a listener. The host may be an IP literal or a resolvable name.
    pub async fn bind(&self) -> Result<TcpListener, ApiError> {
        TcpListener::bind((self.host.as_str(), self.port))
            .await
            .map_err(|e| {
                ApiError::Config(format!("cannot bind {}:{}: {}", self.host, self.port, e))
            })
    }
}

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    clock: Arc<dyn Clock>,
}

impl AppState {
    /// State backed by the wall clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// State with an injected clock.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// Errors returned by the HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<LecternError> for ApiError {
    fn from(err: LecternError) -> Self {
        match err {
            LecternError::InvalidArgument(msg) => Self::BadRequest(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Config(_) | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

// =============================================================================
// REQUEST / RESPONSE TYPES
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRequest {
    #[serde(default)]
    pub course: Value,
    #[serde(default)]
    pub progress: Value,
    #[serde(default)]
    pub counting_mode: Option<CountingMode>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NextLectureResponse {
    pub next: Option<LecturePosition>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRequest {
    #[serde(default)]
    pub learner_id: String,
    #[serde(default)]
    pub course_id: String,
    /// Milliseconds since the Unix epoch; defaults to now.
    #[serde(default)]
    pub issued_at: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateResponse {
    pub certificate_id: String,
    pub display: String,
    pub issued_at: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatRequest {
    #[serde(default)]
    pub certificate_id: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FormatResponse {
    pub display: String,
}

// =============================================================================
// HANDLERS
// =============================================================================

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn progress_report(Json(req): Json<ProgressRequest>) -> Json<ProgressReport> {
    let course = optional_course(&req.course);
    let progress = optional_progress(&req.progress);
    let calculator = ProgressCalculator::with_mode(req.counting_mode.unwrap_or_default());

    let report = ProgressReport::build(course.as_ref(), progress.as_ref(), &calculator);
    tracing::debug!(
        percentage = report.percentage,
        completed = report.completed,
        "progress report"
    );
    Json(report)
}

async fn next_lecture(Json(req): Json<ProgressRequest>) -> Json<NextLectureResponse> {
    let course = optional_course(&req.course);
    let progress = optional_progress(&req.progress);
    let next = ProgressCalculator::new().next_incomplete_lecture(course.as_ref(), progress.as_ref());
    Json(NextLectureResponse { next })
}

async fn issue_certificate(
    State(state): State<AppState>,
    Json(req): Json<CertificateRequest>,
) -> Result<Json<CertificateResponse>, ApiError> {
    let issued_at = req.issued_at.unwrap_or_else(|| state.clock.now_millis());
    let id = generate(&req.learner_id, &req.course_id, issued_at).inspect_err(|e| {
        tracing::warn!(error = %e, "rejected certificate request");
    })?;

    tracing::info!(certificate = %id, issued_at, "issued certificate id");

    Ok(Json(CertificateResponse {
        display: id.display(),
        certificate_id: id.into_inner(),
        issued_at,
    }))
}

async fn format_certificate(Json(req): Json<FormatRequest>) -> Json<FormatResponse> {
    Json(FormatResponse {
        display: format_value_for_display(&req.certificate_id),
    })
}

// =============================================================================
// ROUTER & SERVER
// =============================================================================

/// Build the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/progress", post(progress_report))
        .route("/progress/next", post(next_lecture))
        .route("/certificates", post(issue_certificate))
        .route("/certificates/format", post(format_certificate))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Bind and serve until Ctrl-C.
pub async fn serve(config: ServerConfig) -> Result<(), ApiError> {
    let listener = config.bind().await?;
    let addr = listener.local_addr()?;
    tracing::info!(%addr, host = %config.host, "lectern listening");

    axum::serve(listener, create_router(AppState::new()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("lectern stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
