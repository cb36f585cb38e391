//! Routes for the sheetform API.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sheetform_core::{EventColors, NewRow, ParsedSheet, SheetKind};
use sheetform_http::{load_sheet, submit_row, ClientError, Config, SheetsApi, Submission};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    api: Arc<dyn SheetsApi>,
    config: Arc<Config>,
    /// Event colors picked by users, kept for the life of the process.
    colors: Arc<Mutex<EventColors>>,
}

impl AppState {
    pub fn new(api: Arc<dyn SheetsApi>, config: Config) -> Self {
        Self {
            api,
            config: Arc::new(config),
            colors: Arc::new(Mutex::new(EventColors::new())),
        }
    }
}

/// Health check response.
#[derive(Serialize, Deserialize)]
pub struct Health {
    /// Server status ("ok" when healthy).
    pub status: String,
    /// Server version from Cargo.toml.
    pub version: String,
}

/// A parsed sheet as returned by `GET /api/sheets/{kind}`.
#[derive(Serialize)]
pub struct SheetView {
    pub kind: SheetKind,
    pub title: String,
    #[serde(flatten)]
    pub sheet: ParsedSheet,
    /// Suggested NO for the next theater row.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_number: Option<u64>,
}

/// Error body returned by the API.
#[derive(Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_applied: Option<usize>,
}

/// Failures mapped to HTTP statuses.
pub enum ApiError {
    Client(ClientError),
    BadRequest(String),
}

impl From<ClientError> for ApiError {
    fn from(error: ClientError) -> Self {
        ApiError::Client(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(error) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error,
                    last_applied: None,
                },
            ),
            ApiError::Client(error) => {
                let status = match &error {
                    ClientError::Schedule(e) if e.is_layout_error() => {
                        StatusCode::UNPROCESSABLE_ENTITY
                    }
                    ClientError::Schedule(_) => StatusCode::BAD_REQUEST,
                    ClientError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
                    _ => StatusCode::BAD_GATEWAY,
                };
                if status.is_server_error() {
                    tracing::error!(%error, "request failed");
                }
                (
                    status,
                    ErrorBody {
                        error: error.to_string(),
                        last_applied: error.last_applied(),
                    },
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

/// Health check endpoint handler.
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Fetch and parse one schedule.
pub async fn get_sheet(
    State(state): State<AppState>,
    Path(kind): Path<SheetKind>,
) -> Result<Json<SheetView>, ApiError> {
    let title = state.config.title(kind).to_string();
    let sheet = load_sheet(
        state.api.as_ref(),
        &title,
        &kind.schema(),
        &state.config.layout,
    )
    .await?;
    let next_number = (kind == SheetKind::Theater).then(|| sheet.next_number());

    Ok(Json(SheetView {
        kind,
        title,
        sheet,
        next_number,
    }))
}

/// Validate and write a new row. The body holds the row's fields.
pub async fn add_row(
    State(state): State<AppState>,
    Path(kind): Path<SheetKind>,
    Json(body): Json<JsonValue>,
) -> Result<(StatusCode, Json<Submission>), ApiError> {
    let row = match kind {
        SheetKind::Theater => serde_json::from_value(body).map(NewRow::Theater),
        SheetKind::VideoCall => serde_json::from_value(body).map(NewRow::VideoCall),
    }
    .map_err(|e| ApiError::BadRequest(format!("Invalid row: {e}")))?;

    let title = state.config.title(kind);
    let mut colors = state.colors.lock().await;
    let submission = submit_row(
        state.api.as_ref(),
        title,
        &state.config.layout,
        &row,
        &mut colors,
    )
    .await?;
    tracing::info!(sheet = title, steps = submission.applied, "{}", submission.message);

    Ok((StatusCode::CREATED, Json(submission)))
}

/// Current event color table.
pub async fn get_colors(State(state): State<AppState>) -> Json<EventColors> {
    Json(state.colors.lock().await.clone())
}

/// Create the application router.
///
/// This is separated from `main()` to allow testing.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/sheets/:kind", get(get_sheet))
        .route("/api/sheets/:kind/rows", axum::routing::post(add_row))
        .route("/api/colors", get(get_colors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
