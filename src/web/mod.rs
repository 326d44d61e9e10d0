//! Web server for the dashboard.
//!
//! Serves the assembled page and runs its event handlers.
//!
//! # Endpoints
//!
//! - `GET /` - The rendered dashboard page
//! - `GET /health` - Health check
//! - `GET /api/tabs` - Tabs, their widgets and the event bindings
//! - `POST /api/events/{binding}` - Run an event handler
//! - `GET /assets/{*path}` - Embedded client script and stylesheet
//! - `GET /static/{*path}` - Files from `[StaticPaths] IMAGES`, if configured

pub mod static_files;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::{Settings, StaticPaths};
use crate::ui::{render, Binding, Blocks, EventError, WidgetId, WidgetUpdate};

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for the web server.
#[derive(Clone)]
pub struct AppState {
    /// Assembled page (immutable after startup)
    blocks: Arc<Blocks>,
    /// Page HTML, rendered once
    page: Arc<str>,
    /// Directory served under `/static`
    static_dir: Option<PathBuf>,
}

impl AppState {
    /// Creates the state for an assembled page.
    ///
    /// `[StaticPaths] IMAGES` is resolved against the configuration file's
    /// directory.
    pub fn new(blocks: Blocks, settings: &Settings) -> anyhow::Result<Self> {
        let paths: StaticPaths = settings.section_or_default("StaticPaths")?;
        let static_dir = paths.images.map(|dir| settings.resolve_path(&dir));

        let page = render::page(&blocks);
        Ok(Self {
            blocks: Arc::new(blocks),
            page: page.into(),
            static_dir,
        })
    }

    /// The assembled page.
    #[must_use]
    pub fn blocks(&self) -> &Blocks {
        &self.blocks
    }

    /// Directory served under `/static`.
    #[must_use]
    pub fn static_dir(&self) -> Option<&PathBuf> {
        self.static_dir.as_ref()
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Current health status (e.g., "healthy").
    pub status: String,
    /// Application version.
    pub version: String,
}

/// Tab listing response.
#[derive(Debug, Serialize)]
pub struct TabsResponse {
    /// Page title.
    pub title: String,
    /// Tabs in display order.
    pub tabs: Vec<TabInfo>,
    /// Event bindings.
    pub bindings: Vec<Binding>,
}

/// One tab and its widgets.
#[derive(Debug, Serialize)]
pub struct TabInfo {
    /// Tab title.
    pub title: String,
    /// Widgets in display order.
    pub widgets: Vec<WidgetInfo>,
}

/// Widget summary.
#[derive(Debug, Serialize)]
pub struct WidgetInfo {
    /// Widget handle.
    pub id: WidgetId,
    /// Widget kind (e.g., "textbox").
    pub kind: String,
}

/// Event request: current values of the binding's inputs.
#[derive(Debug, Default, Deserialize)]
pub struct EventRequest {
    /// One value per declared input, in order.
    #[serde(default)]
    pub inputs: Vec<Value>,
}

/// Event response: one update per declared output.
#[derive(Debug, Serialize)]
pub struct EventResponse {
    /// Updates in output order.
    pub updates: Vec<WidgetUpdate>,
}

/// API error response.
#[derive(Debug, Serialize)]
pub struct ApiError {
    /// Error message.
    pub error: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

/// Maps an event dispatch failure to a status code and error body.
fn event_error_response(err: EventError) -> (StatusCode, Json<ApiError>) {
    let status = match err {
        EventError::UnknownBinding(_) => StatusCode::NOT_FOUND,
        EventError::InputCount { .. } => StatusCode::BAD_REQUEST,
        EventError::OutputCount { .. } | EventError::Handler(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::with_details(
                    "Event handler failed",
                    err.to_string(),
                )),
            );
        }
    };
    (status, Json(ApiError::new(err.to_string())))
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET / - The dashboard page.
async fn index(State(state): State<AppState>) -> Html<String> {
    Html(state.page.to_string())
}

/// GET /health - Health check endpoint.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /api/tabs - Tabs, widgets and bindings of the page.
async fn list_tabs(State(state): State<AppState>) -> Json<TabsResponse> {
    let blocks = &state.blocks;
    let tabs = blocks
        .tabs()
        .iter()
        .map(|tab| TabInfo {
            title: tab.title.clone(),
            widgets: tab
                .children
                .iter()
                .filter_map(|id| {
                    blocks.widget(*id).map(|w| WidgetInfo {
                        id: *id,
                        kind: w.kind().to_string(),
                    })
                })
                .collect(),
        })
        .collect();

    Json(TabsResponse {
        title: blocks.title().to_string(),
        tabs,
        bindings: blocks.bindings().to_vec(),
    })
}

/// POST /api/events/{binding} - Run an event handler.
async fn dispatch_event(
    State(state): State<AppState>,
    Path(binding): Path<usize>,
    Json(request): Json<EventRequest>,
) -> Result<Json<EventResponse>, (StatusCode, Json<ApiError>)> {
    let updates = state.blocks.dispatch(binding, &request.inputs).map_err(|e| {
        warn!(binding, error = %e, "Event dispatch failed");
        event_error_response(e)
    })?;

    Ok(Json(EventResponse { updates }))
}

// ============================================================================
// Router Setup
// ============================================================================

/// Creates the router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    // The server is meant to run on the user's machine, so any origin is allowed.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/api/tabs", get(list_tabs))
        .route("/api/events/{binding}", post(dispatch_event))
        .route("/assets/{*path}", get(static_files::serve_asset));

    if let Some(dir) = state.static_dir() {
        router = router.nest_service("/static", ServeDir::new(dir));
    }

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Runs the web server.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or serving fails.
pub async fn run_server(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let app = create_router(state);

    info!("Starting dashboard on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
