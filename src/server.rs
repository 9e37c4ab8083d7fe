use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{debug, info};

use crate::{
    pivot::PivotTableBuilder,
    render,
    report::{InputShape, ScanReport},
    types::PortTable,
};

/// Message shown in place of the tables when a result cannot be read.
pub const FAILURE_MESSAGE: &str = "Could not read scan result";

#[derive(Clone)]
pub struct AppState {
    builder: Arc<PivotTableBuilder>,
    host_info: bool,
    shape: InputShape,
}

impl AppState {
    pub fn new(builder: PivotTableBuilder, host_info: bool) -> Self {
        Self { builder: Arc::new(builder), host_info, shape: InputShape::Auto }
    }

    /// How request bodies are split into host metadata and ports.
    pub fn shape(mut self, shape: InputShape) -> Self {
        self.shape = shape;
        self
    }
}

/// Tables plus host metadata, as returned by `POST /api/pivot` and `--format json`.
#[derive(Debug, Serialize)]
pub struct PivotResponse {
    pub host: Vec<(String, String)>,
    pub tables: Vec<PortTable>,
}

impl PivotResponse {
    /// Host metadata is left empty when `host_info` is off.
    pub fn new(report: ScanReport, tables: Vec<PortTable>, host_info: bool) -> Self {
        let host = if host_info { report.host } else { Vec::new() };
        Self { host, tables }
    }
}

/// API routes, without the static UI.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/pivot", post(post_pivot))
        .route("/render", post(post_render))
        .with_state(state);

    Router::new().nest("/api", api).layer(TraceLayer::new_for_http())
}

pub async fn spawn_server(bind: &str, state: AppState, ui_dir: PathBuf) -> Result<()> {
    let static_svc = ServeDir::new(ui_dir).append_index_html_on_directories(true);
    let app = router(state).fallback_service(static_svc);

    info!("serving UI on http://{}", bind);
    axum::serve(tokio::net::TcpListener::bind(bind).await?, app).await?;
    Ok(())
}

async fn post_pivot(State(app): State<AppState>, Json(body): Json<Value>) -> impl IntoResponse {
    let report = ScanReport::from_value_as(body, app.shape);
    let tables = app.builder.build(&report.ports);
    (StatusCode::OK, Json(PivotResponse::new(report, tables, app.host_info)))
}

async fn post_render(
    State(app): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => {
            debug!("render request rejected: {e}");
            return (e.status(), Html(render::render_failure_html(FAILURE_MESSAGE)));
        }
    };
    let report = ScanReport::from_value_as(body, app.shape);
    let tables = app.builder.build(&report.ports);
    let host = app.host_info.then_some(report.host.as_slice());
    (StatusCode::OK, Html(render::render_html(&tables, host)))
}
