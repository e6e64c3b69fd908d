use anyhow::{Context, Result};
use std::time::Duration;

use tower_http::services::ServeDir;
use tracing::info;

use axum::{
    extract::{DefaultBodyLimit, State},
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use super::analyze_routes::analyze;
use super::covers_routes::generate_covers;
use super::metrics::metrics_handler;
use super::state::*;
use super::{log_requests, ServerConfig};

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: u64 = 64 * 1024;

#[derive(Serialize)]
struct HealthResponse {
    pub status: &'static str,
    pub uptime: String,
    pub mode: &'static str,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn health(State(state): State<ServerState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        uptime: format_uptime(state.start_time.elapsed()),
        mode: state.analysis_requestor.mode().label(),
    })
}

pub fn make_app(
    config: ServerConfig,
    upload_store: GuardedUploadStore,
    analysis_requestor: GuardedAnalysisRequestor,
    cover_requestor: GuardedCoverRequestor,
) -> Result<Router> {
    let body_limit = usize::try_from(config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES)
        .context("Upload size limit does not fit in memory address space")?;

    let state = ServerState::new(
        config.clone(),
        upload_store,
        analysis_requestor,
        cover_requestor,
    );

    let analyze_routes: Router = Router::new()
        .route("/analyze", post(analyze))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state.clone());

    let api_routes: Router = Router::new()
        .route("/generate-covers", post(generate_covers))
        .route("/health", get(health))
        .with_state(state.clone());

    let mut app: Router = analyze_routes.merge(api_routes);

    if let Some(frontend_path) = config.frontend_dir_path {
        let static_files_service =
            ServeDir::new(frontend_path).append_index_html_on_directories(true);
        app = app.fallback_service(static_files_service);
    }

    app = app.layer(middleware::from_fn_with_state(state.clone(), log_requests));

    Ok(app)
}

fn make_metrics_app() -> Router {
    Router::new().route("/metrics", get(metrics_handler))
}

pub async fn run_server(
    config: ServerConfig,
    upload_store: GuardedUploadStore,
    analysis_requestor: GuardedAnalysisRequestor,
    cover_requestor: GuardedCoverRequestor,
) -> Result<()> {
    let port = config.port;
    let metrics_port = config.metrics_port;
    let app = make_app(config, upload_store, analysis_requestor, cover_requestor)?;

    let metrics_listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", metrics_port))
        .await
        .with_context(|| format!("Failed to bind metrics port {}", metrics_port))?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(metrics_listener, make_metrics_app()).await {
            tracing::error!("Metrics server stopped: {}", e);
        }
    });

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;

    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await?;

    Ok(())
}
