//! Single-page web front end
//!
//! One form, one upload at a time per browser session. Each session is
//! identified by a cookie and holds at most one analysis.

mod handlers;
mod middleware;
mod sessions;

#[cfg(test)]
mod tests;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use schedule_lens_core::{Config, Pipeline};
use sessions::SessionStore;
use std::sync::Arc;

pub const SESSION_COOKIE: &str = "sl_session";

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Pipeline,
    pub sessions: Arc<SessionStore>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(pipeline: Pipeline, max_sessions: usize, max_upload_bytes: usize) -> Self {
        Self {
            pipeline,
            sessions: Arc::new(SessionStore::new(max_sessions)),
            max_upload_bytes,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.pipeline(),
            config.server.max_sessions,
            config.server.max_upload_bytes,
        )
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index_handler))
        .route("/analyze", post(handlers::analyze_handler))
        .route("/reset", post(handlers::reset_handler))
        .route("/healthz", get(handlers::healthz_handler))
        .layer(axum::middleware::from_fn(middleware::request_tracing_middleware))
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .with_state(state)
}

pub async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        let (Ok(mut sigterm), Ok(mut sigint)) = (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) else {
            let _ = tokio::signal::ctrl_c().await;
            return;
        };
        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigint.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
