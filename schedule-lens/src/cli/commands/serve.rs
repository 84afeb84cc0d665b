//! Serve command - run the upload form web server

use crate::cli::app::ServeArgs;
use crate::server::{self, AppState};
use anyhow::{Context, Result};
use schedule_lens_core::Config;
use tokio::net::TcpListener;
use tracing::info;

pub async fn execute(args: ServeArgs, config: Config) -> Result<()> {
    let bind = args.bind.unwrap_or_else(|| config.server.bind.clone());
    let state = AppState::from_config(&config);
    let app = server::build_router(state);

    let listener = TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;
    info!("schedule-lens listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(server::wait_for_shutdown_signal())
        .await
        .context("Server failed")?;

    info!("schedule-lens stopped");
    Ok(())
}
