//! Household API server entry point.

use anyhow::Context;
use clap::Parser;
use household_core::{core_version, init_logging};
use household_server::{router, AppState, ServerConfig};
use log::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(config.log_level(), config.log_dir.as_deref()).map_err(anyhow::Error::msg)?;

    let conn = config
        .open_store()
        .context("failed to open household store")?;
    let app = router(AppState::new(conn));

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    info!(
        "event=server_start module=http status=ok bind={} store={} version={}",
        config.bind,
        config
            .db_path
            .as_ref()
            .map_or_else(|| "memory".to_string(), |path| path.display().to_string()),
        core_version()
    );

    axum::serve(listener, app)
        .await
        .context("household server terminated")?;
    Ok(())
}
