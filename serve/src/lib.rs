//! HTTP API for nl2sql (axum).
//!
//! Listens on `NL2SQL_ADDR` (default 127.0.0.1:8000) and serves the explorer routes
//! (`/list_databases/`, `/list_tables/...`, `/list_columns/...`, `/schema/`) and the query routes
//! (`/generate_sql/`, `/execute_sql/`, `/ask/`). Every request runs the shared [`Pipeline`];
//! nothing is kept between requests.
//!
//! **Public API**: [`run_serve`], [`run_serve_on_listener`], [`build_pipeline`].

mod app;
mod response;

use std::sync::Arc;

use config::Settings;
use nl2sql::{GeminiClient, MySqlDatabase, Pipeline};
use tokio::net::TcpListener;
use tracing::info;

pub use app::router;
pub use response::ApiError;

/// Pipeline backed by MySQL and Gemini. The MySQL pool connects lazily, so the server starts
/// even when the database is down; such requests fail with a connectivity error.
pub fn build_pipeline(settings: &Settings) -> Pipeline {
    let db = Arc::new(MySqlDatabase::new(&settings.database));
    let llm = Arc::new(GeminiClient::new(&settings.gemini));
    Pipeline::from_settings(settings, db, llm)
}

/// Serves `pipeline` on an existing listener until Ctrl-C. Used by tests (bind to 127.0.0.1:0
/// then pass the listener).
pub async fn run_serve_on_listener(
    listener: TcpListener,
    pipeline: Arc<Pipeline>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = listener.local_addr()?;
    info!("HTTP server listening on http://{}", addr);

    axum::serve(listener, router(pipeline))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await?;
    Ok(())
}

/// Binds `addr` (or `settings.server.addr`) and serves the MySQL + Gemini pipeline.
pub async fn run_serve(
    settings: &Settings,
    addr: Option<&str>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = addr.unwrap_or(&settings.server.addr);
    info!(
        model = %settings.gemini.model,
        database = %settings.database.database,
        policy = ?settings.sql_policy,
        "starting nl2sql API"
    );
    let pipeline = Arc::new(build_pipeline(settings));
    let listener = TcpListener::bind(addr).await?;
    run_serve_on_listener(listener, pipeline).await
}
