mod auth;
mod backend;
mod config;
mod dashboard;
mod errors;
mod input;
mod models;
mod report;
mod routes;
mod state;
mod storage;
#[cfg(test)]
mod testing;
mod views;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::guard::SessionTokenGuard;
use crate::backend::BackendClient;
use crate::config::Config;
use crate::report::ReportExporter;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::BrowserStorage;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_PKG_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resumatch web v{}", env!("CARGO_PKG_VERSION"));

    let backend = BackendClient::new(
        &config.backend_url,
        Duration::from_secs(config.backend_timeout_secs),
    )?;
    info!("Backend client initialized ({})", config.backend_url);

    if config.skip_token_check {
        warn!("SKIP_TOKEN_CHECK is set: protected screens are open to everyone");
    }

    let state = AppState {
        backend: Arc::new(backend),
        storage: Arc::new(BrowserStorage::default()),
        guard: SessionTokenGuard::new(!config.skip_token_check),
        report: ReportExporter::default(),
        config: config.clone(),
    };

    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
