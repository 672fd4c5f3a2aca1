mod analysis;
mod calendar;
mod config;
mod divination;
mod errors;
mod llm_client;
mod report;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::interpreter::LlmInterpreter;
use crate::config::Config;
use crate::llm_client::{LlmClient, LlmConfig};
use crate::report::{ReportFont, ReportWriter};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Fortune API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(LlmConfig::new(
        config.llm_api_key.clone(),
        config.llm_base_url.clone(),
        config.llm_model.clone(),
    ))?;
    info!(
        "LLM client initialized (model: {}, endpoint: {})",
        llm.model(),
        config.llm_base_url
    );
    let interpreter = Arc::new(LlmInterpreter::new(llm));

    // Initialize report storage (fails without a CJK-capable font)
    let font = ReportFont::discover(config.report_font_path.as_deref())?;
    info!("Report font: {}", font.path().display());
    let reports = ReportWriter::new(config.report_dir.clone(), font)
        .with_retention(config.report_retention);
    reports.ensure_dir().await?;
    reports.prune_expired().await?;
    match config.report_retention {
        Some(retention) => info!(
            "Reports stored in {} for {}h",
            config.report_dir.display(),
            retention.as_secs() / 3600
        ),
        None => info!("Reports stored in {} indefinitely", config.report_dir.display()),
    }

    // Build app state
    let state = AppState {
        config: config.clone(),
        interpreter,
        reports,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
