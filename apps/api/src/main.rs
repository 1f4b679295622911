mod catalog;
mod config;
mod docx;
mod errors;
mod fill;
mod generation;
mod jobs;
mod llm_client;
mod routes;
mod state;
mod template;
mod transcript;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::catalog::SectionCatalog;
use crate::config::Config;
use crate::generation::LlmContentGenerator;
use crate::jobs::{spawn_retention_task, JobStore, RETENTION_SWEEP_PERIOD};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting report-autofill v{}", env!("CARGO_PKG_VERSION"));

    // Section catalog: file override or the built-in strategy plan sections
    let catalog = match &config.section_catalog_path {
        Some(path) => SectionCatalog::load(path)
            .with_context(|| format!("Failed to load section catalog from {}", path.display()))?,
        None => SectionCatalog::builtin(),
    };
    info!("Section catalog loaded ({} sections)", catalog.len());

    // Initialize LLM client
    let llm = LlmClient::new(
        config.openai_api_key.clone(),
        config.openai_base_url.clone(),
        config.openai_model.clone(),
    )
    .context("Failed to build LLM client")?;
    info!("LLM client initialized (model: {})", llm.model());

    let generator = Arc::new(LlmContentGenerator::new(llm, config.max_transcript_chars));

    // Finished jobs are kept for JOB_RETENTION_SECS, then swept
    let jobs = JobStore::with_retention(config.job_retention);
    spawn_retention_task(jobs.clone(), RETENTION_SWEEP_PERIOD);
    info!("Job retention: {}s", config.job_retention.as_secs());

    // Build app state
    let state = AppState {
        config: config.clone(),
        catalog: Arc::new(catalog),
        generator,
        jobs,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the upload UI has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
