mod assessment;
mod config;
mod db;
mod errors;
mod interview;
mod llm_client;
mod meeting;
mod routes;
mod state;

use std::sync::Arc;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::interview::pipeline::InterviewPipeline;
use crate::interview::store::PgInterviewStore;
use crate::llm_client::OpenAiClient;
use crate::meeting::zoom::ZoomClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (panics on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Hireflow API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize the meeting provider
    let meetings = Arc::new(ZoomClient::new(config.zoom_api_token.clone()));
    info!("Zoom client initialized");

    // Initialize LLM client
    let llm = Arc::new(OpenAiClient::new(config.openai_api_key.clone()));
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Wire the pipeline over its capability interfaces
    let interviews = Arc::new(PgInterviewStore::new(db.clone()));
    let pipeline = Arc::new(InterviewPipeline::new(
        interviews.clone(),
        meetings,
        llm,
    ));

    // Build app state
    let state = AppState {
        db,
        pipeline,
        interviews,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
