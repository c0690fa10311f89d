use std::sync::Arc;

use sqlx::PgPool;

use crate::interview::pipeline::InterviewPipeline;
use crate::interview::store::InterviewStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Interview orchestrator over injected capabilities (meeting provider,
    /// LLM backend, record store) — no module-level singletons.
    pub pipeline: Arc<InterviewPipeline>,
    /// Direct store access for read-only interview queries.
    pub interviews: Arc<dyn InterviewStore>,
}
