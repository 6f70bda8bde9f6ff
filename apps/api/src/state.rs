use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::Embedder;
use crate::review::reviewer::CodeReviewer;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Embedding backend for resume/JD similarity. Default: the Gemini `LlmClient`.
    pub embedder: Arc<dyn Embedder>,
    pub reviewer: CodeReviewer,
}
