use std::sync::Arc;

use crate::llm_client::ModelGateway;
use crate::review::pipeline::ReviewSettings;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Holds no per-request data; every review runs on its own inputs.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable model backend, selected by `LLM_PROVIDER` at startup.
    pub gateway: Arc<dyn ModelGateway>,
    pub settings: ReviewSettings,
}
