use std::sync::Arc;

use crate::jobs::registry::JobRegistry;
use crate::llm_client::TextGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Submitted jobs. Process-lifetime, shared by every clone of the state.
    pub jobs: JobRegistry,
    /// Generation backend. `GeminiClient` in production, a stub in tests.
    pub generator: Arc<dyn TextGenerator>,
}
