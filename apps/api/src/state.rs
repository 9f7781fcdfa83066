use std::sync::Arc;

use crate::calls::registry::SessionRegistry;
use crate::config::Config;
use crate::llm_client::TextModel;
use crate::store::Store;
use crate::voice_client::VoiceProvider;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Postgres in production, in-memory when `DATABASE_URL` is unset.
    pub store: Arc<dyn Store>,
    /// Gemini in production; scripted fakes in tests.
    pub llm: Arc<dyn TextModel>,
    pub voice: Arc<dyn VoiceProvider>,
    pub sessions: SessionRegistry,
    pub config: Config,
}
