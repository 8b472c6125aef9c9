use std::sync::Arc;

use crate::store::Store;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable persistence. Postgres in production, in-memory for demos and tests.
    pub store: Arc<dyn Store>,
}
