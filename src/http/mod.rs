//! HTTP surface: axum router, request parsing and response mapping.

pub mod error;
pub mod routes;

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::application::LedgerService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Ledger operations over the connection pool.
    pub ledger: Arc<LedgerService>,
    /// Directory where report downloads are staged before streaming.
    pub staging_dir: PathBuf,
}

impl AppState {
    pub fn new(ledger: LedgerService, staging_dir: impl Into<PathBuf>) -> Self {
        Self {
            ledger: Arc::new(ledger),
            staging_dir: staging_dir.into(),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    routes::routes()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
