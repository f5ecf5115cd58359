use std::sync::Arc;

use crate::auth::guard::SessionTokenGuard;
use crate::backend::Backend;
use crate::config::Config;
use crate::report::ReportExporter;
use crate::storage::BrowserStorage;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The analysis backend. `BackendClient` in production, a fake in tests.
    pub backend: Arc<dyn Backend>,
    /// Per-browser key-value storage (token, resume, fit-score snapshot).
    pub storage: Arc<BrowserStorage>,
    pub guard: SessionTokenGuard,
    pub report: ReportExporter,
    pub config: Config,
}
