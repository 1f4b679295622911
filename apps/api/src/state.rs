use std::sync::Arc;

use crate::catalog::SectionCatalog;
use crate::config::Config;
use crate::generation::ContentGenerator;
use crate::jobs::JobStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Catalog used when an upload does not carry its own.
    pub catalog: Arc<SectionCatalog>,
    /// Pluggable generator. Default: LlmContentGenerator.
    pub generator: Arc<dyn ContentGenerator>,
    pub jobs: JobStore,
}
