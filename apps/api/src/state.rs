use std::sync::Arc;

use crate::config::Config;
use crate::text::extractor::{TermExtractor, TfIdfExtractor};

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup; requests never mutate it.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable term extractor. Default: TfIdfExtractor.
    pub extractor: Arc<dyn TermExtractor>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        AppState {
            config,
            extractor: Arc::new(TfIdfExtractor),
        }
    }
}
