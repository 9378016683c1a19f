use std::sync::Arc;

use crate::config::Config;
use crate::evaluation::EvaluationEngine;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Policy, extractor and semantic scorer, fixed at startup.
    pub engine: Arc<EvaluationEngine>,
}
