use std::sync::Arc;

use crate::analysis::interpreter::Interpreter;
use crate::config::Config;
use crate::report::ReportWriter;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable chart interpreter. Default: LlmInterpreter.
    pub interpreter: Arc<dyn Interpreter>,
    /// Renders and stores PDF reports under `config.report_dir`.
    pub reports: ReportWriter,
}
