//! Axum route handlers for the analysis API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::analysis::models::{AnalyzeRequest, AnalyzeResponse};
use crate::analysis::pipeline::run_analysis;
use crate::errors::AppError;
use crate::state::AppState;

/// POST /analyze
///
/// Computes BaZi, Zi Wei and Zhou Yi charts, asks the interpreter for
/// readings, and writes a PDF report. Malformed bodies are 400s, not 422s.
pub async fn handle_analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let response = run_analysis(
        state.interpreter.as_ref(),
        &state.reports,
        &state.config.public_base_url,
        request,
    )
    .await?;

    Ok(Json(response))
}
