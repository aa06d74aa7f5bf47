//! Prometheus scrape endpoint.

use axum::{extract::State, http::header::CONTENT_TYPE, response::IntoResponse};

use crate::error::AppError;
use crate::state::AppState;

/// Handler for GET /metrics
///
/// Returns every registered instrument in the text exposition format:
/// ```text
/// # HELP counter_metric Increments once per second
/// # TYPE counter_metric counter
/// counter_metric 42
/// ```
pub async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let body = state.metrics.expose()?;
    Ok(([(CONTENT_TYPE, state.metrics.content_type())], body))
}
