//! Readiness probe endpoint.
//!
//! Ready means the external link (env `link`) answered a GET. Failures are
//! counted in `errors_counter` and reported as 500.

use axum::extract::State;
use tracing::instrument;

use crate::config::READY_BODY;
use crate::error::AppError;
use crate::state::AppState;

#[instrument(name = "ready::check", skip(state))]
pub async fn ready(State(state): State<AppState>) -> Result<&'static str, AppError> {
    match state.probe.check().await {
        Ok(_) => Ok(READY_BODY),
        Err(e) => {
            state.metrics.errors().inc();
            tracing::warn!(link = %e.link, error = %e.source, "Readiness probe failed");
            Err(AppError::NotReady { link: e.link })
        }
    }
}
