use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::metrics::MetricsError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("500 Not ready, {link} is down!")]
    NotReady { link: String },

    #[error("Metrics encoding error: {0}")]
    Metrics(#[from] MetricsError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            // Body text is the probe contract; callers match on it
            AppError::NotReady { .. } => self.to_string(),
            AppError::Metrics(_) => {
                tracing::error!("Internal error: {:?}", self);
                "Internal server error".to_string()
            }
        };

        (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
    }
}
