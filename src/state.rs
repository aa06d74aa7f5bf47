//! Shared application state for request handlers.

use std::sync::Arc;

use crate::metrics::MetricsRegistry;
use crate::probe::ReadinessProbe;

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// Holds the metrics registry and the readiness probe client. Built once in
/// `main` and handed to the router.
#[derive(Clone)]
pub struct AppState {
    pub metrics: Arc<MetricsRegistry>,
    pub probe: ReadinessProbe,
}

impl AppState {
    pub fn new(metrics: Arc<MetricsRegistry>, probe: ReadinessProbe) -> Self {
        Self { metrics, probe }
    }
}
