//! Health check endpoint for container orchestration.
//!
//! Provides a simple liveness probe that returns 200 OK when the process is running.
//! Used by Kubernetes and load balancers to verify the service is alive.

use crate::config::HEALTH_BODY;

/// Health check handler.
///
/// This is a liveness probe - it only checks that the process can respond to HTTP.
/// The body is a fixed literal, not JSON.
pub async fn health() -> &'static str {
    HEALTH_BODY
}
