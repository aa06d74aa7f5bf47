//! Sample workload for container orchestration platforms.
//!
//! Serves a greeting, a static liveness probe, a readiness probe that checks an
//! external link, and Prometheus metrics fed by two background emitters.

pub mod config;
pub mod emitters;
pub mod error;
pub mod http;
pub mod metrics;
pub mod middleware;
pub mod probe;
pub mod routes;
pub mod state;

pub use error::AppError;
