//! Prometheus metrics registry.
//!
//! Holds the three demo instruments and renders them in the text exposition
//! format for `/metrics`:
//!
//! - `counter_metric` - ticks once per second from the counter emitter
//! - `errors_counter` - failed readiness probes
//! - `temperature` - 0..=99 sawtooth driven by the gauge emitter
//!
//! On Linux the process collector adds the usual `process_*` series.

use prometheus::core::Collector;
use prometheus::{Encoder, Gauge, IntCounter, Registry, TextEncoder};
use thiserror::Error;

pub const COUNTER_METRIC: &str = "counter_metric";
pub const ERRORS_COUNTER: &str = "errors_counter";
pub const TEMPERATURE: &str = "temperature";

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// Registry owning every instrument the service exports.
///
/// One instance is built at startup and shared through `AppState`; the
/// instrument handles are cheap clones backed by atomics.
pub struct MetricsRegistry {
    registry: Registry,
    counter: IntCounter,
    errors: IntCounter,
    temperature: Gauge,
}

impl MetricsRegistry {
    /// Creates the registry with all instruments registered.
    ///
    /// Fails if any name collides, which is a startup configuration error.
    pub fn new() -> Result<Self, MetricsError> {
        let metrics = Self {
            registry: Registry::new(),
            counter: IntCounter::new(COUNTER_METRIC, "Increments once per second")?,
            errors: IntCounter::new(ERRORS_COUNTER, "Failed readiness probes")?,
            temperature: Gauge::new(TEMPERATURE, "Simulated temperature sawtooth")?,
        };

        metrics.register(Box::new(metrics.counter.clone()))?;
        metrics.register(Box::new(metrics.errors.clone()))?;
        metrics.register(Box::new(metrics.temperature.clone()))?;

        #[cfg(target_os = "linux")]
        metrics.register(Box::new(
            prometheus::process_collector::ProcessCollector::for_self(),
        ))?;

        Ok(metrics)
    }

    /// Adds a collector. Registering a name twice is an error.
    pub fn register(&self, collector: Box<dyn Collector>) -> Result<(), MetricsError> {
        self.registry.register(collector)?;
        Ok(())
    }

    pub fn counter(&self) -> &IntCounter {
        &self.counter
    }

    pub fn errors(&self) -> &IntCounter {
        &self.errors
    }

    pub fn temperature(&self) -> &Gauge {
        &self.temperature
    }

    /// Content-Type of the payload returned by [`expose`](Self::expose).
    pub fn content_type(&self) -> String {
        TextEncoder::new().format_type().to_string()
    }

    /// Encodes a snapshot of every registered metric in text format.
    pub fn expose(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
