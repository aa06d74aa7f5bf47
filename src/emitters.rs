//! Background emitters that simulate activity on the demo instruments.
//!
//! Two independent loops, each owning one instrument:
//!
//! - the counter emitter increments `counter_metric` then sleeps (1s by default)
//! - the gauge emitter walks `temperature` through 0..=99, one step per tick
//!   (10ms by default), and starts over
//!
//! # Graceful Shutdown
//!
//! Both loops select on a cancellation token alongside their sleep and exit
//! cleanly when it fires.

use std::time::Duration;

use prometheus::{Gauge, IntCounter};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use crate::config::{EmitterConfig, GAUGE_MAX};
use crate::metrics::MetricsRegistry;

/// Increment `counter` once per `interval` until cancelled.
#[instrument(skip_all, name = "emitter.counter")]
pub async fn run_counter_emitter(
    counter: IntCounter,
    interval: Duration,
    cancel_token: CancellationToken,
) {
    info!(interval_ms = interval.as_millis() as u64, "Starting counter emitter");

    loop {
        counter.inc();

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = cancel_token.cancelled() => break,
        }
    }

    info!(value = counter.get(), "Counter emitter stopped");
}

/// Drive `gauge` through a repeating 0..=GAUGE_MAX sawtooth until cancelled.
#[instrument(skip_all, name = "emitter.gauge")]
pub async fn run_gauge_emitter(gauge: Gauge, step: Duration, cancel_token: CancellationToken) {
    info!(step_ms = step.as_millis() as u64, "Starting gauge emitter");

    'outer: loop {
        for value in 0..=GAUGE_MAX {
            gauge.set(f64::from(value));

            tokio::select! {
                _ = tokio::time::sleep(step) => {}
                _ = cancel_token.cancelled() => break 'outer,
            }
        }
    }

    info!("Gauge emitter stopped");
}

/// Handles to the running emitter tasks.
pub struct Emitters {
    cancel_token: CancellationToken,
    handles: Vec<JoinHandle<()>>,
}

impl Emitters {
    /// Spawn both emitters onto the current runtime.
    ///
    /// The tasks stop when `cancel_token` (or any parent of it) is cancelled.
    pub fn spawn(
        metrics: &MetricsRegistry,
        config: &EmitterConfig,
        cancel_token: CancellationToken,
    ) -> Self {
        let handles = vec![
            tokio::spawn(run_counter_emitter(
                metrics.counter().clone(),
                Duration::from_millis(config.counter_interval_ms),
                cancel_token.clone(),
            )),
            tokio::spawn(run_gauge_emitter(
                metrics.temperature().clone(),
                Duration::from_millis(config.gauge_step_ms),
                cancel_token.clone(),
            )),
        ];

        Self {
            cancel_token,
            handles,
        }
    }

    /// Cancel both emitters and wait for them to exit.
    pub async fn shutdown(self) {
        self.cancel_token.cancel();
        for handle in self.handles {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "Emitter task panicked");
            }
        }
    }
}
