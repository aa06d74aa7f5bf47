//! HTTP server startup logic.

use std::future::IntoFuture;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::config::{ListenAddress, SHUTDOWN_GRACE_SECS};

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Bind the first usable address for `addr`.
///
/// A `:port` address tries the dual-stack `[::]` first and falls back to
/// `0.0.0.0` on hosts without IPv6. An address already in use is not retried.
pub async fn bind(addr: &ListenAddress) -> Result<TcpListener, ServerError> {
    let mut last_error = None;

    for candidate in addr.bind_candidates() {
        match TcpListener::bind(&candidate).await {
            Ok(listener) => return Ok(listener),
            Err(source) if source.kind() == std::io::ErrorKind::AddrInUse => {
                return Err(ServerError::Bind {
                    addr: candidate,
                    source,
                });
            }
            Err(source) => {
                tracing::debug!(addr = %candidate, error = %source, "Bind failed, trying next address");
                last_error = Some(ServerError::Bind {
                    addr: candidate,
                    source,
                });
            }
        }
    }

    Err(last_error.unwrap_or_else(|| ServerError::Bind {
        addr: addr.to_string(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "no address to bind"),
    }))
}

/// Bind `addr` and serve `app` until `shutdown` is cancelled.
///
/// This function blocks until the server shuts down.
pub async fn start_server(
    app: Router,
    addr: &ListenAddress,
    shutdown: CancellationToken,
) -> Result<(), ServerError> {
    let listener = bind(addr).await?;
    serve(listener, app, shutdown).await
}

/// Serve `app` on an already-bound listener.
///
/// After `shutdown` fires, in-flight requests get a grace period to finish;
/// requests still running after that (a `/ready` stuck on an unresponsive
/// target, say) are dropped.
pub async fn serve(
    listener: TcpListener,
    app: Router,
    shutdown: CancellationToken,
) -> Result<(), ServerError> {
    let local_addr = listener.local_addr()?;
    tracing::info!(%local_addr, "Starting HTTP server");

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.clone().cancelled_owned())
        .into_future();

    let grace_expired = async {
        shutdown.cancelled().await;
        tokio::time::sleep(Duration::from_secs(SHUTDOWN_GRACE_SECS)).await;
    };

    tokio::select! {
        result = server => result?,
        _ = grace_expired => {
            tracing::warn!(
                grace_secs = SHUTDOWN_GRACE_SECS,
                "Grace period elapsed, dropping remaining connections"
            );
        }
    }

    tracing::info!("HTTP server stopped");
    Ok(())
}
