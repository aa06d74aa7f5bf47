//! Sample workload: the application entry point.
//!
//! Initializes tracing, resolves configuration, registers the metrics, spawns
//! the background emitters, sets up the Axum router and runs the HTTP server
//! until a shutdown signal or a listener error.

use std::ffi::OsString;
use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sample_workload::config::{
    AppConfig, ConfigError, ListenAddress, LogFormat, DEFAULT_LOG_FILTER,
};
use sample_workload::emitters::Emitters;
use sample_workload::http::{setup_shutdown_handler, start_server};
use sample_workload::metrics::MetricsRegistry;
use sample_workload::probe::ReadinessProbe;
use sample_workload::routes::create_router;
use sample_workload::state::AppState;

/// Long options that may also be written with a single dash.
const LONG_FLAGS: &[&str] = &["listen-address", "config", "log-level", "log-format"];

/// Sample workload exposing health, readiness and metrics endpoints
#[derive(Parser, Debug)]
#[command(name = "sample-workload", version, about)]
struct Args {
    /// The address to listen on for HTTP requests [default: :8080]
    #[arg(long)]
    listen_address: Option<String>,

    /// Path to an optional TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Log level filter (e.g., "sample_workload=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,

    /// Log output format: text or json
    #[arg(long)]
    log_format: Option<String>,
}

/// Rewrite `-listen-address` style flags to `--listen-address` so single-dash
/// long options keep working.
fn normalize_flags<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            let Some(text) = arg.to_str() else {
                return arg;
            };
            let Some(rest) = text.strip_prefix('-').filter(|r| !r.starts_with('-')) else {
                return arg;
            };
            let name = rest.split_once('=').map_or(rest, |(name, _)| name);
            if LONG_FLAGS.contains(&name) {
                OsString::from(format!("-{}", text))
            } else {
                arg
            }
        })
        .collect()
}

/// Load the optional config file, apply CLI overrides, then check the
/// listen address that will actually be bound.
fn resolve_config(args: &Args) -> Result<(AppConfig, ListenAddress), ConfigError> {
    // Every section has defaults so the file is optional
    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(listen_address) = &args.listen_address {
        config.http.listen_address = listen_address.clone();
    }

    let listen_address = ListenAddress::parse(&config.http.listen_address)?;
    Ok((config, listen_address))
}

fn init_tracing(log_filter: &str, format: LogFormat) {
    let registry =
        tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(log_filter));

    match format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse_from(normalize_flags(std::env::args_os()));

    let (config, listen_address) = resolve_config(&args)?;

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
    let log_format: LogFormat = args
        .log_format
        .as_deref()
        .unwrap_or(config.logging.format.as_str())
        .parse()?;
    init_tracing(&log_filter, log_format);

    // A duplicate metric name is a startup error; nothing is served
    let metrics = Arc::new(MetricsRegistry::new()?);
    tracing::info!("Registered metrics");

    let probe = ReadinessProbe::new(&config.readiness)?;
    tracing::info!(
        env_key = %config.readiness.env_key,
        default_link = %config.readiness.default_link,
        timeout_seconds = ?config.readiness.timeout_seconds,
        "Configured readiness probe"
    );

    let shutdown = CancellationToken::new();
    setup_shutdown_handler(shutdown.clone());

    let emitters = Emitters::spawn(&metrics, &config.emitters, shutdown.child_token());

    let app = create_router(AppState::new(metrics, probe));

    tracing::info!(%listen_address, "Starting web server");
    let result = start_server(app, &listen_address, shutdown.clone()).await;

    emitters.shutdown().await;

    if let Err(e) = result {
        tracing::error!(error = %e, "HTTP server failed");
        return Err(e.into());
    }

    Ok(())
}
