//! HTTP route handlers.
//!
//! Four endpoints: the greeting on `/` (also the fallback for any other path),
//! liveness on `/health`, readiness on `/ready` and the Prometheus scrape on
//! `/metrics`. Probe and scrape responses carry `Cache-Control: no-store`.
//! Every route answers any method, the same as the fallback.
//!
//! Request tracing is enabled via middleware that generates a unique request ID
//! for each incoming request, allowing correlation of all logs within a request.

pub mod health;
pub mod home;
pub mod metrics;
pub mod ready;

use axum::{middleware, routing::any, Router};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::CACHE_CONTROL_NO_STORE;
use crate::middleware::request_id_layer;
use crate::state::AppState;

/// Creates the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    // Probes and scrapes - never cached, always a fresh answer
    let probe_routes = Router::new()
        .route("/health", any(health::health))
        .route("/ready", any(ready::ready))
        .route("/metrics", any(metrics::metrics))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_NO_STORE),
        ));

    Router::new()
        .route("/", any(home::index))
        .merge(probe_routes)
        .fallback(home::index)
        .with_state(state)
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;
    use crate::config::ReadinessConfig;
    use crate::metrics::MetricsRegistry;
    use crate::probe::ReadinessProbe;

    /// Environment variable no test sets, so the probe always uses `default_link`
    const UNSET_ENV_KEY: &str = "SAMPLE_WORKLOAD_ROUTES_LINK_UNSET";

    fn test_state_with_link(default_link: &str) -> AppState {
        let config = ReadinessConfig {
            default_link: default_link.to_string(),
            env_key: UNSET_ENV_KEY.to_string(),
            ..ReadinessConfig::default()
        };
        AppState::new(
            Arc::new(MetricsRegistry::new().unwrap()),
            ReadinessProbe::new(&config).unwrap(),
        )
    }

    fn test_state() -> AppState {
        test_state_with_link("http://127.0.0.1:1")
    }

    async fn send(
        router: Router,
        method: Method,
        path: &str,
    ) -> (StatusCode, http::HeaderMap, String) {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, headers, String::from_utf8(body.to_vec()).unwrap())
    }

    async fn get(router: Router, path: &str) -> (StatusCode, http::HeaderMap, String) {
        send(router, Method::GET, path).await
    }

    #[tokio::test]
    async fn test_root_greets() {
        let router = create_router(test_state());
        let (status, _, body) = get(router, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Hello world!");
    }

    #[tokio::test]
    async fn test_unknown_path_falls_back_to_greeting() {
        let router = create_router(test_state());
        let (status, _, body) = get(router, "/some/other/path").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Hello world!");
    }

    #[tokio::test]
    async fn test_every_method_is_answered() {
        let router = create_router(test_state());

        for path in ["/", "/other", "/health", "/metrics"] {
            for method in [Method::POST, Method::PUT, Method::DELETE] {
                let (status, _, _) = send(router.clone(), method.clone(), path).await;
                assert_eq!(status, StatusCode::OK, "{} {}", method, path);
            }
        }

        let (_, _, body) = send(router.clone(), Method::POST, "/").await;
        assert_eq!(body, "Hello world!");
        let (_, _, body) = send(router, Method::POST, "/health").await;
        assert_eq!(body, "{Status: OK}");
    }

    #[tokio::test]
    async fn test_health_literal_body() {
        let router = create_router(test_state());
        let (status, headers, body) = get(router, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "{Status: OK}");
        assert_eq!(headers.get(CACHE_CONTROL).unwrap(), "no-store");
    }

    #[tokio::test]
    async fn test_root_and_health_leave_metrics_untouched() {
        let state = test_state();
        let metrics = state.metrics.clone();
        let router = create_router(state);

        for _ in 0..5 {
            get(router.clone(), "/").await;
            get(router.clone(), "/health").await;
        }

        assert_eq!(metrics.counter().get(), 0);
        assert_eq!(metrics.errors().get(), 0);
        assert_eq!(metrics.temperature().get(), 0.0);
    }

    #[tokio::test]
    async fn test_ready_failure_counts_error() {
        let state = test_state_with_link("http://127.0.0.1:1");
        let metrics = state.metrics.clone();
        let router = create_router(state);

        let (status, _, body) = get(router.clone(), "/ready").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "500 Not ready, http://127.0.0.1:1 is down!");
        assert_eq!(metrics.errors().get(), 1);

        get(router, "/ready").await;
        assert_eq!(metrics.errors().get(), 2);
    }

    #[tokio::test]
    async fn test_metrics_exposition() {
        let state = test_state();
        state.metrics.counter().inc();
        state.metrics.temperature().set(17.0);
        let router = create_router(state);

        let (status, headers, body) = get(router, "/metrics").await;
        assert_eq!(status, StatusCode::OK);
        assert!(headers
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("text/plain")));
        assert!(body.lines().any(|l| l == "counter_metric 1"));
        assert!(body.lines().any(|l| l == "errors_counter 0"));
        assert!(body.lines().any(|l| l == "temperature 17"));
    }
}
