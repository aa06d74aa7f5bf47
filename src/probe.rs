//! Outbound readiness probe.
//!
//! `/ready` reports ready when a GET to an external link gets any response at
//! all. The link is looked up in the environment on every call so it can be
//! changed without a restart. The response status is not inspected.

use std::time::Duration;

use crate::config::ReadinessConfig;

#[derive(Debug, thiserror::Error)]
#[error("readiness target {link} unreachable: {source}")]
pub struct ProbeError {
    pub link: String,
    #[source]
    pub source: reqwest::Error,
}

/// Pick the probe target from an environment value, treating empty as unset.
pub fn resolve_link(env_value: Option<String>, default_link: &str) -> String {
    match env_value {
        Some(link) if !link.is_empty() => link,
        _ => default_link.to_string(),
    }
}

/// HTTP client plus the rules for picking the probe target.
#[derive(Clone)]
pub struct ReadinessProbe {
    client: reqwest::Client,
    env_key: String,
    default_link: String,
}

impl ReadinessProbe {
    pub fn new(config: &ReadinessConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            env_key: config.env_key.clone(),
            default_link: config.default_link.clone(),
        })
    }

    /// Current probe target: the environment value, or the default when the
    /// variable is unset or empty.
    pub fn target(&self) -> String {
        resolve_link(std::env::var(&self.env_key).ok(), &self.default_link)
    }

    /// Probe the current target once.
    ///
    /// Returns the link that was probed so callers can report it.
    pub async fn check(&self) -> Result<String, ProbeError> {
        let link = self.target();

        match self.client.get(&link).send().await {
            // Dropping the response releases the connection; the body is never read
            Ok(response) => {
                tracing::debug!(link = %link, status = response.status().as_u16(), "Readiness target responded");
                Ok(link)
            }
            Err(source) => Err(ProbeError { link, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Environment variable no test sets
    const UNSET_ENV_KEY: &str = "SAMPLE_WORKLOAD_PROBE_LINK_UNSET";
    const DEFAULT: &str = "https://google.com";

    fn probe_with_link(default_link: &str) -> ReadinessProbe {
        let config = ReadinessConfig {
            default_link: default_link.to_string(),
            env_key: UNSET_ENV_KEY.to_string(),
            ..ReadinessConfig::default()
        };
        ReadinessProbe::new(&config).unwrap()
    }

    #[test]
    fn test_resolve_link_prefers_environment() {
        assert_eq!(
            resolve_link(Some("http://svc.invalid".to_string()), DEFAULT),
            "http://svc.invalid"
        );
    }

    #[test]
    fn test_resolve_link_defaults_when_unset_or_empty() {
        assert_eq!(resolve_link(None, DEFAULT), DEFAULT);
        assert_eq!(resolve_link(Some(String::new()), DEFAULT), DEFAULT);
    }

    #[test]
    fn test_target_defaults_when_env_unset() {
        let probe = ReadinessProbe::new(&ReadinessConfig {
            env_key: UNSET_ENV_KEY.to_string(),
            ..ReadinessConfig::default()
        })
        .unwrap();
        assert_eq!(probe.target(), "https://google.com");
    }

    #[tokio::test]
    async fn test_check_unreachable_target_fails() {
        let probe = probe_with_link("http://127.0.0.1:1");

        let err = probe.check().await.unwrap_err();
        assert_eq!(err.link, "http://127.0.0.1:1");
        assert!(err.to_string().contains("http://127.0.0.1:1"));
    }

    #[tokio::test]
    async fn test_check_malformed_target_fails() {
        let probe = probe_with_link("not a url");
        assert!(probe.check().await.is_err());
    }

    #[test]
    fn test_client_builds_with_timeout() {
        let probe = ReadinessProbe::new(&ReadinessConfig {
            timeout_seconds: Some(5),
            ..ReadinessConfig::default()
        });
        assert!(probe.is_ok());
    }
}
