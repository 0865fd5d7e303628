use std::env;
use std::time::Duration;

use reqwest::Proxy;
use serde_json::Value;
use tracing::warn;

/// Raw reply from a provider endpoint. Status classification happens in the provider.
#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub const PROXY_URL_ENV: &str = "AI_TUTOR_PROXY_URL";
pub const POOL_MAX_IDLE_ENV: &str = "AI_TUTOR_HTTP_POOL_MAX_IDLE_PER_HOST";
const DEFAULT_POOL_MAX_IDLE: usize = 8;

/// Thin wrapper over a pooled `reqwest::Client`.
///
/// Cloning is cheap; all clones share the same connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport. `timeout` of `None` means requests wait indefinitely.
    ///
    /// Pool size and proxy come from `AI_TUTOR_HTTP_POOL_MAX_IDLE_PER_HOST` and
    /// `AI_TUTOR_PROXY_URL`.
    pub fn new(timeout: Option<Duration>) -> Result<Self, TransportError> {
        Self::with_lookup(timeout, |key| env::var(key).ok())
    }

    /// Build a transport, resolving pool and proxy settings through `lookup`.
    pub fn with_lookup<F>(timeout: Option<Duration>, lookup: F) -> Result<Self, TransportError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = reqwest::Client::builder()
            .pool_max_idle_per_host(
                lookup(POOL_MAX_IDLE_ENV)
                    .and_then(|s| s.trim().parse::<usize>().ok())
                    .unwrap_or(DEFAULT_POOL_MAX_IDLE),
            )
            .pool_idle_timeout(Some(Duration::from_secs(90)));

        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(proxy_url) = lookup(PROXY_URL_ENV).filter(|v| !v.trim().is_empty()) {
            match Proxy::all(proxy_url.trim()) {
                Ok(proxy) => builder = builder.proxy(proxy),
                Err(e) => warn!(proxy = proxy_url.as_str(), error = %e, "ignoring invalid proxy"),
            }
        }

        let client = builder
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;

        Ok(Self { client })
    }

    /// POST a JSON body and collect the full response text.
    ///
    /// Non-2xx statuses are returned as a normal reply; only failures to send
    /// or to read the body become a `TransportError`.
    pub async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, String)],
        body: &Value,
    ) -> Result<HttpReply, TransportError> {
        let mut request = self.client.post(url).json(body);
        for (name, value) in headers {
            request = request.header(*name, value.as_str());
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(HttpReply { status, body })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_success_range() {
        let ok = HttpReply {
            status: 201,
            body: String::new(),
        };
        let bad = HttpReply {
            status: 503,
            body: "overloaded".into(),
        };
        assert!(ok.is_success());
        assert!(!bad.is_success());
    }

    #[test]
    fn test_transport_builds_with_and_without_timeout() {
        assert!(HttpTransport::new(None).is_ok());
        assert!(HttpTransport::new(Some(Duration::from_millis(250))).is_ok());
    }

    #[test]
    fn test_transport_reads_pool_and_proxy_settings() {
        let lookup = |key: &str| match key {
            POOL_MAX_IDLE_ENV => Some("2".to_string()),
            PROXY_URL_ENV => Some("http://127.0.0.1:3128".to_string()),
            _ => None,
        };
        assert!(HttpTransport::with_lookup(None, lookup).is_ok());

        let blank_proxy = |key: &str| (key == PROXY_URL_ENV).then(|| "  ".to_string());
        assert!(HttpTransport::with_lookup(None, blank_proxy).is_ok());
    }

    #[test]
    fn test_transport_ignores_unparsable_settings() {
        let lookup = |key: &str| match key {
            POOL_MAX_IDLE_ENV => Some("many".to_string()),
            PROXY_URL_ENV => Some("http://[bad".to_string()),
            _ => None,
        };
        assert!(HttpTransport::with_lookup(None, lookup).is_ok());
    }
}
