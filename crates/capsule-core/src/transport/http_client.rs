use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, time::Duration};

use super::{decode_body, RequestPayload, Response, Transport, TransportError, TransportRequest};

/// Connection and timeout settings for the shared HTTP client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpClientConfig {
    /// TCP connect timeout in milliseconds
    pub connect_timeout_ms: u64,
    /// Whole-request timeout in milliseconds, unless a route sets its own
    pub request_timeout_ms: u64,
    /// How long idle pooled connections are kept, in seconds
    pub pool_idle_timeout_seconds: u64,
    /// Maximum idle connections kept per host
    pub pool_max_idle_per_host: usize,
    /// `User-Agent` sent with every request
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 5_000,
            request_timeout_ms: 30_000,
            pool_idle_timeout_seconds: 30,
            pool_max_idle_per_host: 32,
            user_agent: concat!("capsule/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// [`Transport`] backed by a pooled `reqwest` client.
///
/// Redirects are not followed; a 3xx response is reported like any other non-2xx status.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

// Default is not implemented because building the client can fail.

impl HttpTransport {
    /// Creates a transport with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Build`] if the underlying client fails to build.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_config(&HttpClientConfig::default())
    }

    /// Creates a transport with the provided configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Build`] if the underlying client fails to build.
    pub fn with_config(config: &HttpClientConfig) -> Result<Self, TransportError> {
        let client = ClientBuilder::new()
            .pool_idle_timeout(Duration::from_secs(config.pool_idle_timeout_seconds))
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .use_rustls_tls()
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(config.user_agent.as_str())
            .tcp_nodelay(true)
            .build()
            .map_err(|e| {
                tracing::error!(error = %e, "failed to build http client");
                TransportError::Build(format!("HTTP client build failed: {e}"))
            })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: TransportRequest) -> Result<Response, TransportError> {
        let TransportRequest { method, url, headers, payload, timeout } = request;

        let mut builder = self.client.request(method.to_http(), &url);
        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match &payload {
            RequestPayload::Query(pairs) if pairs.is_empty() => builder,
            RequestPayload::Query(pairs) => builder.query(pairs),
            RequestPayload::Json(body) => builder.json(body),
        };
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        tracing::trace!(method = %method, url = %url, "http request started");

        let response = builder.send().await.map_err(|e| {
            let err = TransportError::from_reqwest(&e);
            tracing::trace!(method = %method, url = %url, error = %err, "http request error");
            err
        })?;

        let status = response.status();
        let response_headers: BTreeMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value.to_str().ok().map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let text = response.text().await.map_err(|e| TransportError::from_reqwest(&e))?;

        let envelope = Response {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers: response_headers,
            data: decode_body(&text),
            url,
            method,
        };

        tracing::trace!(status = envelope.status, "http request completed");

        if envelope.is_success() {
            Ok(envelope)
        } else {
            Err(TransportError::Status {
                status: envelope.status,
                status_text: envelope.status_text.clone(),
                response: Box::new(envelope),
            })
        }
    }
}
