//! HTTP transport used by the dispatcher.
//!
//! The dispatcher never talks to `reqwest` directly. It builds a [`TransportRequest`] and hands
//! it to a [`Transport`]; [`HttpTransport`] is the production implementation and tests plug in
//! recording transports to observe what would have been sent.

pub mod errors;
pub mod http_client;

pub use errors::TransportError;
pub use http_client::{HttpClientConfig, HttpTransport};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::{collections::BTreeMap, time::Duration};

use crate::route::Method;

/// Where the call parameters travel.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestPayload {
    /// Encoded into the query string (read methods).
    Query(Vec<(String, String)>),
    /// Serialized as a JSON request body.
    Json(Value),
}

impl RequestPayload {
    #[must_use]
    pub fn query(&self) -> &[(String, String)] {
        match self {
            Self::Query(pairs) => pairs,
            Self::Json(_) => &[],
        }
    }

    #[must_use]
    pub fn body(&self) -> Option<&Value> {
        match self {
            Self::Query(_) => None,
            Self::Json(body) => Some(body),
        }
    }
}

/// A fully resolved outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub payload: RequestPayload,
    /// Overrides the client-wide timeout when set.
    pub timeout: Option<Duration>,
}

/// The response envelope returned for `full_result` calls and stored in route caches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub status: u16,
    pub status_text: String,
    /// Header names are lowercase.
    pub headers: BTreeMap<String, String>,
    /// JSON body, or the raw text as a JSON string when the body is not JSON.
    pub data: Value,
    pub url: String,
    pub method: Method,
}

impl Response {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends resolved requests.
///
/// Implementations return `Err(TransportError::Status { .. })` for non-2xx responses so the
/// dispatcher can normalize them alongside network failures.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<Response, TransportError>;
}

/// Decodes a response body: JSON when it parses, otherwise the text itself.
#[must_use]
pub fn decode_body(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
