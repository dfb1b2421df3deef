use serde::Serialize;
use serde_json::Value;

use crate::transport::{Response, TransportError};

/// Normalized failure: HTTP status and status text, or errno and error code name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailurePayload {
    pub code: i64,
    pub message: String,
}

impl From<&TransportError> for FailurePayload {
    fn from(error: &TransportError) -> Self {
        Self { code: error.code(), message: error.message() }
    }
}

/// Outcome of a dispatch. Serializes to the bare body, the envelope, or `{code, message}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Resolved {
    Payload(Value),
    Envelope(Response),
    Failure(FailurePayload),
}

impl Resolved {
    pub(crate) fn success(response: &Response, full_result: bool) -> Self {
        if full_result {
            Self::Envelope(response.clone())
        } else {
            Self::Payload(response.data.clone())
        }
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    #[must_use]
    pub fn failure(&self) -> Option<&FailurePayload> {
        match self {
            Self::Failure(failure) => Some(failure),
            _ => None,
        }
    }

    /// The response body, whichever success form this is.
    #[must_use]
    pub fn data(&self) -> Option<&Value> {
        match self {
            Self::Payload(data) => Some(data),
            Self::Envelope(response) => Some(&response.data),
            Self::Failure(_) => None,
        }
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Payload(data) => data,
            other => serde_json::to_value(other).unwrap_or(Value::Null),
        }
    }
}
