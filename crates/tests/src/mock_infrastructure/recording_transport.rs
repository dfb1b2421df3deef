//! Recording Transport
//!
//! Captures every outgoing [`TransportRequest`] and answers from a scripted queue. When the
//! queue is empty it answers `200 OK` echoing the request URL and a running call counter, so
//! tests can tell a fresh response from a cached one.

use async_trait::async_trait;
use capsule_core::{
    route::Method,
    transport::{Response, TransportError, TransportRequest},
    Transport,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::{collections::VecDeque, sync::Arc};

/// Scripted [`Transport`] that records what it was asked to send.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    requests: Mutex<Vec<TransportRequest>>,
    script: Mutex<VecDeque<Result<Response, TransportError>>>,
}

impl RecordingTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response. Non-2xx statuses are returned as [`TransportError::Status`].
    pub fn respond_with(&self, status: u16, data: Value) -> &Self {
        let response = Response {
            status,
            status_text: status_text(status).to_string(),
            headers: Default::default(),
            data,
            url: String::new(),
            method: Method::Get,
        };
        let outcome = if response.is_success() {
            Ok(response)
        } else {
            Err(TransportError::Status {
                status,
                status_text: response.status_text.clone(),
                response: Box::new(response),
            })
        };
        self.inner.script.lock().push_back(outcome);
        self
    }

    /// Queues a transport failure.
    pub fn fail_with(&self, error: TransportError) -> &Self {
        self.inner.script.lock().push_back(Err(error));
        self
    }

    /// Every request sent so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<TransportRequest> {
        self.inner.requests.lock().clone()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.inner.requests.lock().len()
    }

    /// The most recent request.
    ///
    /// # Panics
    ///
    /// Panics if nothing was sent.
    #[must_use]
    pub fn last(&self) -> TransportRequest {
        self.inner.requests.lock().last().cloned().expect("no request was sent")
    }

    /// This transport as the trait object `Capsule` expects.
    #[must_use]
    pub fn shared(&self) -> Arc<dyn Transport> {
        Arc::new(self.clone())
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: TransportRequest) -> Result<Response, TransportError> {
        let call = {
            let mut requests = self.inner.requests.lock();
            requests.push(request.clone());
            requests.len()
        };

        let scripted = self.inner.script.lock().pop_front();
        match scripted {
            Some(Ok(mut response)) => {
                response.url = request.url;
                response.method = request.method;
                Ok(response)
            }
            Some(Err(error)) => Err(error),
            None => Ok(Response {
                status: 200,
                status_text: "OK".to_string(),
                headers: Default::default(),
                data: json!({ "url": request.url.clone(), "call": call }),
                url: request.url,
                method: request.method,
            }),
        }
    }
}

fn status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "",
    }
}
