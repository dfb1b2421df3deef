//! HTTP API Mock Builder
//!
//! Wraps mockito with helpers for the JSON endpoints routes are registered against.

use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::Value;

/// Builder for mock JSON API endpoints.
pub struct ApiMockBuilder {
    server: ServerGuard,
    mocks: Vec<Mock>,
}

impl ApiMockBuilder {
    /// Creates a new builder with a fresh mockito server.
    pub async fn new() -> Self {
        Self { server: Server::new_async().await, mocks: Vec::new() }
    }

    /// Base URL of the mock server, suitable for route registration.
    #[must_use]
    pub fn url(&self) -> String {
        self.server.url()
    }

    /// Serves `body` as JSON for `method path`, any query.
    pub async fn mock_json(&mut self, method: &str, path: &str, status: usize, body: &Value) -> &mut Self {
        let mock = self
            .server
            .mock(method, path)
            .match_query(Matcher::Any)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;

        self.mocks.push(mock);
        self
    }

    /// Serves `body` for `method path` and expects exactly `hits` calls.
    pub async fn mock_json_expect(
        &mut self,
        method: &str,
        path: &str,
        hits: usize,
        body: &Value,
    ) -> &mut Self {
        let mock = self
            .server
            .mock(method, path)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .expect(hits)
            .create_async()
            .await;

        self.mocks.push(mock);
        self
    }

    /// Serves `body` only when the query string carries every `(name, value)` pair.
    pub async fn mock_get_with_query(
        &mut self,
        path: &str,
        query: &[(&str, &str)],
        body: &Value,
    ) -> &mut Self {
        let matchers = query
            .iter()
            .map(|(name, value)| Matcher::UrlEncoded((*name).to_string(), (*value).to_string()))
            .collect();

        let mock = self
            .server
            .mock("GET", path)
            .match_query(Matcher::AllOf(matchers))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;

        self.mocks.push(mock);
        self
    }

    /// Serves `body` for `method path` only when the JSON request body matches `expected`.
    pub async fn mock_json_body(
        &mut self,
        method: &str,
        path: &str,
        expected: &Value,
        body: &Value,
    ) -> &mut Self {
        let mock = self
            .server
            .mock(method, path)
            .match_body(Matcher::Json(expected.clone()))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;

        self.mocks.push(mock);
        self
    }

    /// Serves `body` for `GET path` only when header `name` equals `value`.
    pub async fn mock_get_with_header(
        &mut self,
        path: &str,
        name: &str,
        value: &str,
        body: &Value,
    ) -> &mut Self {
        let mock = self
            .server
            .mock("GET", path)
            .match_query(Matcher::Any)
            .match_header(name, value)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;

        self.mocks.push(mock);
        self
    }

    /// Serves a plain-text error response.
    pub async fn mock_status(&mut self, method: &str, path: &str, status: usize) -> &mut Self {
        let mock = self
            .server
            .mock(method, path)
            .match_query(Matcher::Any)
            .with_status(status)
            .with_body("error")
            .create_async()
            .await;

        self.mocks.push(mock);
        self
    }

    /// Asserts every mock's expectations.
    pub async fn assert_all(&self) {
        for mock in &self.mocks {
            mock.assert_async().await;
        }
    }
}
