//! Integration Tests for Capsule
//!
//! This crate contains the following test modules:
//!
//! - `registry_tests`: route uniqueness, normalization, and manifest registration
//! - `dispatch_tests`: URL building, payload placement, and result normalization
//! - `cache_tests`: per-call cache attach, refresh, and bypass
//! - `headers_tests`: default headers and providers
//! - `http_tests`: end-to-end dispatch through `HttpTransport` against mockito servers
//! - `mock_infrastructure`: reusable mocks (HTTP server builder, recording transport)
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --package tests
//! ```

#[cfg(test)]
mod registry_tests;



#[cfg(test)]
mod headers_tests;


/// Mock infrastructure for testing
pub mod mock_infrastructure;
