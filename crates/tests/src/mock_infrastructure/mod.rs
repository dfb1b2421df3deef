//! Mock Infrastructure for Testing Capsule
//!
//! Reusable mocks for exercising registration and dispatch without a real backend.
//!
//! ## Components
//!
//! - `ApiMockBuilder`: wraps mockito to serve JSON endpoints over real HTTP
//! - `RecordingTransport`: a [`Transport`](capsule_core::Transport) that records every request
//!   and answers from a queue
//! - `LogCapture`: collects `tracing` output for assertions on logged events
//! - Test helpers for params, route tables, and capsules
//!
//! ## Usage
//!
//! ```ignore
//! use tests::mock_infrastructure::{capsule_with, RecordingTransport};
//!
//! let transport = RecordingTransport::new();
//! let capsule = capsule_with(&transport);
//! // dispatch, then inspect transport.requests()
//! ```

pub mod http_mock;
pub mod recording_transport;
pub mod test_helpers;

pub use http_mock::ApiMockBuilder;
pub use log_capture::LogCapture;
pub use recording_transport::RecordingTransport;
pub use test_helpers::*;
