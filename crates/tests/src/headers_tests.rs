//! Default header behavior across routes and calls.

use capsule_core::{HeaderSource, RequestOptions};
use serde_json::json;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use crate::mock_infrastructure::{capsule_with, params, RecordingTransport};

#[tokio::test]
async fn test_baseline_header_is_sent() {
    let transport = RecordingTransport::new();
    let capsule = capsule_with(&transport);

    capsule.request("getUser", &params(json!({ "id": 1 })), RequestOptions::new()).await.unwrap();

    assert_eq!(transport.last().headers["Cache-Control"], "no-cache");
}

#[tokio::test]
async fn test_added_headers_apply_to_routes_registered_earlier() {
    let transport = RecordingTransport::new();
    let capsule = capsule_with(&transport);

    capsule.add_header([("Authorization", HeaderSource::from("Bearer X"))]);
    capsule.request("createUser", &params(json!({})), RequestOptions::new()).await.unwrap();
    capsule.request("getUser", &params(json!({ "id": 1 })), RequestOptions::new()).await.unwrap();

    for request in transport.requests() {
        assert_eq!(request.headers["Authorization"], "Bearer X");
    }
}

#[tokio::test]
async fn test_provider_is_evaluated_once() {
    let transport = RecordingTransport::new();
    let capsule = capsule_with(&transport);
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    capsule.add_header([(
        "X-Token",
        HeaderSource::provider(move || format!("token-{}", counter.fetch_add(1, Ordering::SeqCst))),
    )]);

    for _ in 0..3 {
        capsule.request("getUser", &params(json!({ "id": 1 })), RequestOptions::new()).await.unwrap();
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(transport.requests().iter().all(|r| r.headers["X-Token"] == "token-0"));
}

#[tokio::test]
async fn test_later_additions_override_earlier_keys() {
    let transport = RecordingTransport::new();
    let capsule = capsule_with(&transport);

    capsule.add_header([("X-Tenant", HeaderSource::from("alpha"))]);
    let merged = capsule.add_header([("X-Tenant", HeaderSource::from("beta"))]);

    assert_eq!(merged["X-Tenant"], "beta");
    assert_eq!(capsule.default_headers()["X-Tenant"], "beta");
}

#[tokio::test]
async fn test_per_call_headers_persist_into_defaults() {
    let transport = RecordingTransport::new();
    let capsule = capsule_with(&transport);
    let args = params(json!({ "id": 1 }));

    capsule.request("getUser", &args, RequestOptions::new().header("X-Trace", "abc")).await.unwrap();
    capsule.request("getUser", &args, RequestOptions::new()).await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests[0].headers["X-Trace"], "abc");
    assert_eq!(requests[1].headers["X-Trace"], "abc");
    assert_eq!(capsule.default_headers()["X-Trace"], "abc");
}
