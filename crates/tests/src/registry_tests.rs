//! Registration tests: uniqueness, normalization, and manifest loading.

use capsule_core::{
    route::{CachePolicy, Method, RouteSpec},
    Capsule, CapsuleError, RequestOptions, RoutesManifest,
};
use serde_json::json;
use std::time::Duration;

use crate::mock_infrastructure::{
    cached_route, capsule_with, params, route_table, RecordingTransport, TEST_BASE_URL,
};

#[tokio::test]
async fn test_duplicate_key_dispatches_to_first_binding() {
    let transport = RecordingTransport::new();
    let capsule = capsule_with(&transport);

    let report = capsule
        .register(
            "http://other.test",
            &route_table(vec![(Method::Post, "getUser", RouteSpec::from("/elsewhere"))]),
        )
        .unwrap();

    assert!(report.registered.is_empty());
    assert!(matches!(report.rejected.as_slice(), [CapsuleError::DuplicateRoute(k)] if k == "getUser"));

    capsule.request("getUser", &params(json!({ "id": 1 })), RequestOptions::new()).await.unwrap();

    let sent = transport.last();
    assert_eq!(sent.method, Method::Get);
    assert_eq!(sent.url, format!("{TEST_BASE_URL}/users/1"));
}

#[test]
fn test_keys_are_global_across_services() {
    let capsule = Capsule::new(RecordingTransport::new().shared());

    capsule
        .register("http://a.test", &route_table(vec![(Method::Get, "ping", RouteSpec::from("/ping"))]))
        .unwrap();
    let report = capsule
        .register("http://b.test", &route_table(vec![(Method::Get, "ping", RouteSpec::from("/ping"))]))
        .unwrap();

    assert_eq!(report.rejected.len(), 1);
    assert_eq!(capsule.route("ping").unwrap().base_url, "http://a.test");
    assert_eq!(capsule.routes().len(), 1);
}

#[test]
fn test_declared_cache_policy_is_recorded() {
    let capsule = Capsule::new(RecordingTransport::new().shared());
    capsule
        .register(
            TEST_BASE_URL,
            &route_table(vec![
                (Method::Get, "cached", cached_route("/cached", 10)),
                (Method::Get, "zero", cached_route("/zero", 0)),
                (Method::Get, "plain", RouteSpec::from("/plain")),
            ]),
        )
        .unwrap();

    assert_eq!(
        capsule.route("cached").unwrap().cache_policy,
        CachePolicy::Enabled { ttl: Duration::from_secs(10) }
    );
    assert_eq!(capsule.route("zero").unwrap().cache_policy, CachePolicy::Disabled);
    assert_eq!(capsule.route("plain").unwrap().cache_policy, CachePolicy::Disabled);
    assert!(capsule.active_cache("cached").is_none());
}

#[test]
fn test_invalid_base_url_is_a_configuration_error() {
    let capsule = Capsule::new(RecordingTransport::new().shared());
    let result = capsule
        .register("", &route_table(vec![(Method::Get, "a", RouteSpec::from("/a"))]));

    assert!(matches!(result, Err(CapsuleError::Configuration(_))));
    assert!(capsule.routes().is_empty());
}

#[test]
fn test_manifest_registration_reports_every_rejection() {
    let manifest = RoutesManifest::from_toml_str(
        r#"
[[services]]
name = "users"
base_url = "http://users.test"

[services.routes.get]
getUser = "/users/:id"
listUsers = { url = "/users", cache = true }

[[services]]
name = "broken"
base_url = "not-a-url"

[services.routes.get]
orphan = "/orphan"

[[services]]
name = "admin"
base_url = "http://admin.test"

[services.routes.delete]
getUser = "/users/:id"
purge = "/purge"
"#,
    )
    .unwrap();

    let capsule = Capsule::new(RecordingTransport::new().shared());
    let report = capsule.register_manifest(&manifest);

    assert_eq!(report.registered.len(), 3);
    assert_eq!(report.rejected.len(), 2);
    assert!(report.rejected.iter().any(|e| matches!(e, CapsuleError::Configuration(_))));
    assert!(report
        .rejected
        .iter()
        .any(|e| matches!(e, CapsuleError::DuplicateRoute(k) if k == "getUser")));

    let keys: Vec<String> = capsule.routes().into_iter().map(|r| r.key).collect();
    assert_eq!(keys, vec!["getUser", "listUsers", "purge"]);
    assert_eq!(
        capsule.route("listUsers").unwrap().cache_policy,
        CachePolicy::Enabled { ttl: Duration::from_secs(300) }
    );
    assert!(capsule.route("orphan").is_none());
}
