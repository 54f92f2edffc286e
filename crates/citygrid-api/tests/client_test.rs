#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use std::collections::BTreeMap;

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use citygrid_api::{ApiClient, Error, RuleMap, RuleThreshold, SimulateRequest};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/api", server.uri())).unwrap();
    let client = ApiClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

fn sample_rules() -> RuleMap {
    let mut temperature = BTreeMap::new();
    temperature.insert(
        "high".to_owned(),
        RuleThreshold {
            threshold: 30.0,
            vlan: 10,
        },
    );
    temperature.insert(
        "low".to_owned(),
        RuleThreshold {
            threshold: 0.0,
            vlan: 30,
        },
    );
    let mut rules = RuleMap::new();
    rules.insert("temperature".to_owned(), temperature);
    rules
}

// ── Device tests ────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_devices() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "env-1": {
                "timestamp": 1_718_447_400.25,
                "topic": "smartcity/environment",
                "data": {
                    "device_id": "env-1",
                    "name": "Environment Probe",
                    "temperature": 24,
                    "location": "City Center"
                }
            }
        })))
        .mount(&server)
        .await;

    let devices = client.list_devices().await.unwrap();

    assert_eq!(devices.len(), 1);
    let record = &devices["env-1"];
    assert_eq!(record.topic, "smartcity/environment");
    assert_eq!(record.data.temperature, Some(24.0));
    assert_eq!(record.data.name.as_deref(), Some("Environment Probe"));
}

#[tokio::test]
async fn test_list_vlan_assignments() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/vlans"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "env-1": { "vlan_id": 20, "timestamp": 1_718_447_400.5, "reason": "temperature" },
            "tr-2": { "vlan_id": 40, "timestamp": 1_718_447_401.0 }
        })))
        .mount(&server)
        .await;

    let vlans = client.list_vlan_assignments().await.unwrap();

    assert_eq!(vlans.len(), 2);
    assert_eq!(vlans["env-1"].vlan_id, 20);
    assert_eq!(vlans["tr-2"].reason, None);
}

// ── Rule tests ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_rules() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/rules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "temperature": {
                "high": { "threshold": 30, "vlan": 10 },
                "low": { "threshold": 0, "vlan": 30 }
            }
        })))
        .mount(&server)
        .await;

    let rules = client.get_rules().await.unwrap();
    assert_eq!(rules, sample_rules());
}

#[tokio::test]
async fn test_update_rules_posts_full_map() {
    let (server, client) = setup().await;
    let rules = sample_rules();

    Mock::given(method("POST"))
        .and(path("/api/rules"))
        .and(body_json(json!({
            "temperature": {
                "high": { "threshold": 30.0, "vlan": 10 },
                "low": { "threshold": 0.0, "vlan": 30 }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "rules": {
                "temperature": {
                    "high": { "threshold": 30, "vlan": 10 },
                    "low": { "threshold": 0, "vlan": 30 }
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client.update_rules(&rules).await.unwrap();
    assert_eq!(resp.status, "success");
    assert_eq!(resp.rules, rules);
}

// ── Simulation tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_simulate_returns_device_and_vlan() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/simulate"))
        .and(body_json(json!({
            "name": "Test Sensor",
            "type": "sensor",
            "temperature": 22.0,
            "location": "X"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "device": {
                "timestamp": 1_718_447_400.0,
                "topic": "smartcity/sensor",
                "data": {
                    "device_id": "sim-1718447400",
                    "name": "Test Sensor",
                    "type": "sensor",
                    "temperature": 22,
                    "location": "X"
                }
            },
            "vlan": { "vlan_id": 10, "timestamp": 1_718_447_400.0 }
        })))
        .mount(&server)
        .await;

    let req = SimulateRequest {
        device_id: None,
        name: "Test Sensor".into(),
        kind: "sensor".into(),
        temperature: Some(22.0),
        traffic: None,
        air_quality: None,
        location: "X".into(),
    };
    let resp = client.simulate(&req).await.unwrap();

    assert_eq!(resp.device_id(), "sim-1718447400");
    assert_eq!(resp.vlan.map(|v| v.vlan_id), Some(10));
}

#[tokio::test]
async fn test_simulate_without_vlan() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/simulate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "device": {
                "timestamp": 1.0,
                "topic": "smartcity/traffic",
                "data": { "device_id": "tr-1", "traffic": 91 }
            },
            "vlan": null
        })))
        .mount(&server)
        .await;

    let req = SimulateRequest {
        device_id: Some("tr-1".into()),
        name: "Traffic Counter".into(),
        kind: "traffic".into(),
        temperature: None,
        traffic: Some(91.0),
        air_quality: None,
        location: "Main Street".into(),
    };
    let resp = client.simulate(&req).await.unwrap();
    assert!(resp.vlan.is_none());
    assert_eq!(resp.device.data.traffic, Some(91.0));
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_server_error_is_transient() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client.list_devices().await.unwrap_err();
    assert!(
        matches!(err, Error::Status { status: 500, ref body } if body == "boom"),
        "expected Status error, got: {err:?}"
    );
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/rules"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client.get_rules().await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_malformed_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/vlans"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
        .mount(&server)
        .await;

    let err = client.list_vlan_assignments().await.unwrap_err();
    assert!(
        matches!(err, Error::Deserialization { ref body, .. } if body.contains("nope")),
        "expected Deserialization error, got: {err:?}"
    );
}

#[tokio::test]
async fn test_unreachable_backend() {
    // Nothing listens on port 9 locally.
    let client = ApiClient::from_url("http://127.0.0.1:9/api").unwrap();
    let err = client.list_devices().await.unwrap_err();
    assert!(err.is_unreachable(), "expected unreachable, got: {err:?}");
}
