#![allow(clippy::unwrap_used)]
// Integration tests for `RemoteSync` against a mock backend.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use citygrid_api::RuleMap;
use citygrid_core::{
    CONNECTION_ERROR_MESSAGE, ConnectionState, CoreError, RemoteSync, RuleSet, SimulationDraft,
    SyncConfig,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn devices_body() -> Value {
    json!({
        "tr-1": {
            "timestamp": 1_718_447_400.0,
            "topic": "smartcity/traffic",
            "data": { "device_id": "tr-1", "name": "Main St Counter", "traffic": 91 }
        }
    })
}

fn vlans_body() -> Value {
    json!({ "tr-1": { "vlan_id": 40, "timestamp": 1_718_447_400.0 } })
}

fn rules_body() -> Value {
    json!({
        "temperature": {
            "high": { "threshold": 30, "vlan": 10 },
            "low": { "threshold": 0, "vlan": 30 }
        }
    })
}

async fn mount_get(server: &MockServer, route: &str, status: u16, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api/{route}")))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_backend(server: &MockServer) {
    mount_get(server, "devices", 200, devices_body()).await;
    mount_get(server, "vlans", 200, vlans_body()).await;
    mount_get(server, "rules", 200, rules_body()).await;
}

fn sync_for(server: &MockServer, poll_secs: u64) -> RemoteSync {
    let config = SyncConfig::parse(Some(&format!("{}/api", server.uri())))
        .unwrap()
        .with_timeout(Duration::from_secs(5))
        .with_poll_interval(poll_secs);
    RemoteSync::new(config).unwrap()
}

// ── Poll cycle ──────────────────────────────────────────────────────

#[tokio::test]
async fn refresh_applies_all_three_collections() {
    let server = MockServer::start().await;
    mount_backend(&server).await;
    let sync = sync_for(&server, 0);

    sync.refresh().await.unwrap();

    let snap = sync.snapshot();
    assert_eq!(snap.device_count(), 1);
    assert_eq!(snap.vlan_of("tr-1"), Some(40));
    assert_eq!(snap.rules().rule_count(), 2);
    assert_eq!(*sync.connection_state().borrow(), ConnectionState::Connected);
}

#[tokio::test]
async fn one_failed_request_keeps_previous_snapshot() {
    let server = MockServer::start().await;
    mount_backend(&server).await;
    let sync = sync_for(&server, 0);
    sync.refresh().await.unwrap();
    let before = sync.snapshot();

    server.reset().await;
    mount_get(&server, "devices", 200, json!({})).await;
    mount_get(&server, "vlans", 200, json!({})).await;
    mount_get(&server, "rules", 500, json!({ "error": "boom" })).await;

    let err = sync.refresh().await.unwrap_err();
    assert!(matches!(err, CoreError::Api { status: Some(500), .. }));

    // Devices and VLANs succeeded but were not applied.
    assert_eq!(*sync.snapshot(), *before);
    assert_eq!(
        *sync.connection_state().borrow(),
        ConnectionState::Failed(CONNECTION_ERROR_MESSAGE.to_owned())
    );
}

#[tokio::test]
async fn mistyped_reading_does_not_block_the_cycle() {
    let server = MockServer::start().await;
    mount_get(
        &server,
        "devices",
        200,
        json!({
            "tr-1": {
                "timestamp": 1_718_447_400.0,
                "topic": "smartcity/traffic",
                "data": { "device_id": "tr-1", "traffic": 91 }
            },
            "odd-1": {
                "timestamp": 1_718_447_401.0,
                "topic": "smartcity/sensor",
                "data": { "device_id": "odd-1", "temperature": "22.5" }
            }
        }),
    )
    .await;
    mount_get(&server, "vlans", 200, vlans_body()).await;
    mount_get(&server, "rules", 200, rules_body()).await;
    let sync = sync_for(&server, 0);

    sync.refresh().await.unwrap();

    let snap = sync.snapshot();
    assert_eq!(snap.device_count(), 2);
    let odd = snap.device("odd-1").unwrap();
    assert!(odd.parameters.is_empty());
    assert_eq!(odd.extra.get("temperature"), Some(&json!("22.5")));
    assert_eq!(*sync.connection_state().borrow(), ConnectionState::Connected);
}

#[tokio::test]
async fn unreachable_backend_surfaces_connection_error() {
    let config = SyncConfig::parse(Some("http://127.0.0.1:9/api"))
        .unwrap()
        .with_timeout(Duration::from_secs(2));
    let sync = RemoteSync::new(config).unwrap();

    let err = sync.refresh().await.unwrap_err();
    assert!(err.is_connection());
    assert!(sync.snapshot().is_empty());
    assert_eq!(
        sync.connection_state().borrow().banner(),
        Some(CONNECTION_ERROR_MESSAGE)
    );
}

#[tokio::test]
async fn poll_loop_recovers_after_failed_start() {
    let server = MockServer::start().await;
    mount_get(&server, "devices", 503, json!({})).await;
    mount_get(&server, "vlans", 200, vlans_body()).await;
    mount_get(&server, "rules", 200, rules_body()).await;

    let sync = sync_for(&server, 1);
    assert!(sync.start().await.is_err());
    assert!(matches!(
        *sync.connection_state().borrow(),
        ConnectionState::Failed(_)
    ));

    server.reset().await;
    mount_backend(&server).await;

    let mut state = sync.connection_state();
    tokio::time::timeout(Duration::from_secs(5), async {
        while *state.borrow_and_update() != ConnectionState::Connected {
            state.changed().await.unwrap();
        }
    })
    .await
    .unwrap();
    assert_eq!(sync.snapshot().device_count(), 1);

    sync.shutdown().await;
    assert_eq!(*sync.connection_state().borrow(), ConnectionState::Disconnected);
}

// ── Simulation ──────────────────────────────────────────────────────

#[tokio::test]
async fn simulate_patches_without_polling() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(devices_body()))
        .expect(1)
        .mount(&server)
        .await;
    mount_get(&server, "vlans", 200, vlans_body()).await;
    mount_get(&server, "rules", 200, rules_body()).await;
    Mock::given(method("POST"))
        .and(path("/api/simulate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "device": {
                "timestamp": 1_718_447_500.0,
                "topic": "smartcity/sensor",
                "data": {
                    "device_id": "sim-1718447500",
                    "name": "Test Sensor",
                    "type": "sensor",
                    "temperature": 22,
                    "location": "X"
                }
            },
            "vlan": { "vlan_id": 10 }
        })))
        .mount(&server)
        .await;

    let sync = sync_for(&server, 0);
    sync.refresh().await.unwrap();
    let mut updates = sync.subscribe();

    let draft = SimulationDraft {
        name: "Test Sensor".into(),
        temperature: 22.0,
        location: "X".into(),
        ..SimulationDraft::default()
    };
    let response = sync.simulate(&draft.to_request()).await.unwrap();
    assert_eq!(response.device_id(), "sim-1718447500");

    let snap = updates.changed().await.unwrap();
    assert_eq!(snap.device_count(), 2);
    let device = snap.device("sim-1718447500").unwrap();
    assert_eq!(device.display_name(), "Test Sensor");
    assert_eq!(device.reading.category(), "Environment");
    assert_eq!(snap.vlan_of("sim-1718447500"), Some(10));
    // the earlier poll result is still there
    assert_eq!(snap.vlan_of("tr-1"), Some(40));
}

#[tokio::test]
async fn simulate_failure_is_reported_and_state_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/simulate"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad payload"))
        .mount(&server)
        .await;

    let sync = sync_for(&server, 0);
    let err = sync
        .simulate(&SimulationDraft::default().to_request())
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::Simulation { .. }));
    assert!(err.to_string().contains("bad payload"));
    assert!(sync.snapshot().is_empty());
}

// ── Rules ───────────────────────────────────────────────────────────

#[tokio::test]
async fn update_rules_replaces_local_rules() {
    let server = MockServer::start().await;
    mount_backend(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/rules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "rules": {
                "temperature": {
                    "high": { "threshold": 35, "vlan": 10 },
                    "low": { "threshold": 0, "vlan": 30 }
                }
            }
        })))
        .mount(&server)
        .await;

    let sync = sync_for(&server, 0);
    sync.refresh().await.unwrap();

    let mut rules = sync.snapshot().rules().clone();
    rules.set("temperature", "high", 35.0, 10).unwrap();
    let saved = sync.update_rules(&rules).await.unwrap();

    assert_eq!(saved.get("temperature", "high").unwrap().threshold, 35.0);
    assert_eq!(sync.snapshot().rules(), &saved);
}

#[tokio::test]
async fn invalid_rules_are_not_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/rules"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let sync = sync_for(&server, 0);
    let empty_parameter: RuleMap = serde_json::from_value(json!({ "traffic": {} })).unwrap();
    let rules = RuleSet::from_rule_map(&empty_parameter);

    let err = sync.update_rules(&rules).await.unwrap_err();
    assert!(matches!(err, CoreError::InvalidRules { .. }));
}

// ── Teardown ────────────────────────────────────────────────────────

#[tokio::test]
async fn shutdown_drops_in_flight_poll() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(devices_body())
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;
    mount_get(&server, "vlans", 200, vlans_body()).await;
    mount_get(&server, "rules", 200, rules_body()).await;

    let sync = sync_for(&server, 0);
    let in_flight = {
        let sync = sync.clone();
        tokio::spawn(async move { sync.refresh().await })
    };
    tokio::time::sleep(Duration::from_millis(200)).await;
    sync.shutdown().await;

    let result = in_flight.await.unwrap();
    assert!(matches!(result, Err(CoreError::NotConnected)));
    assert!(sync.snapshot().is_empty());

    // Stays down until restarted.
    assert!(matches!(
        sync.refresh().await,
        Err(CoreError::NotConnected)
    ));
}
