#![allow(clippy::unwrap_used)]
// Integration tests for `Mirror` against a wiremock mirror.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mirrorctl_core::{
    BrightnessControl, CoreError, FileStorage, MemoryStorage, Mirror, MirrorConfig, PendingOp,
    STORAGE_KEY, StatePersistence, SystemAction,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn config(server: &MockServer) -> MirrorConfig {
    MirrorConfig::new(Url::parse(&server.uri()).unwrap())
}

async fn setup() -> (MockServer, Mirror) {
    let server = MockServer::start().await;
    let mirror =
        Mirror::with_persistence(config(&server), Box::new(MemoryStorage::new())).unwrap();
    (server, mirror)
}

fn active_modules() -> Value {
    json!({
        "success": true,
        "data": [
            { "identifier": "module_0_clock", "name": "clock", "hidden": false },
            { "identifier": "module_1_MMM-Remote-Control", "name": "MMM-Remote-Control", "hidden": false },
            { "identifier": "module_2_MMM-QRAccess", "name": "MMM-QRAccess", "hidden": false },
            { "identifier": "module_3_newsfeed", "name": "newsfeed", "hidden": true },
            { "name": "MMM-clock" }
        ]
    })
}

async fn mount_active_modules(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/module"))
        .respond_with(ResponseTemplate::new(200).set_body_json(active_modules()))
        .mount(server)
        .await;
}

fn ok() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "success": true }))
}

// ── Refresh ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_refresh_filters_blacklist_and_forces_hidden() {
    let (server, mirror) = setup().await;
    mount_active_modules(&server).await;

    let count = mirror.refresh_modules().await.unwrap();
    assert_eq!(count, 4);

    let ids: Vec<String> = mirror.apps_snapshot().iter().map(|s| s.id.clone()).collect();
    assert_eq!(
        ids,
        ["module_0_clock", "module_2_MMM-QRAccess", "module_3_newsfeed", "MMM-clock"]
    );

    let qr = mirror.app_state("module_2_MMM-QRAccess").await.unwrap();
    assert!(!qr.is_visible_on_mirror, "QR access module must start hidden");
    assert!(mirror.app_state("module_1_MMM-Remote-Control").await.is_none());

    let status = mirror.refresh_status();
    assert!(status.last_refresh.is_some());
    assert_eq!(status.last_error, None);
    assert_eq!(status.module_count, 4);
}

#[tokio::test]
async fn test_refresh_failure_keeps_store_and_reports() {
    let (server, mirror) = setup().await;
    mount_active_modules(&server).await;
    mirror.refresh_modules().await.unwrap();

    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/api/module"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = mirror.refresh_modules().await.unwrap_err();
    assert!(matches!(err, CoreError::ModulesUnavailable), "{err:?}");
    assert_eq!(mirror.apps_snapshot().len(), 4);
    assert_eq!(
        mirror.refresh_status().last_error.as_deref(),
        Some("Failed to connect to mirror")
    );
}

// ── Mirror visibility ───────────────────────────────────────────────

#[tokio::test]
async fn test_toggle_hides_visible_module() {
    let (server, mirror) = setup().await;
    mount_active_modules(&server).await;
    mirror.refresh_modules().await.unwrap();

    Mock::given(method("GET"))
        .and(path("/api/module/clock/hide"))
        .respond_with(ok())
        .expect(1)
        .mount(&server)
        .await;

    let state = mirror.toggle_mirror_visibility("module_0_clock").await.unwrap();
    assert!(!state.is_visible_on_mirror);
    assert!(!mirror.is_pending(&PendingOp::Module("module_0_clock".into())));
    assert_eq!(mirror.mirror_apps().await.len(), 1);
}

#[tokio::test]
async fn test_rejected_show_is_reverted() {
    let (server, mirror) = setup().await;
    mount_active_modules(&server).await;
    mirror.refresh_modules().await.unwrap();

    Mock::given(method("GET"))
        .and(path("/api/module/newsfeed/show"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": false })))
        .expect(1)
        .mount(&server)
        .await;

    let err = mirror
        .toggle_mirror_visibility("module_3_newsfeed")
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Rejected { .. }), "{err:?}");

    let news = mirror.app_state("module_3_newsfeed").await.unwrap();
    assert!(!news.is_visible_on_mirror);
    assert!(mirror.pending_snapshot().is_empty());
}

#[tokio::test]
async fn test_http_error_is_reverted() {
    let (server, mirror) = setup().await;
    mount_active_modules(&server).await;
    mirror.refresh_modules().await.unwrap();

    Mock::given(method("GET"))
        .and(path("/api/module/MMM-clock/hide"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let err = mirror.toggle_mirror_visibility("MMM-clock").await.unwrap_err();
    assert_eq!(err.status(), Some(502));
    assert!(mirror.app_state("MMM-clock").await.unwrap().is_visible_on_mirror);
}

#[tokio::test]
async fn test_toggle_unknown_id_inserts_nothing() {
    let (server, mirror) = setup().await;
    mount_active_modules(&server).await;
    mirror.refresh_modules().await.unwrap();

    let err = mirror.toggle_mirror_visibility("ghost").await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }), "{err:?}");
    let err = mirror.toggle_dashboard_visibility("ghost").await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }), "{err:?}");

    assert_eq!(mirror.apps_snapshot().len(), 4);
    assert!(mirror.app_state("ghost").await.is_none());
}

#[tokio::test]
async fn test_concurrent_toggle_is_busy() {
    let (server, mirror) = setup().await;
    mount_active_modules(&server).await;
    mirror.refresh_modules().await.unwrap();

    Mock::given(method("GET"))
        .and(path("/api/module/clock/hide"))
        .respond_with(ok().set_delay(Duration::from_millis(300)))
        .expect(1)
        .mount(&server)
        .await;

    let background = mirror.clone();
    let first = tokio::spawn(async move {
        background.toggle_mirror_visibility("module_0_clock").await
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert!(mirror.is_pending(&PendingOp::Module("module_0_clock".into())));
    let err = mirror
        .toggle_mirror_visibility("module_0_clock")
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Busy { .. }), "{err:?}");

    first.await.unwrap().unwrap();
    assert!(!mirror.is_pending(&PendingOp::Module("module_0_clock".into())));
}

// ── Dashboard visibility ────────────────────────────────────────────

#[tokio::test]
async fn test_dashboard_toggle_is_local_and_survives_refresh() {
    let (server, mirror) = setup().await;
    mount_active_modules(&server).await;
    mirror.refresh_modules().await.unwrap();

    let state = mirror.toggle_dashboard_visibility("module_0_clock").await.unwrap();
    assert!(state.is_hidden_from_dashboard);

    mirror.refresh_modules().await.unwrap();
    let dashboard: Vec<String> = mirror.dashboard_apps().await.into_iter().map(|s| s.id).collect();
    assert!(!dashboard.contains(&"module_0_clock".to_owned()));
    assert_eq!(dashboard.len(), 3);

    // Only the two module listings reached the mirror.
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_state_persists_across_sessions() {
    let server = MockServer::start().await;
    mount_active_modules(&server).await;
    let dir = tempfile::tempdir().unwrap();

    let mut cfg = config(&server);
    cfg.state_dir = Some(dir.path().to_path_buf());

    let first = Mirror::new(cfg.clone()).unwrap();
    first.refresh_modules().await.unwrap();
    first.toggle_dashboard_visibility("module_3_newsfeed").await.unwrap();

    let storage = FileStorage::new(dir.path());
    assert!(storage.read(STORAGE_KEY).unwrap().is_some());

    let second = Mirror::new(cfg).unwrap();
    let news = second.app_state("module_3_newsfeed").await.unwrap();
    assert!(news.is_hidden_from_dashboard);
}

// ── System ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_system_action_hits_endpoint() {
    let (server, mirror) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/togglefullscreen"))
        .respond_with(ok())
        .expect(1)
        .mount(&server)
        .await;

    mirror
        .run_system_action(SystemAction::ToggleFullscreen)
        .await
        .unwrap();
    assert!(!mirror.is_pending(&PendingOp::System(SystemAction::ToggleFullscreen)));
}

#[tokio::test]
async fn test_out_of_range_brightness_is_passed_through() {
    let (server, mirror) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/brightness/150"))
        .respond_with(ResponseTemplate::new(400))
        .expect(1)
        .mount(&server)
        .await;

    let err = mirror.set_brightness(150).await.unwrap_err();
    assert!(matches!(err, CoreError::Api { status: Some(400), .. }), "{err:?}");
    assert_eq!(mirror.confirmed_brightness(), 50);
}

#[tokio::test]
async fn test_brightness_control_sends_last_value_only() {
    let server = MockServer::start().await;
    let mut cfg = config(&server);
    cfg.brightness_debounce = Duration::from_secs(30);
    let mirror = Mirror::with_persistence(cfg, Box::new(MemoryStorage::new())).unwrap();

    Mock::given(method("GET"))
        .and(path("/api/brightness/40"))
        .respond_with(ok())
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/brightness/60"))
        .respond_with(ok())
        .expect(1)
        .mount(&server)
        .await;

    let control = BrightnessControl::new(&mirror);
    control.set(40);
    assert_eq!(control.step(4), 60);
    assert_eq!(control.state().displayed, 60);

    let rx = control.subscribe();
    control.flush().await;

    let state = rx.borrow().clone();
    assert_eq!(state.confirmed, 60);
    assert_eq!(state.last_error, None);
    assert_eq!(mirror.confirmed_brightness(), 60);
}

#[tokio::test]
async fn test_brightness_control_reverts_on_failure() {
    let (server, mirror) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/brightness/150"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let control = BrightnessControl::new(&mirror);
    control.set(150);
    let rx = control.subscribe();
    control.flush().await;

    let state = rx.borrow().clone();
    assert_eq!(state.displayed, 50);
    assert_eq!(state.confirmed, 50);
    assert!(state.last_error.is_some());
}

#[tokio::test]
async fn test_system_info_from_config() {
    let (server, mirror) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "modules": [{ "module": "clock" }, { "module": "weather" }] }
        })))
        .mount(&server)
        .await;

    let info = mirror.system_info().await.unwrap();
    assert!(info.success);
    assert_eq!(info.platform, "Magic Mirror");
    assert_eq!(info.node_version, "Unknown");
    assert_eq!(info.brightness, 50);
    assert_eq!(info.configured_modules, Some(2));
}

// ── Suppression ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_suppress_stops_at_first_accepted_action() {
    let (server, mirror) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/module/MMM-QRAccess"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{ "name": "stop" }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/module/MMM-QRAccess/disable"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/module/MMM-QRAccess/stop"))
        .respond_with(ok())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/module/MMM-QRAccess/turnOff"))
        .respond_with(ok())
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/module/MMM-QRAccess/hide"))
        .respond_with(ok())
        .expect(1)
        .mount(&server)
        .await;

    let report = mirror.suppress_module("MMM-QRAccess").await;
    assert_eq!(report.disabled_with.as_deref(), Some("stop"));
    assert!(report.hidden);
    assert!(report.actions.is_some());
}

#[tokio::test]
async fn test_suppress_never_fails_when_mirror_is_down() {
    let uri = {
        let server = MockServer::start().await;
        server.uri()
    };
    let mirror = Mirror::with_persistence(
        MirrorConfig::new(Url::parse(&uri).unwrap()),
        Box::new(MemoryStorage::new()),
    )
    .unwrap();

    let report = mirror.suppress_module("MMM-QRAccess").await;
    assert_eq!(report.disabled_with, None);
    assert!(!report.hidden);
}

// ── Poller ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_poller_refreshes_until_shutdown() {
    let server = MockServer::start().await;
    mount_active_modules(&server).await;
    let mut cfg = config(&server);
    cfg.poll_interval = Duration::from_millis(100);
    let mirror = Mirror::with_persistence(cfg, Box::new(Arc::new(MemoryStorage::new()))).unwrap();

    mirror.start().await;
    tokio::time::sleep(Duration::from_millis(350)).await;
    mirror.shutdown().await;

    let polls = server.received_requests().await.unwrap().len();
    assert!(polls >= 2, "expected at least two polls, got {polls}");
    assert_eq!(mirror.apps_snapshot().len(), 4);

    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(server.received_requests().await.unwrap().len(), polls);
}

#[tokio::test]
async fn test_shutdown_cancels_in_flight_poll() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/module"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(active_modules())
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;
    let mut cfg = config(&server);
    cfg.poll_interval = Duration::from_millis(50);
    let mirror = Mirror::with_persistence(cfg, Box::new(MemoryStorage::new())).unwrap();

    mirror.start().await;
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert!(!server.received_requests().await.unwrap().is_empty());

    tokio::time::timeout(Duration::from_secs(1), mirror.shutdown())
        .await
        .expect("shutdown waited on a hanging poll");
    assert!(mirror.apps_snapshot().is_empty());
}

#[tokio::test]
async fn test_shutdown_cancels_start_up_suppression() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ok().set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;
    let mut cfg = config(&server);
    cfg.poll_interval = Duration::ZERO;
    cfg.suppress_on_start = vec!["MMM-QRAccess".into()];
    let mirror = Mirror::with_persistence(cfg, Box::new(MemoryStorage::new())).unwrap();

    mirror.start().await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    tokio::time::timeout(Duration::from_secs(1), mirror.shutdown())
        .await
        .expect("shutdown waited on a hanging suppression");
}

// ── Pass-through ────────────────────────────────────────────────────

#[tokio::test]
async fn test_passthrough_returns_data_or_envelope() {
    let (server, mirror) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/saves"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": ["backup-1"]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/command/shutdown-lights"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "stdout": "done"
        })))
        .mount(&server)
        .await;

    assert_eq!(mirror.config_backups().await.unwrap(), json!(["backup-1"]));
    assert_eq!(
        mirror.execute_command("shutdown-lights").await.unwrap(),
        json!({ "stdout": "done" })
    );
}
