//! Inventory audit integration tests
//!
//! The counting workflow end to end: open a session, record per-asset
//! determinations, watch the progress arithmetic, and close the session
//! exactly once. Results never relocate anything.

use crate::common::{seed_asset, seed_catalog, warehouse_location, Catalog, TestApp};
use serde_json::json;
use uuid::Uuid;

async fn open_session(app: &TestApp, token: &str, scope: serde_json::Value) -> serde_json::Value {
    let response = app
        .post_json_auth(
            "/api/v1/inventory/sessions",
            json!({ "description": "Quarterly count", "device_type_codes": scope }),
            token,
        )
        .await;
    response.assert_created();
    response.json()
}

async fn seed_assets(
    app: &TestApp,
    token: &str,
    catalog: &Catalog,
    laptops: usize,
    monitors: usize,
) -> Vec<serde_json::Value> {
    let mut assets = Vec::new();
    for _ in 0..laptops {
        assets.push(
            seed_asset(app, token, catalog, "01", warehouse_location(catalog.warehouse_id)).await,
        );
    }
    for _ in 0..monitors {
        assets.push(
            seed_asset(app, token, catalog, "02", warehouse_location(catalog.warehouse_id)).await,
        );
    }
    assets
}

#[tokio::test]
async fn test_open_session_starts_unscoped_and_open() {
    let app = TestApp::new().await;
    let token = app.admin_token();
    seed_catalog(&app, &token).await;

    let session = open_session(&app, &token, json!([])).await;

    assert_eq!(session["description"], "Quarterly count");
    assert_eq!(session["device_type_codes"], json!([]));
    assert!(session["completed_at"].is_null());
    assert!(session.get("started_at").is_some());
}

#[tokio::test]
async fn test_session_scope_must_name_known_device_types() {
    let app = TestApp::new().await;
    let token = app.admin_token();
    seed_catalog(&app, &token).await;

    let response = app
        .post_json_auth(
            "/api/v1/inventory/sessions",
            json!({ "device_type_codes": ["01", "77"] }),
            &token,
        )
        .await;
    response.assert_bad_request();
}

#[tokio::test]
async fn test_scope_is_deduplicated_and_sorted() {
    let app = TestApp::new().await;
    let token = app.admin_token();
    seed_catalog(&app, &token).await;

    let session = open_session(&app, &token, json!(["02", "01", "02"])).await;
    assert_eq!(session["device_type_codes"], json!(["01", "02"]));
}

#[tokio::test]
async fn test_progress_counts_only_in_scope_assets() {
    let app = TestApp::new().await;
    let token = app.admin_token();
    let catalog = seed_catalog(&app, &token).await;
    seed_assets(&app, &token, &catalog, 3, 2).await;

    let everything = open_session(&app, &token, json!([])).await;
    let progress: serde_json::Value = app
        .get_auth(
            &format!(
                "/api/v1/inventory/sessions/{}/progress",
                everything["id"].as_str().unwrap()
            ),
            &token,
        )
        .await
        .json();
    assert_eq!(progress["total"], 5);
    assert_eq!(progress["checked"], 0);
    assert_eq!(progress["remaining"], 5);

    let laptops_only = open_session(&app, &token, json!(["01"])).await;
    let progress: serde_json::Value = app
        .get_auth(
            &format!(
                "/api/v1/inventory/sessions/{}/progress",
                laptops_only["id"].as_str().unwrap()
            ),
            &token,
        )
        .await
        .json();
    assert_eq!(progress["total"], 3);
}

#[tokio::test]
async fn test_record_results_moves_progress() {
    let app = TestApp::new().await;
    let token = app.admin_token();
    let catalog = seed_catalog(&app, &token).await;
    let assets = seed_assets(&app, &token, &catalog, 3, 0).await;

    let session = open_session(&app, &token, json!([])).await;
    let session_id = session["id"].as_str().unwrap();

    for asset in assets.iter().take(2) {
        app.post_json_auth(
            &format!("/api/v1/inventory/sessions/{}/results", session_id),
            json!({ "asset_id": asset["id"], "found": true }),
            &token,
        )
        .await
        .assert_created();
    }

    let progress: serde_json::Value = app
        .get_auth(
            &format!("/api/v1/inventory/sessions/{}/progress", session_id),
            &token,
        )
        .await
        .json();
    assert_eq!(progress["checked"], 2);
    assert_eq!(progress["total"], 3);
    assert_eq!(progress["remaining"], 1);

    let remaining: Vec<serde_json::Value> = app
        .get_auth(
            &format!("/api/v1/inventory/sessions/{}/remaining", session_id),
            &token,
        )
        .await
        .json();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["id"], assets[2]["id"]);
}

#[tokio::test]
async fn test_found_result_defaults_to_recorded_location() {
    let app = TestApp::new().await;
    let token = app.admin_token();
    let catalog = seed_catalog(&app, &token).await;
    let asset = seed_asset(
        &app,
        &token,
        &catalog,
        "01",
        warehouse_location(catalog.warehouse_id),
    )
    .await;

    let session = open_session(&app, &token, json!([])).await;
    let response = app
        .post_json_auth(
            &format!(
                "/api/v1/inventory/sessions/{}/results",
                session["id"].as_str().unwrap()
            ),
            json!({ "asset_id": asset["id"], "found": true }),
            &token,
        )
        .await;
    response.assert_created();
    let result: serde_json::Value = response.json();
    assert_eq!(result["found"], true);
    assert_eq!(result["observed_location"]["kind"], "warehouse");
    assert_eq!(
        result["observed_location"]["id"],
        catalog.warehouse_id.to_string()
    );
}

#[tokio::test]
async fn test_found_elsewhere_is_recorded_but_does_not_move() {
    let app = TestApp::new().await;
    let token = app.admin_token();
    let catalog = seed_catalog(&app, &token).await;
    let asset = seed_asset(
        &app,
        &token,
        &catalog,
        "01",
        warehouse_location(catalog.warehouse_id),
    )
    .await;

    let session = open_session(&app, &token, json!([])).await;
    let response = app
        .post_json_auth(
            &format!(
                "/api/v1/inventory/sessions/{}/results",
                session["id"].as_str().unwrap()
            ),
            json!({
                "asset_id": asset["id"],
                "found": true,
                "observed_location": { "kind": "warehouse", "id": catalog.second_warehouse_id },
            }),
            &token,
        )
        .await;
    response.assert_created();
    assert_eq!(
        response.json::<serde_json::Value>()["observed_location"]["id"],
        catalog.second_warehouse_id.to_string()
    );

    // The directory still has the asset where it was
    let fetched: serde_json::Value = app
        .get_auth(
            &format!("/api/v1/assets/{}", asset["id"].as_str().unwrap()),
            &token,
        )
        .await
        .json();
    assert_eq!(fetched["location"]["id"], catalog.warehouse_id.to_string());

    // And no ledger entry appeared
    let history: Vec<serde_json::Value> = app
        .get_auth(
            &format!("/api/v1/movements/{}", asset["id"].as_str().unwrap()),
            &token,
        )
        .await
        .json();
    assert!(history.is_empty());
}

#[tokio::test]
async fn test_not_found_result_carries_no_location() {
    let app = TestApp::new().await;
    let token = app.admin_token();
    let catalog = seed_catalog(&app, &token).await;
    let asset = seed_asset(
        &app,
        &token,
        &catalog,
        "01",
        warehouse_location(catalog.warehouse_id),
    )
    .await;

    let session = open_session(&app, &token, json!([])).await;
    let response = app
        .post_json_auth(
            &format!(
                "/api/v1/inventory/sessions/{}/results",
                session["id"].as_str().unwrap()
            ),
            json!({ "asset_id": asset["id"], "found": false }),
            &token,
        )
        .await;
    response.assert_created();
    let result: serde_json::Value = response.json();
    assert_eq!(result["found"], false);
    assert!(result["observed_location"].is_null());
}

#[tokio::test]
async fn test_rescan_overwrites_in_place() {
    let app = TestApp::new().await;
    let token = app.admin_token();
    let catalog = seed_catalog(&app, &token).await;
    let asset = seed_asset(
        &app,
        &token,
        &catalog,
        "01",
        warehouse_location(catalog.warehouse_id),
    )
    .await;

    let session = open_session(&app, &token, json!([])).await;
    let session_id = session["id"].as_str().unwrap();
    let results_uri = format!("/api/v1/inventory/sessions/{}/results", session_id);

    let first: serde_json::Value = app
        .post_json_auth(
            &results_uri,
            json!({ "asset_id": asset["id"], "found": false }),
            &token,
        )
        .await
        .json();

    let second: serde_json::Value = app
        .post_json_auth(
            &results_uri,
            json!({ "asset_id": asset["id"], "found": true }),
            &token,
        )
        .await
        .json();

    // Same row, updated determination
    assert_eq!(first["id"], second["id"]);
    assert_eq!(second["found"], true);

    let checked: Vec<serde_json::Value> = app.get_auth(&results_uri, &token).await.json();
    assert_eq!(checked.len(), 1);
    assert_eq!(checked[0]["found"], true);

    let progress: serde_json::Value = app
        .get_auth(
            &format!("/api/v1/inventory/sessions/{}/progress", session_id),
            &token,
        )
        .await
        .json();
    assert_eq!(progress["checked"], 1);
}

#[tokio::test]
async fn test_out_of_scope_asset_is_rejected() {
    let app = TestApp::new().await;
    let token = app.admin_token();
    let catalog = seed_catalog(&app, &token).await;
    let monitor = seed_asset(
        &app,
        &token,
        &catalog,
        "02",
        warehouse_location(catalog.warehouse_id),
    )
    .await;

    let session = open_session(&app, &token, json!(["01"])).await;
    app.post_json_auth(
        &format!(
            "/api/v1/inventory/sessions/{}/results",
            session["id"].as_str().unwrap()
        ),
        json!({ "asset_id": monitor["id"], "found": true }),
        &token,
    )
    .await
    .assert_bad_request();
}

#[tokio::test]
async fn test_unknown_observed_location_is_rejected() {
    let app = TestApp::new().await;
    let token = app.admin_token();
    let catalog = seed_catalog(&app, &token).await;
    let asset = seed_asset(
        &app,
        &token,
        &catalog,
        "01",
        warehouse_location(catalog.warehouse_id),
    )
    .await;

    let session = open_session(&app, &token, json!([])).await;
    app.post_json_auth(
        &format!(
            "/api/v1/inventory/sessions/{}/results",
            session["id"].as_str().unwrap()
        ),
        json!({
            "asset_id": asset["id"],
            "found": true,
            "observed_location": { "kind": "employee", "id": Uuid::new_v4() },
        }),
        &token,
    )
    .await
    .assert_bad_request();
}

#[tokio::test]
async fn test_complete_session_freezes_results() {
    let app = TestApp::new().await;
    let token = app.admin_token();
    let catalog = seed_catalog(&app, &token).await;
    let asset = seed_asset(
        &app,
        &token,
        &catalog,
        "01",
        warehouse_location(catalog.warehouse_id),
    )
    .await;

    let session = open_session(&app, &token, json!([])).await;
    let session_id = session["id"].as_str().unwrap();

    let completed = app
        .put_json_auth(
            &format!("/api/v1/inventory/sessions/{}/complete", session_id),
            json!({}),
            &token,
        )
        .await;
    completed.assert_ok();
    assert!(!completed.json::<serde_json::Value>()["completed_at"].is_null());

    // Results are frozen after completion
    let response = app
        .post_json_auth(
            &format!("/api/v1/inventory/sessions/{}/results", session_id),
            json!({ "asset_id": asset["id"], "found": true }),
            &token,
        )
        .await;
    response.assert_conflict();
    assert_eq!(
        response.json::<serde_json::Value>()["error"],
        "session_closed"
    );

    // Progress stays readable on a closed session; the uncounted asset
    // still shows as remaining
    let progress: serde_json::Value = app
        .get_auth(
            &format!("/api/v1/inventory/sessions/{}/progress", session_id),
            &token,
        )
        .await
        .json();
    assert_eq!(progress["checked"], 0);
    assert_eq!(progress["remaining"], 1);
}

#[tokio::test]
async fn test_completing_twice_conflicts() {
    let app = TestApp::new().await;
    let token = app.admin_token();
    seed_catalog(&app, &token).await;

    let session = open_session(&app, &token, json!([])).await;
    let uri = format!(
        "/api/v1/inventory/sessions/{}/complete",
        session["id"].as_str().unwrap()
    );

    app.put_json_auth(&uri, json!({}), &token).await.assert_ok();

    let second = app.put_json_auth(&uri, json!({}), &token).await;
    second.assert_conflict();
    assert_eq!(
        second.json::<serde_json::Value>()["error"],
        "session_already_closed"
    );
}

#[tokio::test]
async fn test_sessions_list_newest_first() {
    let app = TestApp::new().await;
    let token = app.admin_token();
    seed_catalog(&app, &token).await;

    let first = open_session(&app, &token, json!([])).await;
    let second = open_session(&app, &token, json!(["01"])).await;

    let sessions: Vec<serde_json::Value> = app
        .get_auth("/api/v1/inventory/sessions", &token)
        .await
        .json();
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0]["id"], second["id"]);
    assert_eq!(sessions[1]["id"], first["id"]);
}

#[tokio::test]
async fn test_unknown_session_is_404() {
    let app = TestApp::new().await;
    let token = app.admin_token();

    app.get_auth(
        &format!("/api/v1/inventory/sessions/{}", Uuid::new_v4()),
        &token,
    )
    .await
    .assert_not_found();

    app.get_auth(
        &format!("/api/v1/inventory/sessions/{}/progress", Uuid::new_v4()),
        &token,
    )
    .await
    .assert_not_found();
}

#[tokio::test]
async fn test_record_result_for_unknown_asset_is_404() {
    let app = TestApp::new().await;
    let token = app.admin_token();
    seed_catalog(&app, &token).await;

    let session = open_session(&app, &token, json!([])).await;
    app.post_json_auth(
        &format!(
            "/api/v1/inventory/sessions/{}/results",
            session["id"].as_str().unwrap()
        ),
        json!({ "asset_id": Uuid::new_v4(), "found": true }),
        &token,
    )
    .await
    .assert_not_found();
}
