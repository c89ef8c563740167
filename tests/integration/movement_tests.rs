//! Movement ledger integration tests
//!
//! Relocations append to the ledger and update the directory together;
//! the per-asset history reads back oldest first with no gaps.

use crate::common::{seed_asset, seed_catalog, warehouse_location, TestApp};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_relocate_asset_updates_directory() {
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

    let response = app
        .post_json_auth(
            "/api/v1/movements",
            json!({
                "asset_id": asset["id"],
                "to": { "kind": "employee", "id": catalog.employee_id },
            }),
            &token,
        )
        .await;
    response.assert_created();
    let movement: serde_json::Value = response.json();
    assert_eq!(movement["from"]["kind"], "warehouse");
    assert_eq!(movement["from"]["id"], catalog.warehouse_id.to_string());
    assert_eq!(movement["to"]["kind"], "employee");
    assert_eq!(movement["to"]["id"], catalog.employee_id.to_string());

    // The directory now reports the new location
    let fetched: serde_json::Value = app
        .get_auth(
            &format!("/api/v1/assets/{}", asset["id"].as_str().unwrap()),
            &token,
        )
        .await
        .json();
    assert_eq!(fetched["location"]["kind"], "employee");
    assert_eq!(fetched["location"]["id"], catalog.employee_id.to_string());
}

#[tokio::test]
async fn test_history_chains_without_gaps() {
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
    let asset_id = asset["id"].as_str().unwrap();

    for to in [
        json!({ "kind": "employee", "id": catalog.employee_id }),
        json!({ "kind": "warehouse", "id": catalog.second_warehouse_id }),
        json!({ "kind": "warehouse", "id": catalog.warehouse_id }),
    ] {
        app.post_json_auth(
            "/api/v1/movements",
            json!({ "asset_id": asset_id, "to": to }),
            &token,
        )
        .await
        .assert_created();
    }

    let history: Vec<serde_json::Value> = app
        .get_auth(&format!("/api/v1/movements/{}", asset_id), &token)
        .await
        .json();
    assert_eq!(history.len(), 3);

    // Oldest first, starting at the registration location
    assert_eq!(history[0]["from"]["id"], catalog.warehouse_id.to_string());
    for pair in history.windows(2) {
        assert_eq!(pair[1]["from"], pair[0]["to"]);
    }
    assert_eq!(
        history.last().unwrap()["to"]["id"],
        catalog.warehouse_id.to_string()
    );
}

#[tokio::test]
async fn test_history_for_unmoved_asset_is_empty() {
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
async fn test_no_op_move_is_rejected() {
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

    let response = app
        .post_json_auth(
            "/api/v1/movements",
            json!({
                "asset_id": asset["id"],
                "to": { "kind": "warehouse", "id": catalog.warehouse_id },
            }),
            &token,
        )
        .await;
    response.assert_bad_request();
    assert_eq!(response.json::<serde_json::Value>()["error"], "no_op_move");

    // Nothing was written
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
async fn test_move_to_unknown_destination_is_rejected() {
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

    for to in [
        json!({ "kind": "warehouse", "id": Uuid::new_v4() }),
        json!({ "kind": "employee", "id": Uuid::new_v4() }),
    ] {
        let response = app
            .post_json_auth(
                "/api/v1/movements",
                json!({ "asset_id": asset["id"], "to": to }),
                &token,
            )
            .await;
        response.assert_bad_request();
        assert_eq!(
            response.json::<serde_json::Value>()["error"],
            "invalid_destination"
        );
    }
}

#[tokio::test]
async fn test_move_unknown_asset_is_404() {
    let app = TestApp::new().await;
    let token = app.admin_token();
    let catalog = seed_catalog(&app, &token).await;

    app.post_json_auth(
        "/api/v1/movements",
        json!({
            "asset_id": Uuid::new_v4(),
            "to": { "kind": "warehouse", "id": catalog.warehouse_id },
        }),
        &token,
    )
    .await
    .assert_not_found();
}

#[tokio::test]
async fn test_history_for_unknown_asset_is_404() {
    let app = TestApp::new().await;
    let token = app.admin_token();

    app.get_auth(&format!("/api/v1/movements/{}", Uuid::new_v4()), &token)
        .await
        .assert_not_found();
}
