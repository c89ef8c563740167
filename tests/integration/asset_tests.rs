//! Asset directory integration tests
//!
//! Registration with generated inventory numbers, directory filters,
//! descriptive updates and scan resolution.

use crate::common::{
    asset_payload, employee_location, seed_asset, seed_catalog, warehouse_location, TestApp,
};
use assettrack::utils::inventory_code::validate_inventory_number;
use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_register_asset_generates_inventory_number() {
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

    assert_eq!(asset["inventory_number"], "WWP-01/0001");
    assert!(validate_inventory_number(
        asset["inventory_number"].as_str().unwrap()
    ));
    assert_eq!(asset["company_code"], "WWP");
    assert_eq!(asset["device_type_code"], "01");
    assert_eq!(asset["location"]["kind"], "warehouse");
    assert_eq!(
        asset["location"]["id"],
        catalog.warehouse_id.to_string()
    );
}

#[tokio::test]
async fn test_sequences_are_scoped_per_prefix() {
    let app = TestApp::new().await;
    let token = app.admin_token();
    let catalog = seed_catalog(&app, &token).await;
    let location = || warehouse_location(catalog.warehouse_id);

    let first = seed_asset(&app, &token, &catalog, "01", location()).await;
    let second = seed_asset(&app, &token, &catalog, "01", location()).await;
    let monitor = seed_asset(&app, &token, &catalog, "02", location()).await;

    assert_eq!(first["inventory_number"], "WWP-01/0001");
    assert_eq!(second["inventory_number"], "WWP-01/0002");
    // The monitor prefix counts on its own
    assert_eq!(monitor["inventory_number"], "WWP-02/0001");
}

#[tokio::test]
async fn test_register_asset_with_unknown_codes_fails() {
    let app = TestApp::new().await;
    let token = app.admin_token();
    let catalog = seed_catalog(&app, &token).await;

    app.post_json_auth(
        "/api/v1/assets",
        asset_payload("ZZZ", "01", warehouse_location(catalog.warehouse_id)),
        &token,
    )
    .await
    .assert_bad_request();

    app.post_json_auth(
        "/api/v1/assets",
        asset_payload("WWP", "99", warehouse_location(catalog.warehouse_id)),
        &token,
    )
    .await
    .assert_bad_request();
}

#[tokio::test]
async fn test_register_asset_at_unknown_location_fails() {
    let app = TestApp::new().await;
    let token = app.admin_token();
    let catalog = seed_catalog(&app, &token).await;

    app.post_json_auth(
        "/api/v1/assets",
        asset_payload(
            &catalog.company_code,
            "01",
            warehouse_location(Uuid::new_v4()),
        ),
        &token,
    )
    .await
    .assert_bad_request();
}

#[tokio::test]
async fn test_register_asset_with_empty_serial_fails() {
    let app = TestApp::new().await;
    let token = app.admin_token();
    let catalog = seed_catalog(&app, &token).await;

    let mut payload = asset_payload(
        &catalog.company_code,
        "01",
        warehouse_location(catalog.warehouse_id),
    );
    payload["serial_number"] = json!("");

    app.post_json_auth("/api/v1/assets", payload, &token)
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_duplicate_serial_number_conflicts() {
    let app = TestApp::new().await;
    let token = app.admin_token();
    let catalog = seed_catalog(&app, &token).await;

    let mut payload = asset_payload(
        &catalog.company_code,
        "01",
        warehouse_location(catalog.warehouse_id),
    );
    payload["serial_number"] = json!("SN-DUP");

    app.post_json_auth("/api/v1/assets", payload.clone(), &token)
        .await
        .assert_created();
    app.post_json_auth("/api/v1/assets", payload, &token)
        .await
        .assert_conflict();
}

#[tokio::test]
async fn test_list_assets_with_filters() {
    let app = TestApp::new().await;
    let token = app.admin_token();
    let catalog = seed_catalog(&app, &token).await;

    seed_asset(
        &app,
        &token,
        &catalog,
        "01",
        warehouse_location(catalog.warehouse_id),
    )
    .await;
    seed_asset(
        &app,
        &token,
        &catalog,
        "02",
        warehouse_location(catalog.warehouse_id),
    )
    .await;
    seed_asset(
        &app,
        &token,
        &catalog,
        "01",
        employee_location(catalog.employee_id),
    )
    .await;

    let all: Vec<serde_json::Value> = app.get_auth("/api/v1/assets", &token).await.json();
    assert_eq!(all.len(), 3);

    let laptops: Vec<serde_json::Value> = app
        .get_auth("/api/v1/assets?device_type_code=01", &token)
        .await
        .json();
    assert_eq!(laptops.len(), 2);

    let held: Vec<serde_json::Value> = app
        .get_auth(
            &format!(
                "/api/v1/assets?location_kind=employee&location_id={}",
                catalog.employee_id
            ),
            &token,
        )
        .await
        .json();
    assert_eq!(held.len(), 1);
    assert_eq!(held[0]["location"]["kind"], "employee");
}

#[tokio::test]
async fn test_list_assets_substring_search() {
    let app = TestApp::new().await;
    let token = app.admin_token();
    let catalog = seed_catalog(&app, &token).await;

    let mut payload = asset_payload(
        &catalog.company_code,
        "01",
        warehouse_location(catalog.warehouse_id),
    );
    payload["serial_number"] = json!("SRCH-123456");
    app.post_json_auth("/api/v1/assets", payload, &token)
        .await
        .assert_created();
    seed_asset(
        &app,
        &token,
        &catalog,
        "01",
        warehouse_location(catalog.warehouse_id),
    )
    .await;

    let hits: Vec<serde_json::Value> = app
        .get_auth("/api/v1/assets?q=SRCH-123", &token)
        .await
        .json();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["serial_number"], "SRCH-123456");
}

#[tokio::test]
async fn test_list_assets_pagination() {
    let app = TestApp::new().await;
    let token = app.admin_token();
    let catalog = seed_catalog(&app, &token).await;

    for _ in 0..5 {
        seed_asset(
            &app,
            &token,
            &catalog,
            "01",
            warehouse_location(catalog.warehouse_id),
        )
        .await;
    }

    let page: Vec<serde_json::Value> = app
        .get_auth("/api/v1/assets?limit=2&offset=2", &token)
        .await
        .json();
    assert_eq!(page.len(), 2);
    // Ordered by inventory number, so offset 2 starts at the third asset
    assert_eq!(page[0]["inventory_number"], "WWP-01/0003");
    assert_eq!(page[1]["inventory_number"], "WWP-01/0004");
}

#[tokio::test]
async fn test_get_asset_by_id() {
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
    let id = asset["id"].as_str().unwrap();

    let fetched = app.get_auth(&format!("/api/v1/assets/{}", id), &token).await;
    fetched.assert_ok();
    assert_eq!(
        fetched.json::<serde_json::Value>()["inventory_number"],
        asset["inventory_number"]
    );

    app.get_auth(&format!("/api/v1/assets/{}", Uuid::new_v4()), &token)
        .await
        .assert_not_found();
    app.get_auth("/api/v1/assets/not-a-uuid", &token)
        .await
        .assert_bad_request();
}

#[tokio::test]
async fn test_update_asset_descriptive_fields() {
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
    let id = asset["id"].as_str().unwrap();

    let updated = app
        .put_json_auth(
            &format!("/api/v1/assets/{}", id),
            json!({ "vendor": "Lenovo", "model": "ThinkPad T14" }),
            &token,
        )
        .await;
    updated.assert_ok();
    let updated: serde_json::Value = updated.json();
    assert_eq!(updated["vendor"], "Lenovo");
    assert_eq!(updated["model"], "ThinkPad T14");
    // Untouched fields survive
    assert_eq!(updated["serial_number"], asset["serial_number"]);
    assert_eq!(updated["inventory_number"], asset["inventory_number"]);
}

#[tokio::test]
async fn test_update_cannot_relocate_asset() {
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
    let id = asset["id"].as_str().unwrap();

    // A location key in the update body is not part of the request and is ignored
    let updated = app
        .put_json_auth(
            &format!("/api/v1/assets/{}", id),
            json!({
                "vendor": "Lenovo",
                "location": { "kind": "warehouse", "id": catalog.second_warehouse_id },
            }),
            &token,
        )
        .await;
    updated.assert_ok();
    assert_eq!(
        updated.json::<serde_json::Value>()["location"]["id"],
        catalog.warehouse_id.to_string()
    );
}

// ============================================================================
// Scan resolution
// ============================================================================

#[tokio::test]
async fn test_scan_resolves_inventory_number() {
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

    // The slash in the code must be percent-encoded to stay one path segment
    let encoded = urlencoding::encode("WWP-01/0001");
    let response = app
        .get_auth(&format!("/api/v1/assets/scan/{}", encoded), &token)
        .await;
    response.assert_ok();
    assert_eq!(response.json::<serde_json::Value>()["id"], asset["id"]);
}

#[tokio::test]
async fn test_scan_trims_surrounding_whitespace() {
    let app = TestApp::new().await;
    let token = app.admin_token();
    let catalog = seed_catalog(&app, &token).await;

    seed_asset(
        &app,
        &token,
        &catalog,
        "01",
        warehouse_location(catalog.warehouse_id),
    )
    .await;

    let encoded = urlencoding::encode("  WWP-01/0001  ");
    app.get_auth(&format!("/api/v1/assets/scan/{}", encoded), &token)
        .await
        .assert_ok();
}

#[tokio::test]
async fn test_scan_unknown_code_is_404() {
    let app = TestApp::new().await;
    let token = app.admin_token();
    seed_catalog(&app, &token).await;

    let encoded = urlencoding::encode("WWP-01/9998");
    app.get_auth(&format!("/api/v1/assets/scan/{}", encoded), &token)
        .await
        .assert_not_found();
}

#[tokio::test]
async fn test_scan_blank_code_is_bad_request() {
    let app = TestApp::new().await;
    let token = app.admin_token();

    app.get_auth("/api/v1/assets/scan/%20%20", &token)
        .await
        .assert_bad_request();
}
