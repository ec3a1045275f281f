// HTTP API tests for Homescope

use actix_web::{test, web, App};
use homescope::config::Settings;
use homescope::routes::{self, AppState};
use homescope::services::MemoryStore;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

fn create_state() -> AppState {
    let mut settings = Settings::default();
    settings.data.fixtures_dir = PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures"));
    settings.contact.email_failure_rate = 0.0;

    let store = MemoryStore::from_fixtures(
        &settings.data.fixtures_dir,
        &settings.tables,
        Duration::ZERO,
    )
    .unwrap();
    AppState::build(Arc::new(store), &settings)
}

macro_rules! init_app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(create_state()))
                .configure(routes::configure_app),
        )
        .await
    };
}

#[actix_web::test]
async fn test_health_reports_backend() {
    let app = init_app!();
    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["backend"], "memory");
    assert!(body["cache"]["entries"].is_u64());
    assert_eq!(body["cache"]["generation"], 0);
}

#[actix_web::test]
async fn test_search_endpoint() {
    let app = init_app!();
    let req = test::TestRequest::get()
        .uri("/api/v1/properties?location=Austin&bedrooms=1&propertyTypes=Condo,Townhouse")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let ids: Vec<i64> = body["properties"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|p| p["Id"].as_i64())
        .collect();
    assert_eq!(ids, vec![1, 3]);
    assert_eq!(body["total_results"], 2);
    assert_eq!(body["active_filters"], 2);
}

#[actix_web::test]
async fn test_featured_route_is_not_an_id() {
    let app = init_app!();
    let req = test::TestRequest::get()
        .uri("/api/v1/properties/featured")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.as_array().map(Vec::len), Some(6));
}

#[actix_web::test]
async fn test_invalid_and_missing_property() {
    let app = init_app!();

    let req = test::TestRequest::get().uri("/api/v1/properties/abc").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_id");
    assert_eq!(body["message"], "Invalid property ID");

    let req = test::TestRequest::get().uri("/api/v1/properties/999").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_compare_requires_user_header() {
    let app = init_app!();
    let req = test::TestRequest::get().uri("/api/v1/compare").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "missing_user");
}

#[actix_web::test]
async fn test_compare_flow() {
    let app = init_app!();

    for id in 1..=4 {
        let req = test::TestRequest::post()
            .uri("/api/v1/compare")
            .insert_header(("X-User-Id", "buyer-7"))
            .set_json(json!({ "propertyId": id }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);
    }

    let req = test::TestRequest::post()
        .uri("/api/v1/compare")
        .insert_header(("X-User-Id", "buyer-7"))
        .set_json(json!({ "propertyId": 5 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 409);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Maximum 4 properties can be compared at once");

    let req = test::TestRequest::get()
        .uri("/api/v1/compare")
        .insert_header(("X-User-Id", "buyer-7"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 4);
    assert_eq!(body["max_items"], 4);

    let req = test::TestRequest::delete()
        .uri("/api/v1/compare")
        .insert_header(("X-User-Id", "buyer-7"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
}

#[actix_web::test]
async fn test_favorite_round_trip() {
    let app = init_app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/favorites")
        .insert_header(("X-User-Id", "buyer-1"))
        .set_json(json!({ "propertyId": 6 }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["property_id"], 6);

    let req = test::TestRequest::delete()
        .uri("/api/v1/favorites/6")
        .insert_header(("X-User-Id", "buyer-1"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let req = test::TestRequest::delete()
        .uri("/api/v1/favorites/6")
        .insert_header(("X-User-Id", "buyer-1"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_contact_agent_endpoint() {
    let app = init_app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/agents/1/contact")
        .set_json(json!({ "contactMethod": "phone", "message": "Call me" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["contactMethod"], "phone");
    assert_eq!(body["agentInfo"]["phone"], "(512) 555-0143");

    let req = test::TestRequest::post()
        .uri("/api/v1/agents/1/contact")
        .set_json(json!({ "contactMethod": "carrier pigeon" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let req = test::TestRequest::post()
        .uri("/api/v1/agents/3/contact")
        .set_json(json!({ "contactMethod": "email" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 422);
}

#[actix_web::test]
async fn test_malformed_json_body() {
    let app = init_app!();
    let req = test::TestRequest::post()
        .uri("/api/v1/favorites")
        .insert_header(("X-User-Id", "buyer-1"))
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_json");
}

#[actix_web::test]
async fn test_agent_specialties_and_neighborhood() {
    let app = init_app!();

    let req = test::TestRequest::get()
        .uri("/api/v1/agents/specialties")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body.as_array().unwrap().contains(&json!("Relocation")));

    let req = test::TestRequest::get()
        .uri("/api/v1/properties/2/neighborhood")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["nearest_station"], "Howard Station");
}
