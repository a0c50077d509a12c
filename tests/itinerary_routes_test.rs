mod common;

use actix_web::{test, web, App, HttpResponse};
use serde_json::json;
use serial_test::serial;

use common::TestApp;

#[actix_rt::test]
#[serial]
async fn test_generate_rejects_empty_destinations() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/itineraries")
        .set_json(&json!({
            "destinations": [],
            "days": 3,
            "preferences": {"food": true, "culture": false, "nightlife": false},
            "travelerType": "solo"
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    // Generations are never cacheable, failures included
    let cache_control = resp
        .headers()
        .get("Cache-Control")
        .expect("Cache-Control header should be set");
    assert_eq!(cache_control, "no-store");

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Missing destinations");
}

#[actix_rt::test]
#[serial]
async fn test_generate_rejects_absent_destinations_field() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/itineraries")
        .set_json(&json!({
            "days": "3",
            "preferences": {"food": true, "culture": false, "nightlife": false},
            "travelerType": "solo"
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Missing destinations");
}

#[actix_rt::test]
#[serial]
async fn test_generate_without_api_key_is_upstream_failure() {
    std::env::remove_var("OPENAI_API_KEY");

    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/itineraries")
        .set_json(&json!({
            "destinations": ["Paris"],
            "days": 3,
            "preferences": {"food": true, "culture": false, "nightlife": false},
            "travelerType": "solo"
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 500);

    let cache_control = resp
        .headers()
        .get("Cache-Control")
        .expect("Cache-Control header should be set");
    assert_eq!(cache_control, "no-store");

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Failed to generate itinerary");
}

#[actix_rt::test]
#[serial]
async fn test_get_by_invalid_id() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get()
        .uri("/api/itineraries/not-an-object-id")
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid ID");
}

#[actix_rt::test]
#[serial]
async fn test_delete_with_invalid_id() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::delete()
        .uri("/api/itineraries")
        .set_json(&json!({"id": "not-an-object-id"}))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
#[serial]
async fn test_delete_nonexistent_id_succeeds() {
    let test_app = TestApp::new().await;

    // The idempotency contract needs a reachable database; skip quietly
    // when the test environment has none.
    let ping = test_app
        .client
        .database("Itineraries")
        .run_command(mongodb::bson::doc! {"ping": 1})
        .await;
    if ping.is_err() {
        println!("Skipping delete idempotency check: database unreachable");
        return;
    }

    let app = test::init_service(test_app.create_app()).await;

    // Well-formed ObjectId that no row carries; no existence check is made,
    // so the delete reports success either way.
    let req = test::TestRequest::delete()
        .uri("/api/itineraries")
        .set_json(&json!({"id": "507f1f77bcf86cd799439011"}))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
}

#[actix_rt::test]
#[serial]
async fn test_health_endpoint_reports_services() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get().uri("/health").to_request();

    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    // Overall status may be degraded when backing services are unreachable
    // from the test environment, but the shape is always the same.
    assert!(body["status"].is_string());
    assert!(body["services"]["mongodb"]["status"].is_string());
    assert!(body["services"]["openai"]["status"].is_string());
}

async fn mock_completion() -> HttpResponse {
    let content = r#"[{"day":1,"location":"Paris, France","activities":[{"time":"Morning","description":"Visit the Louvre"}]}]"#;
    HttpResponse::Ok().json(json!({
        "choices": [{
            "message": {"role": "assistant", "content": content}
        }]
    }))
}

#[actix_rt::test]
#[serial]
async fn test_generate_with_mocked_completion_service() {
    // Stand-in for the completion endpoint, reachable via OPENAI_BASE_URL.
    let server = actix_web::HttpServer::new(|| {
        App::new().route("/chat/completions", web::post().to(mock_completion))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("failed to bind mock completion server");
    let addr = server.addrs()[0];
    let server = server.run();
    let server_handle = server.handle();
    actix_rt::spawn(server);

    std::env::set_var("OPENAI_API_KEY", "test-key");
    std::env::set_var("OPENAI_BASE_URL", format!("http://{}", addr));

    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/itineraries")
        .set_json(&json!({
            "destinations": ["Paris"],
            "days": 3,
            "preferences": {"food": true, "culture": false, "nightlife": false},
            "travelerType": "solo"
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["itinerary"][0]["day"], 1);
    assert_eq!(body["itinerary"][0]["location"], "Paris, France");
    assert_eq!(
        body["itinerary"][0]["activities"][0]["description"],
        "Visit the Louvre"
    );
    // Persistence may or may not be reachable from the test environment;
    // either a new id or the degraded saveError marker must come back.
    assert!(body["id"].is_string() || body["saveError"].is_string());

    server_handle.stop(true).await;
    std::env::remove_var("OPENAI_API_KEY");
    std::env::remove_var("OPENAI_BASE_URL");
}
