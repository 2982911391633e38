mod common;

use actix_web::test;
use serde_json::{json, Value};
use serial_test::serial;

use common::TestApp;

async fn create_ready_session<S, B>(app: &S) -> Value
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<B>,
        Error = actix_web::Error,
    >,
    B: actix_web::body::MessageBody,
    B::Error: std::fmt::Debug,
{
    let req = test::TestRequest::post()
        .uri("/api/sessions")
        .set_json(&json!({
            "guests": 2,
            "checkIn": "2026-09-01",
            "checkOut": "2026-09-04",
            "locale": "en"
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), 200);
    let session: Value = test::read_body_json(resp).await;
    let id = session["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::put()
        .uri(&format!("/api/sessions/{}/accommodation", id))
        .set_json(&json!({
            "roomTypeId": "casa-playa",
            "roomTypeName": "Casa de Playa",
            "nightlyRate": 40.0,
            "capacity": 8,
            "shared": true
        }))
        .to_request();
    assert_eq!(test::call_service(app, req).await.status(), 200);

    let req = test::TestRequest::put()
        .uri(&format!("/api/sessions/{}/contact", id))
        .set_json(&json!({
            "firstName": "Ana",
            "lastName": "Pérez",
            "email": "ana@example.com",
            "phone": "+54 911 6280 2566",
            "dni": "30123456"
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), 200);
    test::read_body_json(resp).await
}

#[actix_rt::test]
#[serial]
async fn test_checkout_requires_contact_information() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/sessions")
        .set_json(&json!({
            "guests": 1,
            "checkIn": "2026-09-01",
            "checkOut": "2026-09-04"
        }))
        .to_request();
    let session: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let id = session["id"].as_str().unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{}/checkout", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
#[serial]
async fn test_checkout_without_gateway_issues_demo_confirmation() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let session = create_ready_session(&app).await;
    let id = session["id"].as_str().unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{}/checkout", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;

    assert_eq!(body["success"], true);
    assert_eq!(body["demo_mode"], true);
    assert_eq!(body["state"], "success");
    assert!(body["order_id"].as_str().unwrap().starts_with("DEMO-SC-"));
    // 10% of $240 accommodation.
    assert_eq!(body["deposit_amount"], 24.0);
}

#[actix_rt::test]
#[serial]
async fn test_payment_state_is_idle_before_checkout() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let session = create_ready_session(&app).await;
    let id = session["id"].as_str().unwrap();

    let req = test::TestRequest::get()
        .uri(&format!("/api/sessions/{}/payment", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["state"], "idle");
}

#[actix_rt::test]
#[serial]
async fn test_payment_state_persists_after_demo_checkout() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let session = create_ready_session(&app).await;
    let id = session["id"].as_str().unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{}/checkout", id))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);

    let req = test::TestRequest::get()
        .uri(&format!("/api/sessions/{}/payment", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["state"], "success");
    assert_eq!(body["order"]["status"], "completed");
}

#[actix_rt::test]
#[serial]
async fn test_cancel_without_listener_reports_nothing_to_cancel() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let session = create_ready_session(&app).await;
    let id = session["id"].as_str().unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{}/payment/cancel", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["cancelled"], false);
}

#[actix_rt::test]
#[serial]
async fn test_watch_without_attempt_is_not_found() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let session = create_ready_session(&app).await;
    let id = session["id"].as_str().unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{}/payment/watch", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_rt::test]
#[serial]
async fn test_watch_after_settled_demo_payment_is_a_conflict() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let session = create_ready_session(&app).await;
    let id = session["id"].as_str().unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{}/checkout", id))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);

    // The demo confirmation is already terminal; nothing left to watch.
    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{}/payment/watch", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 409);
}

#[actix_rt::test]
#[serial]
async fn test_checkout_for_unknown_session_is_not_found() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/sessions/00000000-0000-0000-0000-000000000000/checkout")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}
