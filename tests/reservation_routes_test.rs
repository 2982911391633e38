mod common;

use actix_web::test;
use serde_json::{json, Value};
use serial_test::serial;

use common::TestApp;

fn reserve_body() -> Value {
    json!({
        "checkIn": "2026-09-01",
        "checkOut": "2026-09-04",
        "guests": 2,
        "roomTypeId": "casa-playa",
        "contactInfo": {
            "firstName": "Ana",
            "lastName": "Pérez",
            "email": "ana@example.com",
            "phone": "+54 911 6280 2566",
            "dni": "30123456"
        },
        "activityIds": ["surf-program", "ice-bath-session"]
    })
}

#[actix_rt::test]
#[serial]
async fn test_reserve_with_unknown_room_type_is_rejected() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let mut body = reserve_body();
    body["roomTypeId"] = json!("penthouse");
    let req = test::TestRequest::post()
        .uri("/api/reserve")
        .set_json(&body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
#[serial]
async fn test_reserve_with_invalid_contact_is_rejected() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let mut body = reserve_body();
    body["contactInfo"]["email"] = json!("not-an-email");
    let req = test::TestRequest::post()
        .uri("/api/reserve")
        .set_json(&body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
#[serial]
async fn test_reserve_without_pms_degrades_to_demo_confirmation() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/reserve")
        .set_json(&reserve_body())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["demo_mode"], true);
    assert_eq!(body["status"], "pending_manual_processing");
    assert!(body["reservation_id"]
        .as_str()
        .unwrap()
        .starts_with("DEMO-SC-"));
    assert!(body["booking_reference"].as_str().unwrap().starts_with("SC-"));
}

#[actix_rt::test]
#[serial]
async fn test_reserve_with_zero_nights_is_rejected() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let mut body = reserve_body();
    body["checkOut"] = json!("2026-09-01");
    let req = test::TestRequest::post()
        .uri("/api/reserve")
        .set_json(&body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}
