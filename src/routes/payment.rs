use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::models::payment::{
    PaymentAttempt, PaymentOrder, ProviderStatus, ReconciliationState, StatusKeys,
};
use crate::services::quote_service::QuoteService;
use crate::services::reconciliation_service::ReconciliationListener;
use crate::services::references::generate_booking_reference;
use crate::services::wetravel::deposit::compute_deposit;
use crate::services::wetravel::interface::{GatewayError, PaymentGateway};
use crate::services::wetravel::models::PaymentLinkRequest;
use crate::store::sessions::SessionStore;

use super::session::error_response;

/// Request a payment link for the session's current breakdown and start
/// watching for the asynchronous confirmation.
pub async fn checkout(
    store: web::Data<SessionStore>,
    gateway: web::Data<Arc<dyn PaymentGateway>>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let session_id = path.into_inner();
    let session = match store.snapshot(session_id) {
        Ok(session) => session,
        Err(err) => return error_response(err),
    };

    // Validation failures surface before any network call.
    let contact = match &session.contact {
        Some(contact) => contact.clone(),
        None => return HttpResponse::BadRequest().body("Contact information is required"),
    };
    let date_range = match session.date_range {
        Some(range) => range,
        None => return HttpResponse::BadRequest().body("Check-in and check-out are required"),
    };

    let breakdown = QuoteService::quote(&session);
    if breakdown.total <= 0.0 {
        return HttpResponse::BadRequest().body("Nothing to pay for yet");
    }
    let deposit = compute_deposit(&session, &breakdown);

    let room_name = session
        .accommodation
        .as_ref()
        .map(|room| room.room_type_name.clone())
        .unwrap_or_else(|| "Surf Camp".to_string());
    let nights = date_range.nights();
    let title = format!(
        "{} - {} ({} night{}, {} guest{}) - Deposit",
        contact.full_name(),
        room_name,
        nights,
        if nights == 1 { "" } else { "s" },
        session.guest_count,
        if session.guest_count == 1 { "" } else { "s" },
    );
    let reference = generate_booking_reference();
    let days_before_departure = (date_range.check_in - Utc::now().date_naive()).num_days();

    let request = PaymentLinkRequest {
        title,
        internal_reference: reference.clone(),
        check_in: date_range.check_in,
        check_out: date_range.check_out,
        customer_first_name: contact.first_name.clone(),
        customer_last_name: contact.last_name.clone(),
        customer_email: contact.email.clone(),
        full_price: breakdown.total,
        deposit: deposit.total,
        days_before_departure,
    };

    match gateway.create_payment_link(&request).await {
        Ok(link) => {
            let order = PaymentOrder {
                order_id: link.order_id.clone(),
                trip_id: link.trip_id.clone(),
                trip_uuid: link.trip_uuid.clone(),
                status: ProviderStatus::Pending,
                deposit_amount: deposit.total,
                remaining_amount: breakdown.total - deposit.total,
                payment_url: link.payment_url.clone(),
                created_at: Utc::now(),
            };
            if let Err(err) = store.begin_payment(session_id, PaymentAttempt::new(order)) {
                return error_response(err);
            }

            let keys = StatusKeys {
                order_id: link.order_id.clone(),
                trip_id: link.trip_id.clone(),
                trip_uuid: link.trip_uuid.clone(),
            };
            let listener = ReconciliationListener::start(
                gateway.get_ref().clone(),
                store.get_ref().clone(),
                session_id,
                keys,
            );
            store.install_listener(session_id, listener);

            HttpResponse::Ok().json(json!({
                "success": true,
                "payment_url": link.payment_url,
                "order_id": link.order_id,
                "trip_id": link.trip_id,
                "trip_uuid": link.trip_uuid,
                "deposit_amount": deposit.total,
                "remaining_amount": breakdown.total - deposit.total,
                "state": ReconciliationState::WaitingForPayment,
                "demo_mode": false,
            }))
        }
        Err(GatewayError::NotConfigured) => {
            // Fully offline confirmation: the user still gets a reference,
            // clearly marked as a demo one.
            println!("Payment gateway not configured, issuing demo confirmation");
            let order_id = format!("DEMO-{}", reference);
            let order = PaymentOrder {
                order_id: order_id.clone(),
                trip_id: None,
                trip_uuid: None,
                status: ProviderStatus::Completed,
                deposit_amount: deposit.total,
                remaining_amount: breakdown.total - deposit.total,
                payment_url: String::new(),
                created_at: Utc::now(),
            };
            let mut attempt = PaymentAttempt::new(order);
            attempt.state = ReconciliationState::Success;
            if let Err(err) = store.begin_payment(session_id, attempt) {
                return error_response(err);
            }
            HttpResponse::Ok().json(json!({
                "success": true,
                "payment_url": serde_json::Value::Null,
                "order_id": order_id,
                "deposit_amount": deposit.total,
                "state": ReconciliationState::Success,
                "demo_mode": true,
            }))
        }
        Err(err) => {
            eprintln!("Failed to create payment link: {:?}", err);
            HttpResponse::BadGateway().body("Failed to create payment link")
        }
    }
}

pub async fn get_payment(
    store: web::Data<SessionStore>,
    path: web::Path<Uuid>,
) -> impl Responder {
    match store.snapshot(path.into_inner()) {
        Ok(session) => match session.payment {
            Some(attempt) => HttpResponse::Ok().json(attempt),
            None => HttpResponse::Ok().json(json!({ "state": ReconciliationState::Idle })),
        },
        Err(err) => error_response(err),
    }
}

/// Restart the watchers for an existing payment attempt, e.g. after the
/// 10-minute watch window lapsed with the order still unpaid.
pub async fn restart_watch(
    store: web::Data<SessionStore>,
    gateway: web::Data<Arc<dyn PaymentGateway>>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let session_id = path.into_inner();
    let attempt = match store.payment_snapshot(session_id) {
        Ok(attempt) => attempt,
        Err(err) => return error_response(err),
    };
    if attempt.state.is_terminal() {
        return HttpResponse::Conflict().body("Payment attempt already settled");
    }

    let keys = StatusKeys {
        order_id: attempt.order.order_id.clone(),
        trip_id: attempt.order.trip_id.clone(),
        trip_uuid: attempt.order.trip_uuid.clone(),
    };
    let listener = ReconciliationListener::start(
        gateway.get_ref().clone(),
        store.get_ref().clone(),
        session_id,
        keys,
    );
    store.install_listener(session_id, listener);
    HttpResponse::Ok().json(json!({ "watching": true, "order_id": attempt.order.order_id }))
}

/// Tear down the listener for this session's payment attempt: event stream,
/// polling timer and task go together.
pub async fn cancel_payment(
    store: web::Data<SessionStore>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let session_id = path.into_inner();
    if store.snapshot(session_id).is_err() {
        return HttpResponse::NotFound().body("Session not found");
    }
    let cancelled = store.cancel_listener(session_id);
    HttpResponse::Ok().json(json!({ "cancelled": cancelled }))
}
