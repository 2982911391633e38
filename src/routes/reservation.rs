use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::session::{ContactInfo, Participant};
use crate::services::catalog_service;
use crate::services::lobby::client::LobbyClient;
use crate::services::notification_service::NotificationService;
use crate::services::reservation_service::{
    ReservationError, ReservationRequest, ReservationService,
};
use crate::store::sessions::SessionStore;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReserveInput {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
    pub room_type_id: String,
    pub contact_info: ContactInfo,
    #[serde(default)]
    pub session_id: Option<Uuid>,
    #[serde(default)]
    pub activity_ids: Vec<String>,
}

/// Build a stand-in participant for stateless callers that only send
/// activity ids. Unknown ids are dropped; defaults apply.
fn participant_from_activity_ids(activity_ids: &[String]) -> Participant {
    let mut participant = Participant::new("Guest", true);
    for activity_id in activity_ids {
        if catalog_service::get_activity(activity_id).is_none() {
            continue;
        }
        if !participant.has_selected(activity_id) {
            participant.selected_activities.push(activity_id.clone());
        }
    }
    participant
}

pub async fn create_reservation(
    store: web::Data<SessionStore>,
    lobby: web::Data<Arc<LobbyClient>>,
    notifier: web::Data<Arc<NotificationService>>,
    input: web::Json<ReserveInput>,
) -> impl Responder {
    let input = input.into_inner();

    let participants = match input.session_id {
        Some(session_id) => match store.snapshot(session_id) {
            Ok(session) => session.participants,
            Err(_) => return HttpResponse::NotFound().body("Session not found"),
        },
        None => vec![participant_from_activity_ids(&input.activity_ids)],
    };

    let request = ReservationRequest {
        check_in: input.check_in,
        check_out: input.check_out,
        guests: input.guests,
        room_type_id: input.room_type_id,
        contact: input.contact_info,
        participants,
    };

    match ReservationService::create(lobby.as_ref(), notifier.as_ref(), &request).await {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(ReservationError::Validation(message)) => HttpResponse::BadRequest().body(message),
    }
}
