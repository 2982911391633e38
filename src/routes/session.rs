use actix_web::{web, HttpResponse, Responder};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::activity::{Locale, TimeSlot};
use crate::models::flow::FlowError;
use crate::models::pricing::{YogaPackage, YogaSelection};
use crate::models::room::SelectedRoom;
use crate::models::session::{ContactInfo, DateRange, GlobalUpgrades};
use crate::services::quote_service::QuoteService;
use crate::store::sessions::{SessionError, SessionStore};

/// One place mapping store errors onto HTTP responses.
pub(crate) fn error_response(err: SessionError) -> HttpResponse {
    match err {
        SessionError::SessionNotFound => HttpResponse::NotFound().body("Session not found"),
        SessionError::ParticipantNotFound => {
            HttpResponse::NotFound().body("Participant not found")
        }
        SessionError::UnknownActivity => HttpResponse::NotFound().body("Activity not found"),
        SessionError::UnknownRoomType => HttpResponse::NotFound().body("Room type not found"),
        SessionError::LeadGuestNotRemovable => {
            HttpResponse::Conflict().body("The lead guest cannot be removed")
        }
        SessionError::LastParticipant => {
            HttpResponse::Conflict().body("The last participant cannot be removed")
        }
        SessionError::MandatoryActivity => {
            HttpResponse::Conflict().body("Surf is mandatory and cannot be deselected")
        }
        SessionError::ActivityNotSelected => {
            HttpResponse::Conflict().body("Activity is not selected for this participant")
        }
        SessionError::InvalidDates => {
            HttpResponse::BadRequest().body("check-out must not precede check-in")
        }
        SessionError::NoPaymentAttempt => {
            HttpResponse::NotFound().body("No payment attempt for this session")
        }
        SessionError::Flow(flow_err) => match flow_err {
            FlowError::MandatoryStep => {
                HttpResponse::Conflict().body("The surf step cannot be skipped")
            }
            FlowError::AtStart => {
                HttpResponse::Conflict().body("Already at the first step")
            }
            FlowError::AlreadyComplete => HttpResponse::Conflict().body("Flow already complete"),
        },
        SessionError::Invalid(message) => HttpResponse::BadRequest().body(message),
    }
}

fn respond_with_session(store: &SessionStore, session_id: Uuid) -> HttpResponse {
    match store.snapshot(session_id) {
        Ok(session) => HttpResponse::Ok().json(session),
        Err(err) => error_response(err),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionInput {
    #[serde(default)]
    pub guests: Option<u32>,
    #[serde(default)]
    pub check_in: Option<NaiveDate>,
    #[serde(default)]
    pub check_out: Option<NaiveDate>,
    #[serde(default)]
    pub locale: Option<Locale>,
}

pub async fn create_session(
    data: web::Data<SessionStore>,
    input: web::Json<CreateSessionInput>,
) -> impl Responder {
    let input = input.into_inner();
    let date_range = match (input.check_in, input.check_out) {
        (Some(check_in), Some(check_out)) => {
            if check_out < check_in {
                return HttpResponse::BadRequest().body("check-out must not precede check-in");
            }
            Some(DateRange {
                check_in,
                check_out,
            })
        }
        _ => None,
    };
    let session_id = data.create_session(
        input.guests.unwrap_or(1),
        date_range,
        input.locale.unwrap_or_default(),
    );
    respond_with_session(&data, session_id)
}

pub async fn get_session(
    data: web::Data<SessionStore>,
    path: web::Path<Uuid>,
) -> impl Responder {
    respond_with_session(&data, path.into_inner())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatesInput {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

pub async fn set_dates(
    data: web::Data<SessionStore>,
    path: web::Path<Uuid>,
    input: web::Json<DatesInput>,
) -> impl Responder {
    let session_id = path.into_inner();
    let input = input.into_inner();
    match data.set_dates(
        session_id,
        DateRange {
            check_in: input.check_in,
            check_out: input.check_out,
        },
    ) {
        Ok(()) => respond_with_session(&data, session_id),
        Err(err) => error_response(err),
    }
}

#[derive(Deserialize)]
pub struct GuestsInput {
    pub guests: u32,
}

pub async fn set_guests(
    data: web::Data<SessionStore>,
    path: web::Path<Uuid>,
    input: web::Json<GuestsInput>,
) -> impl Responder {
    let session_id = path.into_inner();
    match data.sync_with_guest_count(session_id, input.guests) {
        Ok(()) => respond_with_session(&data, session_id),
        Err(err) => error_response(err),
    }
}

pub async fn set_accommodation(
    data: web::Data<SessionStore>,
    path: web::Path<Uuid>,
    input: web::Json<SelectedRoom>,
) -> impl Responder {
    let session_id = path.into_inner();
    match data.set_accommodation(session_id, input.into_inner()) {
        Ok(()) => respond_with_session(&data, session_id),
        Err(err) => error_response(err),
    }
}

pub async fn set_contact(
    data: web::Data<SessionStore>,
    path: web::Path<Uuid>,
    input: web::Json<ContactInfo>,
) -> impl Responder {
    let session_id = path.into_inner();
    match data.set_contact(session_id, input.into_inner()) {
        Ok(()) => respond_with_session(&data, session_id),
        Err(err) => error_response(err),
    }
}

pub async fn set_upgrades(
    data: web::Data<SessionStore>,
    path: web::Path<Uuid>,
    input: web::Json<GlobalUpgrades>,
) -> impl Responder {
    let session_id = path.into_inner();
    match data.set_global_upgrades(session_id, input.into_inner()) {
        Ok(()) => respond_with_session(&data, session_id),
        Err(err) => error_response(err),
    }
}

pub async fn add_participant(
    data: web::Data<SessionStore>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let session_id = path.into_inner();
    match data.add_participant(session_id) {
        Ok(_) => respond_with_session(&data, session_id),
        Err(err) => error_response(err),
    }
}

pub async fn remove_participant(
    data: web::Data<SessionStore>,
    path: web::Path<(Uuid, Uuid)>,
) -> impl Responder {
    let (session_id, participant_id) = path.into_inner();
    match data.remove_participant(session_id, participant_id) {
        Ok(()) => respond_with_session(&data, session_id),
        Err(err) => error_response(err),
    }
}

#[derive(Deserialize)]
pub struct NameInput {
    pub name: String,
}

pub async fn update_participant_name(
    data: web::Data<SessionStore>,
    path: web::Path<(Uuid, Uuid)>,
    input: web::Json<NameInput>,
) -> impl Responder {
    let (session_id, participant_id) = path.into_inner();
    match data.update_name(session_id, participant_id, &input.name) {
        Ok(()) => respond_with_session(&data, session_id),
        Err(err) => error_response(err),
    }
}

pub async fn activate_participant(
    data: web::Data<SessionStore>,
    path: web::Path<(Uuid, Uuid)>,
) -> impl Responder {
    let (session_id, participant_id) = path.into_inner();
    match data.switch_active(session_id, participant_id) {
        Ok(()) => respond_with_session(&data, session_id),
        Err(err) => error_response(err),
    }
}

pub async fn copy_choices_to_all(
    data: web::Data<SessionStore>,
    path: web::Path<(Uuid, Uuid)>,
) -> impl Responder {
    let (session_id, participant_id) = path.into_inner();
    match data.copy_choices_to_all(session_id, participant_id) {
        Ok(()) => respond_with_session(&data, session_id),
        Err(err) => error_response(err),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectActivityInput {
    pub activity_id: String,
    #[serde(default)]
    pub surf_classes: Option<u8>,
    #[serde(default)]
    pub yoga_package: Option<YogaPackage>,
    #[serde(default)]
    pub yoga_classes: Option<u8>,
    #[serde(default)]
    pub pack_discount: Option<bool>,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub people: Option<u32>,
    #[serde(default)]
    pub sessions: Option<u32>,
    #[serde(default)]
    pub time_slot: Option<TimeSlot>,
}

/// Select an activity and apply whatever configuration came with it.
pub async fn select_activity(
    data: web::Data<SessionStore>,
    path: web::Path<(Uuid, Uuid)>,
    input: web::Json<SelectActivityInput>,
) -> impl Responder {
    let (session_id, participant_id) = path.into_inner();
    let input = input.into_inner();

    if let Err(err) = data.select_activity(session_id, participant_id, &input.activity_id) {
        return error_response(err);
    }

    if let Some(classes) = input.surf_classes {
        if let Err(err) =
            data.configure_surf(session_id, participant_id, &input.activity_id, classes)
        {
            return error_response(err);
        }
    }

    if let Some(package) = input.yoga_package {
        if let Err(err) = data.configure_yoga(
            session_id,
            participant_id,
            &input.activity_id,
            YogaSelection::Package { package },
        ) {
            return error_response(err);
        }
    } else if input.yoga_classes.is_some() || input.pack_discount.is_some() {
        let selection = YogaSelection::PerClass {
            count: input.yoga_classes.unwrap_or(1),
            pack_discount: input.pack_discount.unwrap_or(false),
        };
        if let Err(err) =
            data.configure_yoga(session_id, participant_id, &input.activity_id, selection)
        {
            return error_response(err);
        }
    }

    if let Some(quantity) = input.quantity {
        if let Err(err) =
            data.configure_quantity(session_id, participant_id, &input.activity_id, quantity)
        {
            return error_response(err);
        }
    }

    if input.people.is_some() || input.sessions.is_some() {
        if let Err(err) = data.configure_ice_bath(
            session_id,
            participant_id,
            &input.activity_id,
            input.people.unwrap_or(1),
            input.sessions.unwrap_or(1),
        ) {
            return error_response(err);
        }
    }

    if let Some(slot) = input.time_slot {
        if let Err(err) =
            data.set_time_slot(session_id, participant_id, &input.activity_id, slot)
        {
            return error_response(err);
        }
    }

    respond_with_session(&data, session_id)
}

pub async fn deselect_activity(
    data: web::Data<SessionStore>,
    path: web::Path<(Uuid, Uuid, String)>,
) -> impl Responder {
    let (session_id, participant_id, activity_id) = path.into_inner();
    match data.deselect_activity(session_id, participant_id, &activity_id) {
        Ok(()) => respond_with_session(&data, session_id),
        Err(err) => error_response(err),
    }
}

pub async fn flow_step(
    data: web::Data<SessionStore>,
    path: web::Path<(Uuid, Uuid, String)>,
) -> impl Responder {
    let (session_id, participant_id, op) = path.into_inner();
    let result = match op.as_str() {
        "next" => data.flow_next(session_id, participant_id),
        "skip" => data.flow_skip(session_id, participant_id),
        "back" => data.flow_back(session_id, participant_id),
        _ => return HttpResponse::NotFound().body("Unknown flow operation"),
    };
    match result {
        Ok(state) => HttpResponse::Ok().json(serde_json::json!({ "state": state })),
        Err(err) => error_response(err),
    }
}

pub async fn get_session_quote(
    data: web::Data<SessionStore>,
    path: web::Path<Uuid>,
) -> impl Responder {
    match data.snapshot(path.into_inner()) {
        Ok(session) => HttpResponse::Ok().json(QuoteService::quote(&session)),
        Err(err) => error_response(err),
    }
}
