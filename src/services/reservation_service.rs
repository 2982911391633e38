use chrono::NaiveDate;
use serde::Serialize;

use crate::models::activity::ActivityCategory;
use crate::models::session::{ContactInfo, Participant};
use crate::services::catalog_service;
use crate::services::lobby::client::{LobbyBookingPayload, LobbyClient, LobbyError};
use crate::services::lobby::products;
use crate::services::notification_service::NotificationService;
use crate::services::references::generate_booking_reference;

const CAPACITY_ERROR_CODE: &str = "MAXIMUM_CAPACITY";

/// Surfaced to the caller before any network call is made.
#[derive(Debug, PartialEq, Eq)]
pub enum ReservationError {
    Validation(String),
}

#[derive(Debug, Clone)]
pub struct ReservationRequest {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
    pub room_type_id: String,
    pub contact: ContactInfo,
    pub participants: Vec<Participant>,
}

#[derive(Debug, Serialize, Clone)]
pub struct ReservationOutcome {
    pub success: bool,
    pub reservation_id: String,
    pub booking_reference: String,
    pub status: String,
    pub demo_mode: bool,
    pub adjusted: bool,
    pub needs_manual_processing: bool,
    pub message: String,
}

pub struct ReservationService;

impl ReservationService {
    fn validate(request: &ReservationRequest) -> Result<u32, ReservationError> {
        if request.check_out <= request.check_in {
            return Err(ReservationError::Validation(
                "stay must cover at least one night".to_string(),
            ));
        }
        let category_id = products::room_category_id(&request.room_type_id).ok_or_else(|| {
            ReservationError::Validation(format!(
                "unknown room type: {}",
                request.room_type_id
            ))
        })?;
        request
            .contact
            .validate()
            .map_err(ReservationError::Validation)?;
        Ok(category_id)
    }

    fn payload(
        request: &ReservationRequest,
        category_id: u32,
        guests: u32,
        reference: &str,
    ) -> LobbyBookingPayload {
        LobbyBookingPayload {
            start_date: request.check_in.format("%Y-%m-%d").to_string(),
            end_date: request.check_out.format("%Y-%m-%d").to_string(),
            category_id,
            guest_count: guests,
            total_adults: guests,
            customer_name: request.contact.full_name(),
            customer_email: request.contact.email.clone(),
            customer_phone: request.contact.normalized_phone(),
            document_number: request.contact.dni.clone(),
            nationality: request.contact.nationality.clone(),
            booking_reference: reference.to_string(),
            source: "surfcamp-api".to_string(),
        }
    }

    fn has_category(participants: &[Participant], category: ActivityCategory) -> bool {
        participants.iter().any(|participant| {
            participant
                .selected_activities
                .iter()
                .filter_map(|id| catalog_service::get_activity(id))
                .any(|activity| activity.category == category)
        })
    }

    fn demo_outcome(reference: String, reason: &str) -> ReservationOutcome {
        ReservationOutcome {
            success: true,
            reservation_id: format!("DEMO-{}", reference),
            booking_reference: reference,
            status: "pending_manual_processing".to_string(),
            demo_mode: true,
            adjusted: false,
            needs_manual_processing: true,
            message: format!("Reservation recorded in demo mode ({})", reason),
        }
    }

    async fn send_notices(
        notifier: &NotificationService,
        request: &ReservationRequest,
        reference: &str,
    ) {
        let confirmation = format!(
            "Booking confirmed {} to {} for {} guest(s). Reference: {}",
            request.check_in.format("%Y-%m-%d"),
            request.check_out.format("%Y-%m-%d"),
            request.guests,
            reference
        );
        notifier.notify_staff(&confirmation).await;

        if Self::has_category(&request.participants, ActivityCategory::Surf) {
            notifier
                .notify_staff(&format!(
                    "Surf program booked by {} ({})",
                    request.contact.full_name(),
                    reference
                ))
                .await;
        }
        if Self::has_category(&request.participants, ActivityCategory::IceBath) {
            notifier
                .notify_staff(&format!(
                    "Ice bath booked by {} ({})",
                    request.contact.full_name(),
                    reference
                ))
                .await;
        }
    }

    async fn attach_products(
        lobby: &LobbyClient,
        request: &ReservationRequest,
        booking_id: Option<&str>,
    ) {
        let booking_id = match booking_id {
            Some(id) => id,
            None => {
                eprintln!("PMS response carried no booking id, skipping product attachment");
                return;
            }
        };
        let items: Vec<_> = request
            .participants
            .iter()
            .flat_map(|participant| products::consumption_items(participant))
            .collect();
        if items.is_empty() {
            return;
        }
        if let Err(err) = lobby.add_products(booking_id, &items).await {
            eprintln!(
                "Failed to attach products to booking {}: {:?}",
                booking_id, err
            );
        }
    }

    /// Create the downstream reservation. The user-visible transaction never
    /// fails on upstream trouble: unconfigured or erroring PMS degrades to a
    /// clearly-prefixed demo/emergency confirmation.
    pub async fn create(
        lobby: &LobbyClient,
        notifier: &NotificationService,
        request: &ReservationRequest,
    ) -> Result<ReservationOutcome, ReservationError> {
        let category_id = Self::validate(request)?;
        let reference = generate_booking_reference();

        if !lobby.is_configured() {
            println!("PMS not configured, falling back to demo confirmation");
            let outcome = Self::demo_outcome(reference, "PMS not configured");
            notifier
                .notify_staff(&format!(
                    "Demo reservation {} needs manual processing",
                    outcome.reservation_id
                ))
                .await;
            return Ok(outcome);
        }

        let guests = request.guests.max(1);
        let payload = Self::payload(request, category_id, guests, &reference);

        match lobby.create_booking(&payload).await {
            Ok(response) => {
                Self::attach_products(lobby, request, response.any_id()).await;
                Self::send_notices(notifier, request, &reference).await;
                Ok(ReservationOutcome {
                    success: true,
                    reservation_id: response
                        .any_id()
                        .unwrap_or(reference.as_str())
                        .to_string(),
                    booking_reference: reference,
                    status: response.status.unwrap_or_else(|| "confirmed".to_string()),
                    demo_mode: false,
                    adjusted: false,
                    needs_manual_processing: false,
                    message: "Reservation confirmed".to_string(),
                })
            }
            Err(err) if err.error_code() == Some(CAPACITY_ERROR_CODE) => {
                println!("Capacity error from PMS, retrying with 1 guest");
                let retry_payload = Self::payload(request, category_id, 1, &reference);
                match lobby.create_booking(&retry_payload).await {
                    Ok(response) => {
                        Self::attach_products(lobby, request, response.any_id()).await;
                        Self::send_notices(notifier, request, &reference).await;
                        Ok(ReservationOutcome {
                            success: true,
                            reservation_id: response
                                .any_id()
                                .unwrap_or(reference.as_str())
                                .to_string(),
                            booking_reference: reference,
                            status: response
                                .status
                                .unwrap_or_else(|| "confirmed".to_string()),
                            demo_mode: false,
                            adjusted: true,
                            needs_manual_processing: false,
                            message: "Reservation confirmed, adjusted to 1 guest by capacity"
                                .to_string(),
                        })
                    }
                    Err(retry_err) => {
                        eprintln!("PMS retry also failed: {:?}", retry_err);
                        Ok(Self::emergency_outcome(reference, retry_err))
                    }
                }
            }
            Err(err) => {
                eprintln!("PMS booking error: {:?}", err);
                Ok(Self::emergency_outcome(reference, err))
            }
        }
    }

    fn emergency_outcome(reference: String, err: LobbyError) -> ReservationOutcome {
        ReservationOutcome {
            success: true,
            reservation_id: format!("EMERGENCY-{}", reference),
            booking_reference: reference,
            status: "pending_manual_processing".to_string(),
            demo_mode: true,
            adjusted: false,
            needs_manual_processing: true,
            message: format!("Reservation recorded for manual processing ({:?})", err),
        }
    }
}
