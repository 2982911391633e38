use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use chrono::Utc;
use uuid::Uuid;

use crate::models::activity::{ActivityCategory, Locale, TimeSlot};
use crate::models::flow::{ActivityFlow, FlowError, FlowState};
use crate::models::payment::PaymentAttempt;
use crate::models::pricing::YogaSelection;
use crate::models::room::SelectedRoom;
use crate::models::session::{
    BookingSession, ContactInfo, DateRange, GlobalUpgrades, Participant,
};
use crate::services::catalog_service;
use crate::services::reconciliation_service::ReconciliationListener;

const SURF_MIN_CLASSES: u8 = 3;
const SURF_MAX_CLASSES: u8 = 10;
const DEFAULT_SURF_CLASSES: u8 = 4;
const YOGA_PACK_SIZE: u8 = 10;

#[derive(Debug, PartialEq, Eq)]
pub enum SessionError {
    SessionNotFound,
    ParticipantNotFound,
    UnknownActivity,
    UnknownRoomType,
    LeadGuestNotRemovable,
    LastParticipant,
    MandatoryActivity,
    ActivityNotSelected,
    InvalidDates,
    NoPaymentAttempt,
    Flow(FlowError),
    Invalid(String),
}

/// In-memory session store. Every mutation goes through a named operation so
/// the invariants (participant/guest coupling, lead-guest protection, config
/// pruning) are enforced in one place.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, BookingSession>>>,
    listeners: Arc<Mutex<HashMap<Uuid, ReconciliationListener>>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            listeners: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn lead_name(locale: Locale) -> &'static str {
        match locale {
            Locale::Es => "Tú",
            Locale::En => "You",
        }
    }

    fn guest_name(locale: Locale, index: usize) -> String {
        match locale {
            Locale::Es => format!("Invitado {}", index),
            Locale::En => format!("Guest {}", index),
        }
    }

    pub fn create_session(
        &self,
        guests: u32,
        date_range: Option<DateRange>,
        locale: Locale,
    ) -> Uuid {
        let guest_count = guests.max(1);
        let mut participants = vec![Participant::new(Self::lead_name(locale), true)];
        for index in 2..=guest_count as usize {
            participants.push(Participant::new(Self::guest_name(locale, index), false));
        }
        let active = participants[0].id;

        let session = BookingSession {
            id: Uuid::new_v4(),
            date_range,
            guest_count,
            accommodation: None,
            participants,
            active_participant_id: active,
            global_upgrades: GlobalUpgrades::default(),
            contact: None,
            locale,
            payment: None,
            created_at: Utc::now(),
        };

        let id = session.id;
        self.sessions
            .write()
            .expect("session store lock poisoned")
            .insert(id, session);
        id
    }

    pub fn snapshot(&self, session_id: Uuid) -> Result<BookingSession, SessionError> {
        self.sessions
            .read()
            .expect("session store lock poisoned")
            .get(&session_id)
            .cloned()
            .ok_or(SessionError::SessionNotFound)
    }

    fn update<R>(
        &self,
        session_id: Uuid,
        op: impl FnOnce(&mut BookingSession) -> Result<R, SessionError>,
    ) -> Result<R, SessionError> {
        let mut sessions = self.sessions.write().expect("session store lock poisoned");
        let session = sessions
            .get_mut(&session_id)
            .ok_or(SessionError::SessionNotFound)?;
        op(session)
    }

    // --- participant operations ---

    /// Append a new participant with empty selections; it becomes active and
    /// the guest count grows to match.
    pub fn add_participant(&self, session_id: Uuid) -> Result<Uuid, SessionError> {
        self.update(session_id, |session| {
            let name = Self::guest_name(session.locale, session.participants.len() + 1);
            let participant = Participant::new(name, false);
            let id = participant.id;
            session.participants.push(participant);
            session.active_participant_id = id;
            session.guest_count = session.participants.len() as u32;
            Ok(id)
        })
    }

    /// Remove a participant. Refused for the lead guest and for the last
    /// remaining one; the guest count is re-derived afterwards.
    pub fn remove_participant(
        &self,
        session_id: Uuid,
        participant_id: Uuid,
    ) -> Result<(), SessionError> {
        self.update(session_id, |session| {
            let index = session
                .participants
                .iter()
                .position(|p| p.id == participant_id)
                .ok_or(SessionError::ParticipantNotFound)?;
            if session.participants[index].is_you {
                return Err(SessionError::LeadGuestNotRemovable);
            }
            if session.participants.len() == 1 {
                return Err(SessionError::LastParticipant);
            }
            session.participants.remove(index);
            if session.active_participant_id == participant_id {
                let neighbor = index.min(session.participants.len() - 1);
                session.active_participant_id = session.participants[neighbor].id;
            }
            session.guest_count = session.participants.len() as u32;
            Ok(())
        })
    }

    pub fn switch_active(
        &self,
        session_id: Uuid,
        participant_id: Uuid,
    ) -> Result<(), SessionError> {
        self.update(session_id, |session| {
            if session.participant(participant_id).is_none() {
                return Err(SessionError::ParticipantNotFound);
            }
            session.active_participant_id = participant_id;
            Ok(())
        })
    }

    pub fn update_name(
        &self,
        session_id: Uuid,
        participant_id: Uuid,
        name: &str,
    ) -> Result<(), SessionError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(SessionError::Invalid("name must not be empty".to_string()));
        }
        let trimmed = trimmed.to_string();
        self.update(session_id, |session| {
            let participant = session
                .participant_mut(participant_id)
                .ok_or(SessionError::ParticipantNotFound)?;
            participant.name = trimmed;
            Ok(())
        })
    }

    /// Deep-copy the source participant's selections onto every other
    /// participant, overwriting whatever they had.
    pub fn copy_choices_to_all(
        &self,
        session_id: Uuid,
        source_id: Uuid,
    ) -> Result<(), SessionError> {
        self.update(session_id, |session| {
            let source = session
                .participant(source_id)
                .ok_or(SessionError::ParticipantNotFound)?
                .clone();
            for participant in &mut session.participants {
                if participant.id != source_id {
                    participant.copy_choices_from(&source);
                }
            }
            Ok(())
        })
    }

    /// Grow or shrink the participant list to match the guest count,
    /// appending or removing at the tail only.
    pub fn sync_with_guest_count(&self, session_id: Uuid, guests: u32) -> Result<(), SessionError> {
        self.update(session_id, |session| {
            let target = guests.max(1) as usize;
            while session.participants.len() < target {
                let name = Self::guest_name(session.locale, session.participants.len() + 1);
                session.participants.push(Participant::new(name, false));
            }
            while session.participants.len() > target {
                let removed = session.participants.pop().expect("length checked above");
                if session.active_participant_id == removed.id {
                    session.active_participant_id =
                        session.participants.last().expect("at least one left").id;
                }
            }
            session.guest_count = target as u32;
            Ok(())
        })
    }

    // --- session fields ---

    pub fn set_dates(&self, session_id: Uuid, range: DateRange) -> Result<(), SessionError> {
        if range.check_out < range.check_in {
            return Err(SessionError::InvalidDates);
        }
        self.update(session_id, |session| {
            session.date_range = Some(range);
            Ok(())
        })
    }

    pub fn set_accommodation(
        &self,
        session_id: Uuid,
        room: SelectedRoom,
    ) -> Result<(), SessionError> {
        if catalog_service::get_room_type(&room.room_type_id).is_none() {
            return Err(SessionError::UnknownRoomType);
        }
        self.update(session_id, |session| {
            session.accommodation = Some(room);
            Ok(())
        })
    }

    pub fn set_contact(&self, session_id: Uuid, contact: ContactInfo) -> Result<(), SessionError> {
        contact.validate().map_err(SessionError::Invalid)?;
        self.update(session_id, |session| {
            session.contact = Some(contact);
            Ok(())
        })
    }

    pub fn set_global_upgrades(
        &self,
        session_id: Uuid,
        upgrades: GlobalUpgrades,
    ) -> Result<(), SessionError> {
        self.update(session_id, |session| {
            session.global_upgrades = upgrades;
            Ok(())
        })
    }

    // --- activity selection ---

    fn participant_op<R>(
        &self,
        session_id: Uuid,
        participant_id: Uuid,
        op: impl FnOnce(&mut Participant) -> Result<R, SessionError>,
    ) -> Result<R, SessionError> {
        self.update(session_id, |session| {
            let participant = session
                .participant_mut(participant_id)
                .ok_or(SessionError::ParticipantNotFound)?;
            op(participant)
        })
    }

    /// Select an activity for a participant, seeding default configuration.
    /// Surf and yoga are singletons: a new selection replaces any previous
    /// one in the same category.
    pub fn select_activity(
        &self,
        session_id: Uuid,
        participant_id: Uuid,
        activity_id: &str,
    ) -> Result<(), SessionError> {
        let activity = catalog_service::get_activity(activity_id)
            .ok_or(SessionError::UnknownActivity)?;
        self.participant_op(session_id, participant_id, |participant| {
            if participant.has_selected(&activity.id) {
                return Ok(());
            }
            if matches!(
                activity.category,
                ActivityCategory::Surf | ActivityCategory::Yoga
            ) {
                participant.selected_activities.retain(|id| {
                    catalog_service::get_activity(id)
                        .map(|a| a.category != activity.category)
                        .unwrap_or(false)
                });
            }
            participant.selected_activities.push(activity.id.clone());
            match activity.category {
                ActivityCategory::Surf => {
                    participant
                        .surf_classes
                        .insert(activity.id.clone(), DEFAULT_SURF_CLASSES);
                }
                ActivityCategory::Yoga => {
                    participant.yoga_selection.insert(
                        activity.id.clone(),
                        YogaSelection::Package {
                            package: crate::models::pricing::YogaPackage::ThreeClasses,
                        },
                    );
                }
                ActivityCategory::IceBath => {
                    participant.ice_bath_people.insert(activity.id.clone(), 1);
                    participant.ice_bath_sessions.insert(activity.id.clone(), 1);
                }
                ActivityCategory::Transport => {
                    participant.quantities.insert(activity.id.clone(), 1);
                    participant
                        .time_slots
                        .insert(activity.id.clone(), TimeSlot::SevenAm);
                }
                ActivityCategory::Ceramics | ActivityCategory::Hosting => {
                    participant.quantities.insert(activity.id.clone(), 1);
                }
            }
            participant.prune_config();
            Ok(())
        })
    }

    /// Deselect an activity. Surf is mandatory once chosen: it can only be
    /// reconfigured, never removed.
    pub fn deselect_activity(
        &self,
        session_id: Uuid,
        participant_id: Uuid,
        activity_id: &str,
    ) -> Result<(), SessionError> {
        let activity = catalog_service::get_activity(activity_id)
            .ok_or(SessionError::UnknownActivity)?;
        if activity.category == ActivityCategory::Surf {
            return Err(SessionError::MandatoryActivity);
        }
        self.participant_op(session_id, participant_id, |participant| {
            if !participant.has_selected(&activity.id) {
                return Err(SessionError::ActivityNotSelected);
            }
            participant
                .selected_activities
                .retain(|id| id != &activity.id);
            participant.prune_config();
            Ok(())
        })
    }

    pub fn configure_surf(
        &self,
        session_id: Uuid,
        participant_id: Uuid,
        activity_id: &str,
        classes: u8,
    ) -> Result<u8, SessionError> {
        let clamped = classes.clamp(SURF_MIN_CLASSES, SURF_MAX_CLASSES);
        self.participant_op(session_id, participant_id, |participant| {
            if !participant.has_selected(activity_id) {
                return Err(SessionError::ActivityNotSelected);
            }
            participant
                .surf_classes
                .insert(activity_id.to_string(), clamped);
            Ok(clamped)
        })
    }

    /// Replace the yoga pricing mode wholesale. The pack-discount toggle
    /// pins the class count to 10.
    pub fn configure_yoga(
        &self,
        session_id: Uuid,
        participant_id: Uuid,
        activity_id: &str,
        selection: YogaSelection,
    ) -> Result<(), SessionError> {
        let normalized = match selection {
            YogaSelection::PerClass {
                pack_discount: true,
                ..
            } => YogaSelection::PerClass {
                count: YOGA_PACK_SIZE,
                pack_discount: true,
            },
            YogaSelection::PerClass {
                count,
                pack_discount: false,
            } => YogaSelection::PerClass {
                count: count.max(1),
                pack_discount: false,
            },
            package => package,
        };
        self.participant_op(session_id, participant_id, |participant| {
            if !participant.has_selected(activity_id) {
                return Err(SessionError::ActivityNotSelected);
            }
            participant
                .yoga_selection
                .insert(activity_id.to_string(), normalized);
            Ok(())
        })
    }

    /// Adjust the per-class count. Moving away from 10 clears the discount.
    pub fn set_yoga_class_count(
        &self,
        session_id: Uuid,
        participant_id: Uuid,
        activity_id: &str,
        count: u8,
    ) -> Result<(), SessionError> {
        let count = count.max(1);
        self.participant_op(session_id, participant_id, |participant| {
            if !participant.has_selected(activity_id) {
                return Err(SessionError::ActivityNotSelected);
            }
            let discount = match participant.yoga_selection.get(activity_id) {
                Some(YogaSelection::PerClass { pack_discount, .. }) => {
                    *pack_discount && count == YOGA_PACK_SIZE
                }
                _ => false,
            };
            participant.yoga_selection.insert(
                activity_id.to_string(),
                YogaSelection::PerClass {
                    count,
                    pack_discount: discount,
                },
            );
            Ok(())
        })
    }

    pub fn configure_ice_bath(
        &self,
        session_id: Uuid,
        participant_id: Uuid,
        activity_id: &str,
        people: u32,
        sessions: u32,
    ) -> Result<(), SessionError> {
        self.participant_op(session_id, participant_id, |participant| {
            if !participant.has_selected(activity_id) {
                return Err(SessionError::ActivityNotSelected);
            }
            participant
                .ice_bath_people
                .insert(activity_id.to_string(), people.max(1));
            participant
                .ice_bath_sessions
                .insert(activity_id.to_string(), sessions.max(1));
            Ok(())
        })
    }

    pub fn configure_quantity(
        &self,
        session_id: Uuid,
        participant_id: Uuid,
        activity_id: &str,
        quantity: u32,
    ) -> Result<u32, SessionError> {
        let activity = catalog_service::get_activity(activity_id)
            .ok_or(SessionError::UnknownActivity)?;
        let cap = crate::services::pricing_service::PricingService::quantity_cap(activity.category)
            .min(activity.max_quantity.max(1));
        let clamped = quantity.clamp(1, cap);
        self.participant_op(session_id, participant_id, |participant| {
            if !participant.has_selected(activity_id) {
                return Err(SessionError::ActivityNotSelected);
            }
            participant
                .quantities
                .insert(activity_id.to_string(), clamped);
            Ok(clamped)
        })
    }

    pub fn set_time_slot(
        &self,
        session_id: Uuid,
        participant_id: Uuid,
        activity_id: &str,
        slot: TimeSlot,
    ) -> Result<(), SessionError> {
        self.participant_op(session_id, participant_id, |participant| {
            if !participant.has_selected(activity_id) {
                return Err(SessionError::ActivityNotSelected);
            }
            participant.time_slots.insert(activity_id.to_string(), slot);
            Ok(())
        })
    }

    // --- activity flow ---

    pub fn flow_next(
        &self,
        session_id: Uuid,
        participant_id: Uuid,
    ) -> Result<FlowState, SessionError> {
        self.participant_op(session_id, participant_id, |participant| {
            participant.flow.advance().map_err(SessionError::Flow)
        })
    }

    pub fn flow_skip(
        &self,
        session_id: Uuid,
        participant_id: Uuid,
    ) -> Result<FlowState, SessionError> {
        self.participant_op(session_id, participant_id, |participant| {
            participant.flow.skip().map_err(SessionError::Flow)
        })
    }

    pub fn flow_back(
        &self,
        session_id: Uuid,
        participant_id: Uuid,
    ) -> Result<FlowState, SessionError> {
        self.participant_op(session_id, participant_id, |participant| {
            participant.flow.back().map_err(SessionError::Flow)
        })
    }

    pub fn reset_flow(
        &self,
        session_id: Uuid,
        participant_id: Uuid,
    ) -> Result<(), SessionError> {
        self.participant_op(session_id, participant_id, |participant| {
            participant.flow = ActivityFlow::new();
            Ok(())
        })
    }

    // --- payment attempt ---

    pub fn begin_payment(
        &self,
        session_id: Uuid,
        attempt: PaymentAttempt,
    ) -> Result<(), SessionError> {
        self.update(session_id, |session| {
            session.payment = Some(attempt);
            Ok(())
        })
    }

    pub fn update_payment<R>(
        &self,
        session_id: Uuid,
        op: impl FnOnce(&mut PaymentAttempt) -> R,
    ) -> Result<R, SessionError> {
        self.update(session_id, |session| {
            let attempt = session
                .payment
                .as_mut()
                .ok_or(SessionError::NoPaymentAttempt)?;
            Ok(op(attempt))
        })
    }

    pub fn payment_snapshot(&self, session_id: Uuid) -> Result<PaymentAttempt, SessionError> {
        self.snapshot(session_id)?
            .payment
            .ok_or(SessionError::NoPaymentAttempt)
    }

    // --- reconciliation listeners ---

    /// Register the listener for a session's payment attempt, tearing down
    /// any prior one so two watchers never race on the same order.
    pub fn install_listener(&self, session_id: Uuid, listener: ReconciliationListener) {
        let mut listeners = self.listeners.lock().expect("listener lock poisoned");
        if let Some(previous) = listeners.insert(session_id, listener) {
            previous.cancel();
        }
    }

    pub fn cancel_listener(&self, session_id: Uuid) -> bool {
        let mut listeners = self.listeners.lock().expect("listener lock poisoned");
        match listeners.remove(&session_id) {
            Some(listener) => {
                listener.cancel();
                true
            }
            None => false,
        }
    }

    pub fn remove_listener(&self, session_id: Uuid) {
        let mut listeners = self.listeners.lock().expect("listener lock poisoned");
        listeners.remove(&session_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::pricing::YogaPackage;

    fn store_with_session(guests: u32) -> (SessionStore, Uuid) {
        let store = SessionStore::new();
        let id = store.create_session(guests, None, Locale::En);
        (store, id)
    }

    #[test]
    fn participant_count_tracks_guest_count() {
        let (store, id) = store_with_session(3);
        assert_eq!(store.snapshot(id).unwrap().participants.len(), 3);

        store.sync_with_guest_count(id, 5).unwrap();
        let session = store.snapshot(id).unwrap();
        assert_eq!(session.participants.len(), 5);
        assert_eq!(session.guest_count, 5);

        store.sync_with_guest_count(id, 2).unwrap();
        let session = store.snapshot(id).unwrap();
        assert_eq!(session.participants.len(), 2);
        assert_eq!(session.guest_count, 2);
        // The lead guest survives any shrink.
        assert!(session.participants[0].is_you);
    }

    #[test]
    fn guest_count_never_drops_below_one() {
        let (store, id) = store_with_session(1);
        store.sync_with_guest_count(id, 0).unwrap();
        let session = store.snapshot(id).unwrap();
        assert_eq!(session.participants.len(), 1);
        assert_eq!(session.guest_count, 1);
    }

    #[test]
    fn add_participant_becomes_active_and_grows_guest_count() {
        let (store, id) = store_with_session(1);
        let new_id = store.add_participant(id).unwrap();
        let session = store.snapshot(id).unwrap();
        assert_eq!(session.active_participant_id, new_id);
        assert_eq!(session.guest_count, 2);
        assert_eq!(session.participants.len(), 2);
    }

    #[test]
    fn lead_guest_cannot_be_removed() {
        let (store, id) = store_with_session(2);
        let lead = store.snapshot(id).unwrap().participants[0].id;
        assert_eq!(
            store.remove_participant(id, lead),
            Err(SessionError::LeadGuestNotRemovable)
        );
    }

    #[test]
    fn removing_the_active_participant_reassigns_a_neighbor() {
        let (store, id) = store_with_session(3);
        let session = store.snapshot(id).unwrap();
        let second = session.participants[1].id;
        let third = session.participants[2].id;

        store.switch_active(id, second).unwrap();
        store.remove_participant(id, second).unwrap();

        let session = store.snapshot(id).unwrap();
        assert_eq!(session.active_participant_id, third);
        assert_eq!(session.guest_count, 2);
    }

    #[test]
    fn copy_choices_produces_deep_copies() {
        let (store, id) = store_with_session(3);
        let session = store.snapshot(id).unwrap();
        let source = session.participants[0].id;
        let other = session.participants[1].id;

        store.select_activity(id, source, "surf-program").unwrap();
        store.configure_surf(id, source, "surf-program", 7).unwrap();
        store.select_activity(id, source, "yoga-classes").unwrap();
        store
            .configure_yoga(
                id,
                source,
                "yoga-classes",
                YogaSelection::Package {
                    package: YogaPackage::TenClasses,
                },
            )
            .unwrap();

        store.copy_choices_to_all(id, source).unwrap();

        let session = store.snapshot(id).unwrap();
        let src = session.participant(source).unwrap();
        for participant in &session.participants {
            assert_eq!(
                participant.selected_activities,
                src.selected_activities
            );
            assert_eq!(participant.surf_classes, src.surf_classes);
            assert_eq!(participant.yoga_selection, src.yoga_selection);
        }

        // Mutating the copy must not touch the source.
        store.configure_surf(id, other, "surf-program", 3).unwrap();
        let session = store.snapshot(id).unwrap();
        assert_eq!(
            session.participant(source).unwrap().surf_classes["surf-program"],
            7
        );
        assert_eq!(
            session.participant(other).unwrap().surf_classes["surf-program"],
            3
        );
    }

    #[test]
    fn surf_cannot_be_deselected() {
        let (store, id) = store_with_session(1);
        let pid = store.snapshot(id).unwrap().participants[0].id;
        store.select_activity(id, pid, "surf-program").unwrap();
        assert_eq!(
            store.deselect_activity(id, pid, "surf-program"),
            Err(SessionError::MandatoryActivity)
        );
    }

    #[test]
    fn deselect_prunes_configuration_maps() {
        let (store, id) = store_with_session(1);
        let pid = store.snapshot(id).unwrap().participants[0].id;
        store.select_activity(id, pid, "ice-bath-session").unwrap();
        store
            .configure_ice_bath(id, pid, "ice-bath-session", 2, 4)
            .unwrap();
        store
            .deselect_activity(id, pid, "ice-bath-session")
            .unwrap();

        let participant = store.snapshot(id).unwrap().participants[0].clone();
        assert!(participant.ice_bath_people.is_empty());
        assert!(participant.ice_bath_sessions.is_empty());
        assert!(participant.selected_activities.is_empty());
    }

    #[test]
    fn pack_discount_pins_yoga_count_to_ten() {
        let (store, id) = store_with_session(1);
        let pid = store.snapshot(id).unwrap().participants[0].id;
        store.select_activity(id, pid, "yoga-classes").unwrap();

        store
            .configure_yoga(
                id,
                pid,
                "yoga-classes",
                YogaSelection::PerClass {
                    count: 4,
                    pack_discount: true,
                },
            )
            .unwrap();
        let participant = store.snapshot(id).unwrap().participants[0].clone();
        assert_eq!(
            participant.yoga_selection["yoga-classes"],
            YogaSelection::PerClass {
                count: 10,
                pack_discount: true
            }
        );

        // Moving the count away from 10 clears the toggle.
        store
            .set_yoga_class_count(id, pid, "yoga-classes", 6)
            .unwrap();
        let participant = store.snapshot(id).unwrap().participants[0].clone();
        assert_eq!(
            participant.yoga_selection["yoga-classes"],
            YogaSelection::PerClass {
                count: 6,
                pack_discount: false
            }
        );
    }

    #[test]
    fn surf_classes_clamp_to_range() {
        let (store, id) = store_with_session(1);
        let pid = store.snapshot(id).unwrap().participants[0].id;
        store.select_activity(id, pid, "surf-program").unwrap();
        assert_eq!(store.configure_surf(id, pid, "surf-program", 1).unwrap(), 3);
        assert_eq!(
            store.configure_surf(id, pid, "surf-program", 42).unwrap(),
            10
        );
    }

    #[test]
    fn transport_quantity_caps_at_three() {
        let (store, id) = store_with_session(1);
        let pid = store.snapshot(id).unwrap().participants[0].id;
        store
            .select_activity(id, pid, "transport-airport")
            .unwrap();
        assert_eq!(
            store
                .configure_quantity(id, pid, "transport-airport", 9)
                .unwrap(),
            3
        );
    }

    #[test]
    fn configuring_an_unselected_activity_is_refused() {
        let (store, id) = store_with_session(1);
        let pid = store.snapshot(id).unwrap().participants[0].id;
        assert_eq!(
            store.configure_surf(id, pid, "surf-program", 5),
            Err(SessionError::ActivityNotSelected)
        );
    }

    #[test]
    fn selecting_a_second_yoga_replaces_the_first() {
        // Surf and yoga are singleton-per-participant; re-selecting the same
        // category keeps exactly one entry.
        let (store, id) = store_with_session(1);
        let pid = store.snapshot(id).unwrap().participants[0].id;
        store.select_activity(id, pid, "yoga-classes").unwrap();
        store.select_activity(id, pid, "yoga-classes").unwrap();
        let participant = store.snapshot(id).unwrap().participants[0].clone();
        assert_eq!(participant.selected_activities.len(), 1);
    }
}
