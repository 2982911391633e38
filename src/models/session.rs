use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::activity::{Locale, TimeSlot};
use super::flow::ActivityFlow;
use super::payment::PaymentAttempt;
use super::pricing::YogaSelection;
use super::room::SelectedRoom;

#[derive(Debug, Deserialize, Serialize, Clone, Copy)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

impl DateRange {
    pub fn nights(&self) -> u32 {
        let nights = (self.check_out - self.check_in).num_days();
        nights.max(0) as u32
    }
}

/// Flags applying across all participants.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct GlobalUpgrades {
    pub private_coaching: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub dni: String,
    #[serde(default)]
    pub nationality: Option<String>,
}

impl ContactInfo {
    /// Strip formatting from the phone number. Returns `None` when the digit
    /// count falls outside what downstream gateways accept (8-15 digits).
    pub fn normalized_phone(&self) -> Option<String> {
        static NON_DIGITS: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
        let digits_re = NON_DIGITS
            .get_or_init(|| regex::Regex::new(r"\D+").expect("static pattern compiles"));
        let digits = digits_re.replace_all(&self.phone, "").to_string();
        if digits.len() < 8 || digits.len() > 15 {
            return None;
        }
        if self.phone.trim().starts_with('+') {
            Some(format!("+{}", digits))
        } else {
            Some(digits)
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Field-level validation, run before any network call is made.
    pub fn validate(&self) -> Result<(), String> {
        if self.first_name.trim().is_empty() {
            return Err("first name is required".to_string());
        }
        if self.last_name.trim().is_empty() {
            return Err("last name is required".to_string());
        }
        if self.email.trim().is_empty() || !self.email.contains('@') {
            return Err("a valid email is required".to_string());
        }
        if self.normalized_phone().is_none() {
            return Err("a valid phone number is required".to_string());
        }
        Ok(())
    }
}

/// One traveler within a booking session, with independent selections.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Participant {
    pub id: Uuid,
    pub name: String,
    /// The lead guest. Never removable.
    pub is_you: bool,
    /// Insertion order preserved; acts as a set keyed by activity id.
    pub selected_activities: Vec<String>,
    pub surf_classes: HashMap<String, u8>,
    pub yoga_selection: HashMap<String, YogaSelection>,
    pub quantities: HashMap<String, u32>,
    pub ice_bath_people: HashMap<String, u32>,
    pub ice_bath_sessions: HashMap<String, u32>,
    pub time_slots: HashMap<String, TimeSlot>,
    pub flow: ActivityFlow,
}

impl Participant {
    pub fn new(name: impl Into<String>, is_you: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            is_you,
            selected_activities: Vec::new(),
            surf_classes: HashMap::new(),
            yoga_selection: HashMap::new(),
            quantities: HashMap::new(),
            ice_bath_people: HashMap::new(),
            ice_bath_sessions: HashMap::new(),
            time_slots: HashMap::new(),
            flow: ActivityFlow::new(),
        }
    }

    pub fn has_selected(&self, activity_id: &str) -> bool {
        self.selected_activities.iter().any(|id| id == activity_id)
    }

    /// Drop configuration entries whose activity is no longer selected.
    /// Stale keys must never leak into outbound payloads.
    pub fn prune_config(&mut self) {
        let selected: Vec<String> = self.selected_activities.clone();
        let keep = |id: &String| selected.iter().any(|s| s == id);
        self.surf_classes.retain(|id, _| keep(id));
        self.yoga_selection.retain(|id, _| keep(id));
        self.quantities.retain(|id, _| keep(id));
        self.ice_bath_people.retain(|id, _| keep(id));
        self.ice_bath_sessions.retain(|id, _| keep(id));
        self.time_slots.retain(|id, _| keep(id));
    }

    /// Overwrite this participant's selections with a deep copy of the
    /// source's. Identity fields (id, name, lead flag, flow) are untouched.
    pub fn copy_choices_from(&mut self, source: &Participant) {
        self.selected_activities = source.selected_activities.clone();
        self.surf_classes = source.surf_classes.clone();
        self.yoga_selection = source.yoga_selection.clone();
        self.quantities = source.quantities.clone();
        self.ice_bath_people = source.ice_bath_people.clone();
        self.ice_bath_sessions = source.ice_bath_sessions.clone();
        self.time_slots = source.time_slots.clone();
    }
}

/// The root draft object for one browsing session.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BookingSession {
    pub id: Uuid,
    pub date_range: Option<DateRange>,
    pub guest_count: u32,
    pub accommodation: Option<SelectedRoom>,
    pub participants: Vec<Participant>,
    pub active_participant_id: Uuid,
    pub global_upgrades: GlobalUpgrades,
    pub contact: Option<ContactInfo>,
    pub locale: Locale,
    pub payment: Option<PaymentAttempt>,
    pub created_at: DateTime<Utc>,
}

impl BookingSession {
    pub fn nights(&self) -> u32 {
        self.date_range.map(|range| range.nights()).unwrap_or(0)
    }

    pub fn participant(&self, id: Uuid) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn participant_mut(&mut self, id: Uuid) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| p.id == id)
    }

    pub fn active_participant(&self) -> Option<&Participant> {
        self.participant(self.active_participant_id)
    }
}
