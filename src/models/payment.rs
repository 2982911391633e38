use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payment status as reported by the trip-payment provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderStatus {
    Pending,
    BookingCreated,
    Completed,
    Failed,
    Expired,
}

impl ProviderStatus {
    pub fn parse(value: &str) -> Option<ProviderStatus> {
        match value {
            "pending" => Some(ProviderStatus::Pending),
            "booking_created" => Some(ProviderStatus::BookingCreated),
            "completed" => Some(ProviderStatus::Completed),
            "failed" => Some(ProviderStatus::Failed),
            "expired" => Some(ProviderStatus::Expired),
            _ => None,
        }
    }
}

/// Where the session stands in confirming an external payment. Transitions
/// are monotonic in rank; stale reports must never move a session backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconciliationState {
    Idle,
    AwaitingLink,
    WaitingForPayment,
    PaymentReceived,
    ProcessingReservation,
    Success,
    Failed,
}

impl ReconciliationState {
    pub fn rank(self) -> u8 {
        match self {
            ReconciliationState::Idle => 0,
            ReconciliationState::AwaitingLink => 1,
            ReconciliationState::WaitingForPayment => 2,
            ReconciliationState::PaymentReceived => 3,
            ReconciliationState::ProcessingReservation => 4,
            ReconciliationState::Success => 5,
            // Failed is a branch, not a rung; it is applied through
            // `is_terminal` checks rather than rank ordering.
            ReconciliationState::Failed => 5,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ReconciliationState::Success | ReconciliationState::Failed
        )
    }
}

/// The order created the moment a payment link is requested.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PaymentOrder {
    pub order_id: String,
    pub trip_id: Option<String>,
    pub trip_uuid: Option<String>,
    pub status: ProviderStatus,
    pub deposit_amount: f64,
    pub remaining_amount: f64,
    pub payment_url: String,
    pub created_at: DateTime<Utc>,
}

/// One payment attempt owned by a session. A new attempt replaces (and tears
/// down the listener of) any previous one.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PaymentAttempt {
    pub id: Uuid,
    pub order: PaymentOrder,
    pub state: ReconciliationState,
    pub reservation_id: Option<String>,
}

impl PaymentAttempt {
    pub fn new(order: PaymentOrder) -> Self {
        Self {
            id: Uuid::new_v4(),
            order,
            state: ReconciliationState::WaitingForPayment,
            reservation_id: None,
        }
    }
}

/// Identifiers usable against the provider's status endpoint. Whichever are
/// known get sent; the endpoint accepts any of them.
#[derive(Debug, Clone)]
pub struct StatusKeys {
    pub order_id: String,
    pub trip_id: Option<String>,
    pub trip_uuid: Option<String>,
}

/// Successful payment-link response from the gateway.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PaymentLinkResponse {
    pub payment_url: String,
    pub order_id: String,
    #[serde(default)]
    pub trip_id: Option<String>,
    #[serde(default)]
    pub trip_uuid: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ReportedPayment {
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ReportedOrder {
    #[serde(default)]
    pub lobbypms_reservation_id: Option<String>,
}

/// One reply from the provider's status endpoint.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct PaymentStatusReport {
    #[serde(default)]
    pub payment: Option<ReportedPayment>,
    #[serde(default)]
    pub order: Option<ReportedOrder>,
    #[serde(default)]
    pub show_success: bool,
    #[serde(default)]
    pub is_booking_created: bool,
    #[serde(default)]
    pub is_completed: bool,
}

/// Messages carried on the provider's event stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Connected,
    ReservationComplete,
    Other(String),
}
