use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

use crate::models::payment::{
    PaymentAttempt, PaymentStatusReport, ProviderStatus, ReconciliationState, StatusKeys,
    StreamEvent,
};
use crate::services::wetravel::interface::{EventStream, PaymentGateway};
use crate::store::sessions::SessionStore;

const POLL_INTERVAL: Duration = Duration::from_secs(3);
const WATCH_TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// What one status reply amounts to, before ordering rules are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOutcome {
    pub state: ReconciliationState,
    pub provider_status: Option<ProviderStatus>,
    pub reservation_id: Option<String>,
}

/// Map a status reply onto the reconciliation ladder. Only the combination
/// of `show_success` and a completion flag is sufficient for success.
pub fn evaluate_report(report: &PaymentStatusReport) -> ReportOutcome {
    let provider_status = report
        .payment
        .as_ref()
        .and_then(|payment| payment.status.as_deref())
        .and_then(ProviderStatus::parse);
    let reservation_id = report
        .order
        .as_ref()
        .and_then(|order| order.lobbypms_reservation_id.clone());

    if matches!(
        provider_status,
        Some(ProviderStatus::Failed) | Some(ProviderStatus::Expired)
    ) {
        return ReportOutcome {
            state: ReconciliationState::Failed,
            provider_status,
            reservation_id,
        };
    }

    let mut state = ReconciliationState::WaitingForPayment;
    let payment_done = matches!(
        provider_status,
        Some(ProviderStatus::BookingCreated) | Some(ProviderStatus::Completed)
    ) || report.is_booking_created
        || report.is_completed;
    if payment_done {
        state = ReconciliationState::PaymentReceived;
        if reservation_id.is_some() {
            state = ReconciliationState::ProcessingReservation;
        }
    }
    if report.show_success && (report.is_booking_created || report.is_completed) {
        state = ReconciliationState::Success;
    }

    ReportOutcome {
        state,
        provider_status,
        reservation_id,
    }
}

/// Apply an outcome to the attempt. Returns whether anything changed.
/// Transitions are monotonic: a stale reply bearing an earlier-sequence
/// state never regresses the attempt, and a terminal state is final.
pub fn apply_outcome(attempt: &mut PaymentAttempt, outcome: &ReportOutcome) -> bool {
    if attempt.state.is_terminal() {
        return false;
    }
    if outcome.state == ReconciliationState::Failed {
        attempt.state = ReconciliationState::Failed;
        if let Some(status) = outcome.provider_status {
            attempt.order.status = status;
        }
        return true;
    }
    if outcome.state.rank() <= attempt.state.rank() {
        return false;
    }
    attempt.state = outcome.state;
    if let Some(status) = outcome.provider_status {
        attempt.order.status = status;
    }
    if outcome.reservation_id.is_some() {
        attempt.reservation_id = outcome.reservation_id.clone();
    }
    true
}

/// Owns both confirmation channels for one payment attempt. Exactly one
/// listener exists per attempt; cancelling (or reaching a terminal state)
/// tears down the event stream, the polling timer and the task together.
pub struct ReconciliationListener {
    cancel_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl ReconciliationListener {
    pub fn start(
        gateway: Arc<dyn PaymentGateway>,
        store: SessionStore,
        session_id: Uuid,
        keys: StatusKeys,
    ) -> Self {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let handle = tokio::spawn(watch_payment(gateway, store, session_id, keys, cancel_rx));
        Self { cancel_tx, handle }
    }

    pub fn cancel(&self) {
        let _ = self.cancel_tx.send(true);
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

async fn next_stream_event(stream: &mut Option<EventStream>) -> Option<StreamEvent> {
    match stream {
        Some(events) => events.next().await,
        None => std::future::pending().await,
    }
}

async fn watch_payment(
    gateway: Arc<dyn PaymentGateway>,
    store: SessionStore,
    session_id: Uuid,
    keys: StatusKeys,
    mut cancel_rx: watch::Receiver<bool>,
) {
    let mut poll = tokio::time::interval(POLL_INTERVAL);
    poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let deadline = tokio::time::sleep(WATCH_TIMEOUT);
    tokio::pin!(deadline);

    // Both channels race; the pull loop also covers a push channel that
    // never comes up.
    let mut stream = match gateway.open_event_stream(&keys.order_id).await {
        Ok(events) => Some(events),
        Err(err) => {
            eprintln!(
                "Event stream unavailable for order {}, relying on polling: {:?}",
                keys.order_id, err
            );
            None
        }
    };

    loop {
        tokio::select! {
            _ = cancel_rx.changed() => {
                println!("Reconciliation cancelled for order {}", keys.order_id);
                break;
            }
            _ = &mut deadline => {
                // Not an error: stop watching silently and leave the session
                // in waiting_for_payment for the user to retry.
                println!("Reconciliation timed out for order {}", keys.order_id);
                break;
            }
            event = next_stream_event(&mut stream), if stream.is_some() => {
                match event {
                    Some(StreamEvent::ReservationComplete) => {
                        let _ = store.update_payment(session_id, |attempt| {
                            if !attempt.state.is_terminal() {
                                attempt.state = ReconciliationState::Success;
                                attempt.order.status = ProviderStatus::Completed;
                            }
                        });
                        println!("Order {} confirmed via event stream", keys.order_id);
                        break;
                    }
                    Some(StreamEvent::Connected) | Some(StreamEvent::Other(_)) => {}
                    None => {
                        eprintln!(
                            "Event stream closed for order {}, polling continues",
                            keys.order_id
                        );
                        stream = None;
                    }
                }
            }
            _ = poll.tick() => {
                match gateway.fetch_status(&keys).await {
                    Ok(report) => {
                        let outcome = evaluate_report(&report);
                        let reached_terminal = store
                            .update_payment(session_id, |attempt| {
                                apply_outcome(attempt, &outcome);
                                attempt.state.is_terminal()
                            })
                            // Session gone means nobody is watching anymore.
                            .unwrap_or(true);
                        if reached_terminal {
                            println!(
                                "Order {} reached {:?} via polling",
                                keys.order_id, outcome.state
                            );
                            break;
                        }
                    }
                    Err(err) => {
                        eprintln!("Status poll failed for order {}: {:?}", keys.order_id, err);
                    }
                }
            }
        }
    }

    store.remove_listener(session_id);
}
