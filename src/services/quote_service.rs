use crate::models::activity::{Activity, ActivityCategory};
use crate::models::pricing::{
    ActivityLineItem, PriceBreakdown, PricedSelection, YogaPackage, YogaSelection,
};
use crate::models::session::{BookingSession, Participant};
use crate::services::catalog_service;
use crate::services::pricing_service::PricingService;

const DEFAULT_SURF_CLASSES: u8 = 4;

pub struct QuoteService;

impl QuoteService {
    /// Fold the whole session into a price breakdown. Pull-based: called on
    /// demand from the current snapshot, so the same numbers are reproducible
    /// outside any UI context (e.g. when building the payment payload).
    pub fn quote(session: &BookingSession) -> PriceBreakdown {
        let mut breakdown = PriceBreakdown::empty();

        if let (Some(room), Some(range)) = (&session.accommodation, &session.date_range) {
            breakdown.accommodation =
                PricingService::accommodation_price(room, range.nights(), session.guest_count);
        }

        for participant in &session.participants {
            for activity_id in &participant.selected_activities {
                let activity = match catalog_service::get_activity(activity_id) {
                    Some(activity) => activity,
                    None => continue,
                };
                let selection = Self::selection_for(participant, activity);
                let amount = PricingService::price_selection(&selection);
                breakdown.activities += amount;
                breakdown.items.push(ActivityLineItem {
                    participant_id: participant.id,
                    activity_id: activity.id.clone(),
                    label: activity.localized_name(session.locale).to_string(),
                    amount,
                });
            }

            // Coaching applies once per participant with a surf selection and
            // is itemized separately from the base surf price.
            if session.global_upgrades.private_coaching {
                if let Some(classes) = Self::surf_classes_of(participant) {
                    let surcharge = PricingService::coaching_upgrade(classes);
                    breakdown.upgrades += surcharge;
                    breakdown.items.push(ActivityLineItem {
                        participant_id: participant.id,
                        activity_id: "private-coaching".to_string(),
                        label: "1:1 Coaching".to_string(),
                        amount: surcharge,
                    });
                }
            }
        }

        breakdown.subtotal =
            breakdown.accommodation + breakdown.activities + breakdown.upgrades;
        breakdown.tax = 0.0;
        breakdown.total = breakdown.subtotal + breakdown.tax;
        breakdown
    }

    /// The class count of the participant's surf selection, if any.
    pub fn surf_classes_of(participant: &Participant) -> Option<u8> {
        participant
            .selected_activities
            .iter()
            .filter_map(|id| catalog_service::get_activity(id))
            .find(|activity| activity.category == ActivityCategory::Surf)
            .map(|activity| {
                participant
                    .surf_classes
                    .get(&activity.id)
                    .copied()
                    .unwrap_or(DEFAULT_SURF_CLASSES)
            })
    }

    /// Build the tagged pricing variant for one selected activity from the
    /// participant's (pruned) configuration maps.
    pub fn selection_for(participant: &Participant, activity: &Activity) -> PricedSelection {
        match activity.category {
            ActivityCategory::Surf => PricedSelection::Surf {
                classes: participant
                    .surf_classes
                    .get(&activity.id)
                    .copied()
                    .unwrap_or(DEFAULT_SURF_CLASSES),
            },
            ActivityCategory::Yoga => PricedSelection::Yoga {
                selection: participant
                    .yoga_selection
                    .get(&activity.id)
                    .cloned()
                    .unwrap_or(YogaSelection::Package {
                        package: YogaPackage::ThreeClasses,
                    }),
            },
            ActivityCategory::IceBath => PricedSelection::IceBath {
                base_price: activity.base_price,
                people: participant
                    .ice_bath_people
                    .get(&activity.id)
                    .copied()
                    .unwrap_or(1),
                sessions: participant
                    .ice_bath_sessions
                    .get(&activity.id)
                    .copied()
                    .unwrap_or(1),
            },
            ActivityCategory::Ceramics => PricedSelection::Ceramics {
                base_price: activity.base_price,
                quantity: participant
                    .quantities
                    .get(&activity.id)
                    .copied()
                    .unwrap_or(1),
            },
            ActivityCategory::Transport => PricedSelection::Transport {
                base_price: activity.base_price,
                quantity: participant
                    .quantities
                    .get(&activity.id)
                    .copied()
                    .unwrap_or(1),
                slot: participant
                    .time_slots
                    .get(&activity.id)
                    .copied()
                    .unwrap_or_default(),
            },
            ActivityCategory::Hosting => PricedSelection::Hosting {
                base_price: activity.base_price,
                quantity: participant
                    .quantities
                    .get(&activity.id)
                    .copied()
                    .unwrap_or(1),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::activity::Locale;
    use crate::models::room::SelectedRoom;
    use crate::models::session::{DateRange, GlobalUpgrades};
    use crate::store::sessions::SessionStore;
    use chrono::NaiveDate;

    fn session_with_two_participants() -> BookingSession {
        let store = SessionStore::new();
        let id = store.create_session(2, None, Locale::En);
        store.snapshot(id).unwrap()
    }

    #[test]
    fn aggregates_surf_coaching_and_yoga_lines() {
        let store = SessionStore::new();
        let session_id = store.create_session(2, None, Locale::En);
        let session = store.snapshot(session_id).unwrap();
        let a = session.participants[0].id;
        let b = session.participants[1].id;

        store
            .select_activity(session_id, a, "surf-program")
            .unwrap();
        store.configure_surf(session_id, a, "surf-program", 6).unwrap();
        store
            .select_activity(session_id, b, "yoga-classes")
            .unwrap();
        store
            .configure_yoga(
                session_id,
                b,
                "yoga-classes",
                YogaSelection::Package {
                    package: YogaPackage::TenClasses,
                },
            )
            .unwrap();
        store
            .set_global_upgrades(session_id, GlobalUpgrades {
                private_coaching: true,
            })
            .unwrap();

        let breakdown = QuoteService::quote(&store.snapshot(session_id).unwrap());

        let amounts: Vec<f64> = breakdown.items.iter().map(|item| item.amount).collect();
        assert!(amounts.contains(&546.0), "surf(6) line missing: {:?}", amounts);
        assert!(amounts.contains(&110.0), "coaching line missing: {:?}", amounts);
        assert!(amounts.contains(&80.0), "yoga pack line missing: {:?}", amounts);
        assert_eq!(breakdown.items.len(), 3);
        assert_eq!(breakdown.activities, 626.0);
        assert_eq!(breakdown.upgrades, 110.0);
        assert_eq!(breakdown.activities + breakdown.upgrades, 736.0);
    }

    #[test]
    fn shared_accommodation_totals_per_guest_night() {
        let mut session = session_with_two_participants();
        session.date_range = Some(DateRange {
            check_in: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2026, 9, 4).unwrap(),
        });
        session.accommodation = Some(SelectedRoom {
            room_type_id: "casa-playa".to_string(),
            room_type_name: "Casa de Playa".to_string(),
            nightly_rate: 40.0,
            capacity: 8,
            shared: true,
        });

        let breakdown = QuoteService::quote(&session);
        assert_eq!(breakdown.accommodation, 240.0);
        assert_eq!(breakdown.total, 240.0);
        assert_eq!(breakdown.tax, 0.0);
    }

    #[test]
    fn quote_is_deterministic_for_the_same_snapshot() {
        let store = SessionStore::new();
        let session_id = store.create_session(1, None, Locale::En);
        let session = store.snapshot(session_id).unwrap();
        let pid = session.participants[0].id;
        store
            .select_activity(session_id, pid, "ice-bath-session")
            .unwrap();
        store
            .configure_ice_bath(session_id, pid, "ice-bath-session", 2, 3)
            .unwrap();

        let snapshot = store.snapshot(session_id).unwrap();
        let first = QuoteService::quote(&snapshot);
        let second = QuoteService::quote(&snapshot);
        assert_eq!(first.total, second.total);
        assert_eq!(first.total, 240.0);
    }

    #[test]
    fn coaching_requires_a_surf_selection() {
        let store = SessionStore::new();
        let session_id = store.create_session(1, None, Locale::En);
        let session = store.snapshot(session_id).unwrap();
        let pid = session.participants[0].id;
        store
            .select_activity(session_id, pid, "yoga-classes")
            .unwrap();
        store
            .set_global_upgrades(session_id, GlobalUpgrades {
                private_coaching: true,
            })
            .unwrap();

        let breakdown = QuoteService::quote(&store.snapshot(session_id).unwrap());
        assert_eq!(breakdown.upgrades, 0.0);
    }
}
