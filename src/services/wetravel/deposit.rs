use crate::models::pricing::PriceBreakdown;
use crate::models::session::BookingSession;
use crate::services::pricing_service::PricingService;
use crate::services::quote_service::QuoteService;

/// How the up-front payment decomposes. Consumed when building the payment
/// payload; the formula itself belongs to the payment provider.
#[derive(Debug, Clone, PartialEq)]
pub struct DepositBreakdown {
    pub program_difference: f64,
    pub accommodation_deposit: f64,
    pub coaching_cost: f64,
    pub total: f64,
    pub participant_count: usize,
    pub coaching_participants: usize,
}

/// Per-program share that is collected through the payment provider rather
/// than registered with the PMS.
fn program_difference(classes: u8) -> f64 {
    if classes <= 4 {
        70.0
    } else if classes <= 6 {
        90.0
    } else {
        70.0
    }
}

/// Deposit owed at checkout: 10% of the total by default, or the
/// provider-specific program formula when surf programs are present.
pub fn compute_deposit(session: &BookingSession, breakdown: &PriceBreakdown) -> DepositBreakdown {
    let surf_classes: Vec<u8> = session
        .participants
        .iter()
        .filter_map(QuoteService::surf_classes_of)
        .collect();

    if surf_classes.is_empty() {
        let deposit = (breakdown.total * 0.10).round();
        return DepositBreakdown {
            program_difference: 0.0,
            accommodation_deposit: deposit,
            coaching_cost: 0.0,
            total: deposit,
            participant_count: 0,
            coaching_participants: 0,
        };
    }

    let program_total: f64 = surf_classes.iter().map(|c| program_difference(*c)).sum();
    let accommodation_deposit = (breakdown.accommodation * 0.10).round();
    let coaching_cost: f64 = if session.global_upgrades.private_coaching {
        surf_classes
            .iter()
            .map(|c| PricingService::coaching_upgrade(*c))
            .sum()
    } else {
        0.0
    };
    let coaching_participants = if session.global_upgrades.private_coaching {
        surf_classes.len()
    } else {
        0
    };

    DepositBreakdown {
        program_difference: program_total,
        accommodation_deposit,
        coaching_cost,
        total: program_total + accommodation_deposit + coaching_cost,
        participant_count: surf_classes.len(),
        coaching_participants,
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

    fn dated_range() -> DateRange {
        DateRange {
            check_in: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2026, 9, 4).unwrap(),
        }
    }

    #[test]
    fn without_surf_the_deposit_is_ten_percent_of_total() {
        let store = SessionStore::new();
        let id = store.create_session(2, Some(dated_range()), Locale::En);
        store
            .set_accommodation(
                id,
                SelectedRoom {
                    room_type_id: "casa-playa".to_string(),
                    room_type_name: "Casa de Playa".to_string(),
                    nightly_rate: 40.0,
                    capacity: 8,
                    shared: true,
                },
            )
            .unwrap();

        let session = store.snapshot(id).unwrap();
        let breakdown = QuoteService::quote(&session);
        let deposit = compute_deposit(&session, &breakdown);

        // $40 x 3 nights x 2 guests = $240 -> $24 deposit.
        assert_eq!(deposit.total, 24.0);
        assert_eq!(deposit.program_difference, 0.0);
        assert_eq!(deposit.coaching_cost, 0.0);
    }

    #[test]
    fn surf_programs_switch_to_the_provider_formula() {
        let store = SessionStore::new();
        let id = store.create_session(2, Some(dated_range()), Locale::En);
        store
            .set_accommodation(
                id,
                SelectedRoom {
                    room_type_id: "casa-playa".to_string(),
                    room_type_name: "Casa de Playa".to_string(),
                    nightly_rate: 40.0,
                    capacity: 8,
                    shared: true,
                },
            )
            .unwrap();
        let session = store.snapshot(id).unwrap();
        let a = session.participants[0].id;
        let b = session.participants[1].id;
        store.select_activity(id, a, "surf-program").unwrap();
        store.configure_surf(id, a, "surf-program", 6).unwrap();
        store.select_activity(id, b, "surf-program").unwrap();
        store.configure_surf(id, b, "surf-program", 4).unwrap();
        store
            .set_global_upgrades(id, GlobalUpgrades {
                private_coaching: true,
            })
            .unwrap();

        let session = store.snapshot(id).unwrap();
        let breakdown = QuoteService::quote(&session);
        let deposit = compute_deposit(&session, &breakdown);

        // Programs: 6-class ($90) + 4-class ($70); accommodation $240 -> $24;
        // coaching: $110 + $90.
        assert_eq!(deposit.program_difference, 160.0);
        assert_eq!(deposit.accommodation_deposit, 24.0);
        assert_eq!(deposit.coaching_cost, 200.0);
        assert_eq!(deposit.total, 384.0);
        assert_eq!(deposit.participant_count, 2);
        assert_eq!(deposit.coaching_participants, 2);
    }

    #[test]
    fn program_difference_tiers() {
        assert_eq!(program_difference(3), 70.0);
        assert_eq!(program_difference(4), 70.0);
        assert_eq!(program_difference(5), 90.0);
        assert_eq!(program_difference(6), 90.0);
        assert_eq!(program_difference(8), 70.0);
    }
}
