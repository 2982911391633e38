use crate::models::activity::ActivityCategory;
use crate::models::pricing::{PricedSelection, YogaPackage, YogaSelection};
use crate::models::room::SelectedRoom;

// Surf curve breakpoints. The 3/5/10-class prices are authoritative; values
// in between are linearly interpolated and rounded to whole dollars.
const SURF_MIN_CLASSES: u8 = 3;
const SURF_MAX_CLASSES: u8 = 10;
const SURF_PRICE_AT_3: f64 = 300.0;
const SURF_PRICE_AT_5: f64 = 460.0;
const SURF_PRICE_AT_10: f64 = 890.0;

const YOGA_CLASS_RATE: f64 = 10.0;
const YOGA_DISCOUNTED_RATE: f64 = 8.0;
const YOGA_PACK_SIZE: u8 = 10;

pub struct PricingService;

impl PricingService {
    /// Progressive surf price over the class count. Total over all inputs;
    /// out-of-range counts clamp to the 3-10 range.
    pub fn surf_price(classes: u8) -> f64 {
        let c = classes.clamp(SURF_MIN_CLASSES, SURF_MAX_CLASSES) as f64;
        if c <= 3.0 {
            SURF_PRICE_AT_3
        } else if c <= 5.0 {
            let price = SURF_PRICE_AT_3 + (SURF_PRICE_AT_5 - SURF_PRICE_AT_3) * (c - 3.0) / 2.0;
            price.round()
        } else {
            let price = SURF_PRICE_AT_5 + (SURF_PRICE_AT_10 - SURF_PRICE_AT_5) * (c - 5.0) / 5.0;
            price.round()
        }
    }

    /// 1:1 coaching surcharge, keyed by the program tier the class count
    /// falls into. Reported as its own line item, never folded into the
    /// base surf price.
    pub fn coaching_upgrade(classes: u8) -> f64 {
        if classes <= 4 {
            90.0
        } else if classes <= 6 {
            110.0
        } else {
            130.0
        }
    }

    pub fn yoga_package_price(package: YogaPackage) -> f64 {
        match package {
            YogaPackage::OneClass => YOGA_CLASS_RATE,
            YogaPackage::ThreeClasses => 3.0 * YOGA_CLASS_RATE,
            // Discounted bundle: 10 classes for the price of 8.
            YogaPackage::TenClasses => 80.0,
        }
    }

    pub fn yoga_price(selection: &YogaSelection) -> f64 {
        match selection {
            YogaSelection::Package { package } => Self::yoga_package_price(*package),
            YogaSelection::PerClass {
                count,
                pack_discount,
            } => {
                let count = (*count).max(1);
                let rate = if *pack_discount && count == YOGA_PACK_SIZE {
                    YOGA_DISCOUNTED_RATE
                } else {
                    YOGA_CLASS_RATE
                };
                count as f64 * rate
            }
        }
    }

    pub fn ice_bath_price(base_price: f64, people: u32, sessions: u32) -> f64 {
        base_price * people.max(1) as f64 * sessions.max(1) as f64
    }

    /// Flat unit pricing for quantity-based activities, with the per-category
    /// quantity cap applied.
    pub fn flat_price(base_price: f64, quantity: u32, category: ActivityCategory) -> f64 {
        let cap = Self::quantity_cap(category);
        base_price * quantity.clamp(1, cap) as f64
    }

    pub fn quantity_cap(category: ActivityCategory) -> u32 {
        match category {
            ActivityCategory::Surf => 2,
            ActivityCategory::Transport => 3,
            ActivityCategory::Hosting => 5,
            _ => u32::MAX,
        }
    }

    /// Shared rooms price per guest-night; private rooms per room-night,
    /// times however many rooms the party needs.
    pub fn accommodation_price(room: &SelectedRoom, nights: u32, guests: u32) -> f64 {
        let nights = nights as f64;
        if room.shared {
            room.nightly_rate * nights * guests.max(1) as f64
        } else {
            let capacity = room.capacity.max(1);
            let rooms_needed = guests.max(1).div_ceil(capacity);
            room.nightly_rate * nights * rooms_needed as f64
        }
    }

    /// Single exhaustive dispatch over the per-category variants.
    pub fn price_selection(selection: &PricedSelection) -> f64 {
        match selection {
            PricedSelection::Surf { classes } => Self::surf_price(*classes),
            PricedSelection::Yoga { selection } => Self::yoga_price(selection),
            PricedSelection::IceBath {
                base_price,
                people,
                sessions,
            } => Self::ice_bath_price(*base_price, *people, *sessions),
            PricedSelection::Ceramics {
                base_price,
                quantity,
            } => Self::flat_price(*base_price, *quantity, ActivityCategory::Ceramics),
            PricedSelection::Transport {
                base_price,
                quantity,
                ..
            } => Self::flat_price(*base_price, *quantity, ActivityCategory::Transport),
            PricedSelection::Hosting {
                base_price,
                quantity,
            } => Self::flat_price(*base_price, *quantity, ActivityCategory::Hosting),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surf_breakpoints_are_exact() {
        assert_eq!(PricingService::surf_price(3), 300.0);
        assert_eq!(PricingService::surf_price(5), 460.0);
        assert_eq!(PricingService::surf_price(10), 890.0);
    }

    #[test]
    fn surf_interpolated_values() {
        assert_eq!(PricingService::surf_price(4), 380.0);
        assert_eq!(PricingService::surf_price(6), 546.0);
        assert_eq!(PricingService::surf_price(7), 632.0);
        assert_eq!(PricingService::surf_price(8), 718.0);
        assert_eq!(PricingService::surf_price(9), 804.0);
    }

    #[test]
    fn surf_price_is_non_decreasing() {
        let mut last = 0.0;
        for classes in 3..=10u8 {
            let price = PricingService::surf_price(classes);
            assert!(price >= last, "price dropped at {} classes", classes);
            last = price;
        }
    }

    #[test]
    fn surf_out_of_range_clamps() {
        assert_eq!(PricingService::surf_price(0), 300.0);
        assert_eq!(PricingService::surf_price(2), 300.0);
        assert_eq!(PricingService::surf_price(11), 890.0);
        assert_eq!(PricingService::surf_price(255), 890.0);
    }

    #[test]
    fn coaching_tiers() {
        assert_eq!(PricingService::coaching_upgrade(3), 90.0);
        assert_eq!(PricingService::coaching_upgrade(4), 90.0);
        assert_eq!(PricingService::coaching_upgrade(5), 110.0);
        assert_eq!(PricingService::coaching_upgrade(6), 110.0);
        assert_eq!(PricingService::coaching_upgrade(7), 130.0);
        assert_eq!(PricingService::coaching_upgrade(10), 130.0);
    }

    #[test]
    fn yoga_packages() {
        assert_eq!(
            PricingService::yoga_package_price(YogaPackage::OneClass),
            10.0
        );
        assert_eq!(
            PricingService::yoga_package_price(YogaPackage::ThreeClasses),
            30.0
        );
        assert_eq!(
            PricingService::yoga_package_price(YogaPackage::TenClasses),
            80.0
        );
    }

    #[test]
    fn yoga_per_class_rate_depends_on_discount() {
        let plain = YogaSelection::PerClass {
            count: 10,
            pack_discount: false,
        };
        let discounted = YogaSelection::PerClass {
            count: 10,
            pack_discount: true,
        };
        assert_eq!(PricingService::yoga_price(&plain), 100.0);
        assert_eq!(PricingService::yoga_price(&discounted), 80.0);

        // Discount only applies when the count is pinned to 10.
        let off_pack = YogaSelection::PerClass {
            count: 7,
            pack_discount: true,
        };
        assert_eq!(PricingService::yoga_price(&off_pack), 70.0);
    }

    #[test]
    fn ice_bath_multiplies_people_and_sessions() {
        assert_eq!(PricingService::ice_bath_price(40.0, 2, 3), 240.0);
        // Zero quantities clamp to one.
        assert_eq!(PricingService::ice_bath_price(40.0, 0, 0), 40.0);
    }

    #[test]
    fn flat_quantities_are_capped() {
        assert_eq!(
            PricingService::flat_price(50.0, 5, ActivityCategory::Transport),
            150.0
        );
        assert_eq!(
            PricingService::flat_price(100.0, 9, ActivityCategory::Hosting),
            500.0
        );
        assert_eq!(
            PricingService::flat_price(100.0, 9, ActivityCategory::Surf),
            200.0
        );
    }

    #[test]
    fn shared_room_prices_per_guest_night() {
        let room = SelectedRoom {
            room_type_id: "casa-playa".to_string(),
            room_type_name: "Casa de Playa".to_string(),
            nightly_rate: 40.0,
            capacity: 8,
            shared: true,
        };
        assert_eq!(PricingService::accommodation_price(&room, 3, 2), 240.0);
    }

    #[test]
    fn private_room_prices_per_room_night() {
        let room = SelectedRoom {
            room_type_id: "casitas-privadas".to_string(),
            room_type_name: "Casitas Privadas".to_string(),
            nightly_rate: 95.0,
            capacity: 2,
            shared: false,
        };
        // Two guests fit one room; rate is independent of guest count.
        assert_eq!(PricingService::accommodation_price(&room, 4, 2), 380.0);
        // Three guests need a second room.
        assert_eq!(PricingService::accommodation_price(&room, 4, 3), 760.0);
    }
}
