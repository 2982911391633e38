use crate::models::activity::ActivityCategory;
use crate::models::pricing::{YogaPackage, YogaSelection};
use crate::models::session::Participant;
use crate::services::catalog_service;

// Static, versioned mapping from internal room types to PMS category ids.
// Owned by the PMS configuration, not computed here.
const ROOM_TYPE_MAPPING: &[(&str, u32)] = &[
    ("casa-playa", 4234),
    ("casitas-privadas", 15507),
    ("casas-deluxe", 5348),
];

// PMS product/service ids for activity consumption items.
const YOGA_ONE_CLASS: &str = "219724";
const YOGA_THREE_CLASSES: &str = "219726";
const YOGA_TEN_CLASSES: &str = "219727";
const SURF_CORE: &str = "488396";
const SURF_INTENSIVE: &str = "489528";
const SURF_ELITE: &str = "489529";
const ICE_BATH: &str = "465954";
const HOSTING: &str = "494398";

pub fn room_category_id(room_type_id: &str) -> Option<u32> {
    ROOM_TYPE_MAPPING
        .iter()
        .find(|(id, _)| *id == room_type_id)
        .map(|(_, category)| *category)
}

pub fn room_type_for_category(category_id: u32) -> Option<&'static str> {
    ROOM_TYPE_MAPPING
        .iter()
        .find(|(_, category)| *category == category_id)
        .map(|(id, _)| *id)
}

fn surf_product_id(classes: u8) -> &'static str {
    if classes <= 4 {
        SURF_CORE
    } else if classes <= 6 {
        SURF_INTENSIVE
    } else {
        SURF_ELITE
    }
}

fn yoga_product_id(selection: &YogaSelection) -> &'static str {
    match selection {
        YogaSelection::Package {
            package: YogaPackage::OneClass,
        } => YOGA_ONE_CLASS,
        YogaSelection::Package {
            package: YogaPackage::ThreeClasses,
        } => YOGA_THREE_CLASSES,
        YogaSelection::Package {
            package: YogaPackage::TenClasses,
        } => YOGA_TEN_CLASSES,
        YogaSelection::PerClass { .. } => YOGA_ONE_CLASS,
    }
}

/// A product/service line registered with the PMS alongside the booking.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ConsumptionItem {
    pub product_id: String,
    pub quantity: u32,
}

/// Resolve a participant's selections into PMS consumption items. Built
/// strictly from the pruned configuration maps, so deselected activities
/// can never leak into the outbound payload.
pub fn consumption_items(participant: &Participant) -> Vec<ConsumptionItem> {
    let mut items = Vec::new();
    for activity_id in &participant.selected_activities {
        let activity = match catalog_service::get_activity(activity_id) {
            Some(activity) => activity,
            None => continue,
        };
        match activity.category {
            ActivityCategory::Surf => {
                let classes = participant
                    .surf_classes
                    .get(activity_id)
                    .copied()
                    .unwrap_or(4);
                items.push(ConsumptionItem {
                    product_id: surf_product_id(classes).to_string(),
                    quantity: 1,
                });
            }
            ActivityCategory::Yoga => {
                if let Some(selection) = participant.yoga_selection.get(activity_id) {
                    let quantity = match selection {
                        YogaSelection::PerClass { count, .. } => (*count).max(1) as u32,
                        YogaSelection::Package { .. } => 1,
                    };
                    items.push(ConsumptionItem {
                        product_id: yoga_product_id(selection).to_string(),
                        quantity,
                    });
                }
            }
            ActivityCategory::IceBath => {
                let people = participant
                    .ice_bath_people
                    .get(activity_id)
                    .copied()
                    .unwrap_or(1);
                let sessions = participant
                    .ice_bath_sessions
                    .get(activity_id)
                    .copied()
                    .unwrap_or(1);
                items.push(ConsumptionItem {
                    product_id: ICE_BATH.to_string(),
                    quantity: people.max(1) * sessions.max(1),
                });
            }
            ActivityCategory::Hosting => {
                let quantity = participant
                    .quantities
                    .get(activity_id)
                    .copied()
                    .unwrap_or(1);
                items.push(ConsumptionItem {
                    product_id: HOSTING.to_string(),
                    quantity,
                });
            }
            // Transport and ceramics are handled outside the PMS.
            ActivityCategory::Transport | ActivityCategory::Ceramics => {}
        }
    }
    items
}
