use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::activity::TimeSlot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum YogaPackage {
    #[serde(rename = "1-class")]
    OneClass,
    #[serde(rename = "3-classes")]
    ThreeClasses,
    #[serde(rename = "10-classes")]
    TenClasses,
}

/// Yoga is priced either as a named package or as an explicit class count.
/// Only one mode is active per participant at a time.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum YogaSelection {
    Package { package: YogaPackage },
    PerClass { count: u8, pack_discount: bool },
}

/// One priced choice, one variant per activity category. Each variant carries
/// exactly the fields its pricing rule needs.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum PricedSelection {
    Surf {
        classes: u8,
    },
    Yoga {
        selection: YogaSelection,
    },
    IceBath {
        base_price: f64,
        people: u32,
        sessions: u32,
    },
    Ceramics {
        base_price: f64,
        quantity: u32,
    },
    Transport {
        base_price: f64,
        quantity: u32,
        slot: TimeSlot,
    },
    Hosting {
        base_price: f64,
        quantity: u32,
    },
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ActivityLineItem {
    pub participant_id: Uuid,
    pub activity_id: String,
    pub label: String,
    pub amount: f64,
}

/// Derived totals for a session. Recomputed on demand from the session
/// snapshot, never cached across mutations.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PriceBreakdown {
    pub accommodation: f64,
    pub activities: f64,
    pub upgrades: f64,
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
    pub currency: String,
    pub items: Vec<ActivityLineItem>,
}

impl PriceBreakdown {
    pub fn empty() -> Self {
        Self {
            accommodation: 0.0,
            activities: 0.0,
            upgrades: 0.0,
            subtotal: 0.0,
            tax: 0.0,
            total: 0.0,
            currency: "USD".to_string(),
            items: Vec::new(),
        }
    }
}
