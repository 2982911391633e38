use serde::{Deserialize, Serialize};

/// Catalog room type. `shared` rooms price per guest-night, private ones
/// per room-night.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RoomType {
    pub id: String,
    pub name: String,
    pub capacity: u32,
    pub shared: bool,
    pub default_rate: f64,
}

/// A room offered for a concrete date range, as returned by availability.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RoomOption {
    pub room_type_id: String,
    pub room_type_name: String,
    pub available_rooms: u32,
    pub price_per_night: f64,
    pub capacity: u32,
    pub shared: bool,
}

/// The room a session has locked in. Carries everything pricing needs so
/// the aggregator never reaches back into availability data.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SelectedRoom {
    pub room_type_id: String,
    pub room_type_name: String,
    pub nightly_rate: f64,
    pub capacity: u32,
    pub shared: bool,
}

impl SelectedRoom {
    pub fn from_option(option: &RoomOption) -> Self {
        Self {
            room_type_id: option.room_type_id.clone(),
            room_type_name: option.room_type_name.clone(),
            nightly_rate: option.price_per_night,
            capacity: option.capacity,
            shared: option.shared,
        }
    }
}
