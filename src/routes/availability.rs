use std::collections::HashMap;
use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::room::RoomOption;
use crate::services::catalog_service;
use crate::services::lobby::client::LobbyClient;
use crate::services::lobby::products;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRequest {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub available: bool,
    pub available_rooms: Vec<RoomOption>,
    pub demo_mode: bool,
}

fn demo_rooms() -> Vec<RoomOption> {
    catalog_service::all_room_types()
        .iter()
        .map(|room| RoomOption {
            room_type_id: room.id.clone(),
            room_type_name: room.name.clone(),
            available_rooms: room.capacity,
            price_per_night: room.default_rate,
            capacity: room.capacity,
            shared: room.shared,
        })
        .collect()
}

pub async fn check_availability(
    data: web::Data<Arc<LobbyClient>>,
    input: web::Json<AvailabilityRequest>,
) -> impl Responder {
    let input = input.into_inner();
    if input.check_out <= input.check_in {
        return HttpResponse::BadRequest().body("check-out must be after check-in");
    }
    if input.guests < 1 {
        return HttpResponse::BadRequest().body("at least one guest is required");
    }

    let start = input.check_in.format("%Y-%m-%d").to_string();
    let end = input.check_out.format("%Y-%m-%d").to_string();

    let days = match data.available_rooms(&start, &end).await {
        Ok(days) => days,
        Err(err) => {
            eprintln!("Availability lookup failed, serving demo rooms: {:?}", err);
            let rooms = demo_rooms();
            return HttpResponse::Ok().json(AvailabilityResponse {
                available: true,
                available_rooms: rooms,
                demo_mode: true,
            });
        }
    };

    // Collapse per-day category data into one option per room type: the
    // worst-night availability and the highest nightly rate seen.
    let mut min_available: HashMap<&'static str, u32> = HashMap::new();
    let mut max_rate: HashMap<&'static str, f64> = HashMap::new();
    for day in &days {
        for category in &day.categories {
            let room_type_id = match products::room_type_for_category(category.category_id) {
                Some(id) => id,
                None => continue,
            };
            min_available
                .entry(room_type_id)
                .and_modify(|available| *available = (*available).min(category.available_rooms))
                .or_insert(category.available_rooms);
            if let Some(price) = category.price {
                max_rate
                    .entry(room_type_id)
                    .and_modify(|rate| *rate = rate.max(price))
                    .or_insert(price);
            }
        }
    }

    let available_rooms: Vec<RoomOption> = catalog_service::all_room_types()
        .iter()
        .filter_map(|room| {
            let available = *min_available.get(room.id.as_str())?;
            if available == 0 {
                return None;
            }
            Some(RoomOption {
                room_type_id: room.id.clone(),
                room_type_name: room.name.clone(),
                available_rooms: available,
                price_per_night: *max_rate.get(room.id.as_str()).unwrap_or(&room.default_rate),
                capacity: room.capacity,
                shared: room.shared,
            })
        })
        .collect();

    HttpResponse::Ok().json(AvailabilityResponse {
        available: !available_rooms.is_empty(),
        available_rooms,
        demo_mode: false,
    })
}
