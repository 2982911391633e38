use actix_web::{web, HttpResponse, Responder};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::activity::ActivityCategory;
use crate::services::catalog_service;
use crate::services::pricing_service::PricingService;

const MAX_GUESTS: u32 = 12;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteActivityInput {
    pub activity_id: String,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub class_count: Option<u8>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
    #[serde(default)]
    pub room_type_id: Option<String>,
    #[serde(default)]
    pub activities: Vec<QuoteActivityInput>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteLineItem {
    pub activity_id: String,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteBreakdown {
    pub accommodation: f64,
    pub activities: Vec<QuoteLineItem>,
    pub subtotal: f64,
    pub taxes: f64,
    pub total: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub success: bool,
    pub price_breakdown: QuoteBreakdown,
    pub nights: u32,
    pub accommodation_price_per_night: f64,
}

/// Stateless quote for callers that have no session yet. Session-based
/// pricing goes through the aggregator instead.
pub async fn calculate_quote(input: web::Json<QuoteRequest>) -> impl Responder {
    let input = input.into_inner();

    if input.check_out <= input.check_in {
        return HttpResponse::BadRequest().body("check-out must be after check-in");
    }
    if input.guests < 1 {
        return HttpResponse::BadRequest().body("at least one guest is required");
    }
    if input.guests > MAX_GUESTS {
        return HttpResponse::BadRequest()
            .body(format!("a maximum of {} guests is supported", MAX_GUESTS));
    }

    let nights = (input.check_out - input.check_in).num_days().max(0) as u32;

    let mut accommodation_rate = 0.0;
    let mut accommodation_total = 0.0;
    if let Some(room_type_id) = &input.room_type_id {
        let room = match catalog_service::get_room_type(room_type_id) {
            Some(room) => room,
            None => {
                return HttpResponse::BadRequest()
                    .body(format!("unknown room type: {}", room_type_id))
            }
        };
        accommodation_rate = room.default_rate;
        accommodation_total = if room.shared {
            room.default_rate * nights as f64 * input.guests as f64
        } else {
            let rooms_needed = input.guests.max(1).div_ceil(room.capacity.max(1));
            room.default_rate * nights as f64 * rooms_needed as f64
        };
    }

    let guests = input.guests as f64;
    let mut line_items = Vec::new();
    let mut activities_total = 0.0;
    for item in &input.activities {
        let activity = match catalog_service::get_activity(&item.activity_id) {
            Some(activity) => activity,
            None => continue,
        };
        let quantity = item.quantity.unwrap_or(1).max(1);
        let price = match activity.category {
            ActivityCategory::Surf => {
                PricingService::surf_price(item.class_count.unwrap_or(4)) * guests
            }
            ActivityCategory::Yoga => activity.base_price * quantity as f64 * guests,
            ActivityCategory::Transport => {
                PricingService::flat_price(activity.base_price, quantity, activity.category)
                    * guests
            }
            ActivityCategory::IceBath
            | ActivityCategory::Ceramics
            | ActivityCategory::Hosting => {
                PricingService::flat_price(activity.base_price, quantity, activity.category)
            }
        };
        activities_total += price;
        line_items.push(QuoteLineItem {
            activity_id: activity.id.clone(),
            name: activity.name_en.clone(),
            price,
            quantity,
        });
    }

    let subtotal = accommodation_total + activities_total;
    // No IVA on bookings.
    let taxes = 0.0;

    HttpResponse::Ok().json(QuoteResponse {
        success: true,
        price_breakdown: QuoteBreakdown {
            accommodation: accommodation_total,
            activities: line_items,
            subtotal,
            taxes,
            total: subtotal + taxes,
        },
        nights,
        accommodation_price_per_night: accommodation_rate,
    })
}
