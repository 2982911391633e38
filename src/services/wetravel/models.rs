use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::payment::PaymentLinkResponse;

use super::interface::GatewayError;

/// What checkout hands the gateway: the numbers come from the aggregated
/// price breakdown, never from UI state.
#[derive(Debug, Clone)]
pub struct PaymentLinkRequest {
    pub title: String,
    pub internal_reference: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub customer_first_name: String,
    pub customer_last_name: String,
    pub customer_email: String,
    pub full_price: f64,
    pub deposit: f64,
    pub days_before_departure: i64,
}

#[derive(Debug, Serialize)]
pub struct TripBlock {
    pub title: String,
    pub trip_id: String,
    pub start_date: String,
    pub end_date: String,
    pub currency: String,
    pub participant_fees: String,
}

#[derive(Debug, Serialize)]
pub struct InstallmentBlock {
    pub price: f64,
    pub days_before_departure: i64,
}

#[derive(Debug, Serialize)]
pub struct PaymentPlanBlock {
    pub allow_auto_payment: bool,
    pub allow_partial_payment: bool,
    pub deposit: f64,
    pub installments: Vec<InstallmentBlock>,
}

#[derive(Debug, Serialize)]
pub struct PricingBlock {
    pub price: f64,
    pub payment_plan: PaymentPlanBlock,
}

#[derive(Debug, Serialize)]
pub struct CustomerBlock {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct MetadataBlock {
    pub full_price: f64,
    pub deposit_price: f64,
    pub remaining_balance: f64,
    pub internal_reference: String,
}

#[derive(Debug, Serialize)]
pub struct TripPayloadData {
    pub trip: TripBlock,
    pub pricing: PricingBlock,
    pub customer: CustomerBlock,
    pub metadata: MetadataBlock,
}

/// The provider's trip/pricing envelope.
#[derive(Debug, Serialize)]
pub struct TripPayload {
    pub data: TripPayloadData,
}

impl TripPayload {
    pub fn from_request(request: &PaymentLinkRequest) -> Self {
        Self {
            data: TripPayloadData {
                trip: TripBlock {
                    title: request.title.clone(),
                    trip_id: request.internal_reference.clone(),
                    start_date: request.check_in.format("%Y-%m-%d").to_string(),
                    end_date: request.check_out.format("%Y-%m-%d").to_string(),
                    currency: "USD".to_string(),
                    participant_fees: "all".to_string(),
                },
                pricing: PricingBlock {
                    // Only the deposit gets charged up front.
                    price: request.deposit,
                    payment_plan: PaymentPlanBlock {
                        allow_auto_payment: false,
                        allow_partial_payment: false,
                        deposit: 0.0,
                        installments: vec![InstallmentBlock {
                            price: request.deposit,
                            days_before_departure: request.days_before_departure.max(1),
                        }],
                    },
                },
                customer: CustomerBlock {
                    first_name: request.customer_first_name.clone(),
                    last_name: request.customer_last_name.clone(),
                    email: request.customer_email.clone(),
                },
                metadata: MetadataBlock {
                    full_price: request.full_price,
                    deposit_price: request.deposit,
                    remaining_balance: request.full_price - request.deposit,
                    internal_reference: request.internal_reference.clone(),
                },
            },
        }
    }
}

/// The provider is loose about where it puts identifiers; check every shape
/// it has been seen returning before giving up.
pub fn extract_link_response(body: &Value) -> Result<PaymentLinkResponse, GatewayError> {
    let payment_url = body
        .pointer("/data/trip/url")
        .or_else(|| body.get("payment_url"))
        .or_else(|| body.get("url"))
        .and_then(Value::as_str)
        .ok_or_else(|| {
            GatewayError::InvalidResponse("response carried no payment url".to_string())
        })?;

    let order_id = body
        .pointer("/data/order_id")
        .or_else(|| body.get("order_id"))
        .or_else(|| body.pointer("/data/metadata/order_id"))
        .and_then(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .ok_or_else(|| {
            GatewayError::InvalidResponse("response carried no order id".to_string())
        })?;

    let trip_id = body
        .pointer("/data/trip_id")
        .or_else(|| body.get("trip_id"))
        .and_then(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        });

    let trip_uuid = body
        .pointer("/data/trip/uuid")
        .or_else(|| body.pointer("/data/trip_uuid"))
        .or_else(|| body.get("trip_uuid"))
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(PaymentLinkResponse {
        payment_url: payment_url.to_string(),
        order_id,
        trip_id,
        trip_uuid,
    })
}

/// Error body shape the provider returns on failed calls.
#[derive(Debug, Deserialize)]
pub struct GatewayErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
