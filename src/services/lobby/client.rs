use serde::{Deserialize, Serialize};
use url::Url;

use super::products::ConsumptionItem;

const DEFAULT_BASE_URL: &str = "https://api.lobbypms.example/api/v1";

#[derive(Debug)]
pub enum LobbyError {
    NotConfigured,
    Transport(String),
    Api {
        status: u16,
        message: String,
        error_code: Option<String>,
    },
}

impl LobbyError {
    pub fn error_code(&self) -> Option<&str> {
        match self {
            LobbyError::Api { error_code, .. } => error_code.as_deref(),
            _ => None,
        }
    }
}

/// Per-day category availability as the PMS reports it.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CategoryAvailability {
    pub category_id: u32,
    #[serde(default)]
    pub available_rooms: u32,
    #[serde(default)]
    pub price: Option<f64>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DayAvailability {
    pub date: String,
    #[serde(default)]
    pub categories: Vec<CategoryAvailability>,
}

#[derive(Debug, Deserialize)]
struct AvailabilityEnvelope {
    #[serde(default)]
    data: Vec<DayAvailability>,
}

/// Normalized booking payload. Dates are always `YYYY-MM-DD`.
#[derive(Debug, Serialize, Clone)]
pub struct LobbyBookingPayload {
    pub start_date: String,
    pub end_date: String,
    pub category_id: u32,
    pub guest_count: u32,
    pub total_adults: u32,
    pub customer_name: String,
    pub customer_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    pub document_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    pub booking_reference: String,
    pub source: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LobbyBookingResponse {
    #[serde(default)]
    pub booking_id: Option<String>,
    #[serde(default)]
    pub reservation_id: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl LobbyBookingResponse {
    /// The PMS is inconsistent about which id field it fills in.
    pub fn any_id(&self) -> Option<&str> {
        self.booking_id
            .as_deref()
            .or(self.reservation_id.as_deref())
            .or(self.id.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct LobbyErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error_code: Option<String>,
}

/// Thin client for the property-management system.
pub struct LobbyClient {
    client: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl LobbyClient {
    pub fn new(base_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_token: api_token.into(),
        }
    }

    pub fn from_env() -> Self {
        let base_url =
            std::env::var("LOBBYPMS_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let api_token = std::env::var("LOBBYPMS_API_TOKEN").unwrap_or_default();
        Self::new(base_url, api_token)
    }

    /// A placeholder token or URL means every caller should take its demo
    /// path instead of reaching the network.
    pub fn is_configured(&self) -> bool {
        let valid_token = self.api_token.len() > 20 && !self.api_token.contains("placeholder");
        let valid_url = !self.base_url.contains("example") && !self.base_url.contains("placeholder");
        valid_token && valid_url
    }

    fn build_url(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<Url, LobbyError> {
        let base = format!("{}/", self.base_url.trim_end_matches('/'));
        let mut url = Url::parse(&base)
            .and_then(|base| base.join(endpoint.trim_start_matches('/')))
            .map_err(|e| LobbyError::Transport(e.to_string()))?;
        url.query_pairs_mut().append_pair("api_token", &self.api_token);
        for (key, value) in params {
            url.query_pairs_mut().append_pair(key, value);
        }
        Ok(url)
    }

    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, LobbyError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let (message, error_code) = match response.json::<LobbyErrorBody>().await {
            Ok(body) => (
                body.message.unwrap_or_else(|| status.to_string()),
                body.error_code,
            ),
            Err(_) => (status.to_string(), None),
        };
        Err(LobbyError::Api {
            status: status.as_u16(),
            message,
            error_code,
        })
    }

    pub async fn available_rooms(
        &self,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<DayAvailability>, LobbyError> {
        if !self.is_configured() {
            return Err(LobbyError::NotConfigured);
        }
        let url = self.build_url(
            "available-rooms",
            &[("start_date", start_date), ("end_date", end_date)],
        )?;
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| LobbyError::Transport(e.to_string()))?;
        let response = Self::check_response(response).await?;
        let envelope: AvailabilityEnvelope = response
            .json()
            .await
            .map_err(|e| LobbyError::Transport(e.to_string()))?;
        Ok(envelope.data)
    }

    pub async fn create_booking(
        &self,
        payload: &LobbyBookingPayload,
    ) -> Result<LobbyBookingResponse, LobbyError> {
        if !self.is_configured() {
            return Err(LobbyError::NotConfigured);
        }
        let url = self.build_url("bookings", &[])?;
        println!(
            "Creating PMS booking {} ({} to {}, category {})",
            payload.booking_reference, payload.start_date, payload.end_date, payload.category_id
        );
        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| LobbyError::Transport(e.to_string()))?;
        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .map_err(|e| LobbyError::Transport(e.to_string()))
    }

    /// Attach activity consumption items to an existing booking.
    pub async fn add_products(
        &self,
        booking_id: &str,
        items: &[ConsumptionItem],
    ) -> Result<(), LobbyError> {
        if !self.is_configured() {
            return Err(LobbyError::NotConfigured);
        }
        if items.is_empty() {
            return Ok(());
        }
        let url = self.build_url(&format!("bookings/{}/products", booking_id), &[])?;
        let response = self
            .client
            .post(url)
            .json(&serde_json::json!({ "items": items }))
            .send()
            .await
            .map_err(|e| LobbyError::Transport(e.to_string()))?;
        Self::check_response(response).await?;
        Ok(())
    }
}
