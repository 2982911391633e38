use serde_json::json;

#[derive(Debug)]
pub enum NotificationError {
    NotConfigured,
    Transport(String),
    Api { status: u16 },
}

/// WhatsApp sender for staff notices. Every caller treats failures as
/// non-blocking: log and move on, never fail the primary transaction.
pub struct NotificationService {
    client: reqwest::Client,
    api_url: String,
    staff_number: String,
}

impl NotificationService {
    pub fn new(api_url: impl Into<String>, staff_number: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
            staff_number: staff_number.into(),
        }
    }

    pub fn from_env() -> Self {
        let api_url = std::env::var("WHATSAPP_API_URL").unwrap_or_default();
        let staff_number = std::env::var("STAFF_WHATSAPP_NUMBER").unwrap_or_default();
        Self::new(api_url, staff_number)
    }

    pub fn is_configured(&self) -> bool {
        !self.api_url.is_empty() && !self.staff_number.is_empty()
    }

    pub async fn send_message(&self, to: &str, message: &str) -> Result<(), NotificationError> {
        if !self.is_configured() {
            return Err(NotificationError::NotConfigured);
        }
        let response = self
            .client
            .post(&self.api_url)
            .json(&json!({ "to": to, "message": message }))
            .send()
            .await
            .map_err(|e| NotificationError::Transport(e.to_string()))?;
        if !response.status().is_success() {
            return Err(NotificationError::Api {
                status: response.status().as_u16(),
            });
        }
        Ok(())
    }

    /// Fire-and-forget staff notice. Errors are logged and swallowed here so
    /// no call site can accidentally propagate them into a booking flow.
    pub async fn notify_staff(&self, message: &str) {
        match self.send_message(&self.staff_number, message).await {
            Ok(()) => println!("WhatsApp notice sent to staff"),
            Err(NotificationError::NotConfigured) => {
                println!("WhatsApp not configured, skipping staff notice");
            }
            Err(err) => eprintln!("WhatsApp error (non-blocking): {:?}", err),
        }
    }
}
