use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityCategory {
    Surf,
    Yoga,
    IceBath,
    Ceramics,
    Transport,
    Hosting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum Locale {
    #[serde(rename = "es")]
    Es,
    #[serde(rename = "en")]
    En,
}

impl Default for Locale {
    fn default() -> Self {
        Locale::Es
    }
}

/// Departure slots for the airport shuttle. Two fixed runs per day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum TimeSlot {
    #[serde(rename = "7:00 AM")]
    SevenAm,
    #[serde(rename = "3:00 PM")]
    ThreePm,
}

impl Default for TimeSlot {
    fn default() -> Self {
        TimeSlot::SevenAm
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Activity {
    pub id: String,
    pub category: ActivityCategory,
    pub base_price: f64,
    pub duration_minutes: u16,
    pub max_quantity: u32,
    pub name_es: String,
    pub name_en: String,
    pub description_es: String,
    pub description_en: String,
}

impl Activity {
    pub fn localized_name(&self, locale: Locale) -> &str {
        match locale {
            Locale::Es => &self.name_es,
            Locale::En => &self.name_en,
        }
    }

    pub fn localized_description(&self, locale: Locale) -> &str {
        match locale {
            Locale::Es => &self.description_es,
            Locale::En => &self.description_en,
        }
    }
}

/// Catalog entry shipped to the frontend with a single resolved name.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LocalizedActivity {
    pub id: String,
    pub category: ActivityCategory,
    pub base_price: f64,
    pub duration_minutes: u16,
    pub max_quantity: u32,
    pub name: String,
    pub description: String,
}

impl LocalizedActivity {
    pub fn from_activity(activity: &Activity, locale: Locale) -> Self {
        Self {
            id: activity.id.clone(),
            category: activity.category,
            base_price: activity.base_price,
            duration_minutes: activity.duration_minutes,
            max_quantity: activity.max_quantity,
            name: activity.localized_name(locale).to_string(),
            description: activity.localized_description(locale).to_string(),
        }
    }
}
