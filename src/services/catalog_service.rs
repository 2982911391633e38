use std::sync::OnceLock;

use crate::models::activity::{Activity, ActivityCategory, Locale, LocalizedActivity};
use crate::models::room::RoomType;

// Base prices must stay in sync with the reservation system's product list.
const YOGA_CLASS_PRICE: f64 = 10.0;
const SURF_CLASS_PRICE: f64 = 100.0;
const ICE_BATH_SESSION_PRICE: f64 = 40.0;
const CERAMICS_WORKSHOP_PRICE: f64 = 45.0;
const TRANSPORT_TRIP_PRICE: f64 = 50.0;
const HOSTING_NIGHT_PRICE: f64 = 100.0;

fn build_activities() -> Vec<Activity> {
    vec![
        Activity {
            id: "surf-program".to_string(),
            category: ActivityCategory::Surf,
            base_price: SURF_CLASS_PRICE,
            duration_minutes: 120,
            max_quantity: 2,
            name_es: "Programa de Surf".to_string(),
            name_en: "Surf Program".to_string(),
            description_es: "Clases de surf con instructor certificado. Incluye tabla y lycra."
                .to_string(),
            description_en: "Surf lessons with a certified instructor. Board and rash guard included."
                .to_string(),
        },
        Activity {
            id: "yoga-classes".to_string(),
            category: ActivityCategory::Yoga,
            base_price: YOGA_CLASS_PRICE,
            duration_minutes: 60,
            max_quantity: 15,
            name_es: "Yoga Matutino".to_string(),
            name_en: "Morning Yoga".to_string(),
            description_es: "Sesión de yoga al amanecer para comenzar el día con energía."
                .to_string(),
            description_en: "Sunrise yoga session to start the day with energy.".to_string(),
        },
        Activity {
            id: "ice-bath-session".to_string(),
            category: ActivityCategory::IceBath,
            base_price: ICE_BATH_SESSION_PRICE,
            duration_minutes: 30,
            max_quantity: 10,
            name_es: "Baño de Hielo".to_string(),
            name_en: "Ice Bath".to_string(),
            description_es: "Terapia de frío para recuperación y bienestar mental.".to_string(),
            description_en: "Cold therapy for recovery and mental wellbeing.".to_string(),
        },
        Activity {
            id: "ceramics-workshop".to_string(),
            category: ActivityCategory::Ceramics,
            base_price: CERAMICS_WORKSHOP_PRICE,
            duration_minutes: 90,
            max_quantity: 8,
            name_es: "Taller de Cerámica".to_string(),
            name_en: "Ceramics Workshop".to_string(),
            description_es: "Taller de cerámica con artistas locales.".to_string(),
            description_en: "Ceramics workshop with local artists.".to_string(),
        },
        Activity {
            id: "transport-airport".to_string(),
            category: ActivityCategory::Transport,
            base_price: TRANSPORT_TRIP_PRICE,
            duration_minutes: 360,
            max_quantity: 3,
            name_es: "Transporte Aeropuerto".to_string(),
            name_en: "Airport Transport".to_string(),
            description_es: "Transporte terrestre desde/hacia el aeropuerto. Dos salidas diarias."
                .to_string(),
            description_en: "Ground transport to/from the airport. Two daily departures."
                .to_string(),
        },
        Activity {
            id: "hosting-night".to_string(),
            category: ActivityCategory::Hosting,
            base_price: HOSTING_NIGHT_PRICE,
            duration_minutes: 0,
            max_quantity: 5,
            name_es: "Hospedaje Adicional".to_string(),
            name_en: "Extra Hosting".to_string(),
            description_es: "Noches de hospedaje adicionales fuera del paquete.".to_string(),
            description_en: "Additional hosted nights outside the package.".to_string(),
        },
    ]
}

fn build_room_types() -> Vec<RoomType> {
    vec![
        RoomType {
            id: "casa-playa".to_string(),
            name: "Casa de Playa (Cuarto Compartido)".to_string(),
            capacity: 8,
            shared: true,
            default_rate: 40.0,
        },
        RoomType {
            id: "casitas-privadas".to_string(),
            name: "Casitas Privadas".to_string(),
            capacity: 2,
            shared: false,
            default_rate: 95.0,
        },
        RoomType {
            id: "casas-deluxe".to_string(),
            name: "Casas Deluxe".to_string(),
            capacity: 2,
            shared: false,
            default_rate: 120.0,
        },
    ]
}

pub fn all_activities() -> &'static [Activity] {
    static ACTIVITIES: OnceLock<Vec<Activity>> = OnceLock::new();
    ACTIVITIES.get_or_init(build_activities)
}

pub fn get_activity(id: &str) -> Option<&'static Activity> {
    all_activities().iter().find(|activity| activity.id == id)
}

pub fn activities_by_category(category: ActivityCategory) -> Vec<&'static Activity> {
    all_activities()
        .iter()
        .filter(|activity| activity.category == category)
        .collect()
}

pub fn localized_activities(locale: Locale) -> Vec<LocalizedActivity> {
    all_activities()
        .iter()
        .map(|activity| LocalizedActivity::from_activity(activity, locale))
        .collect()
}

pub fn all_room_types() -> &'static [RoomType] {
    static ROOM_TYPES: OnceLock<Vec<RoomType>> = OnceLock::new();
    ROOM_TYPES.get_or_init(build_room_types)
}

pub fn get_room_type(id: &str) -> Option<&'static RoomType> {
    all_room_types().iter().find(|room| room.id == id)
}
