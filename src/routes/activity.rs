use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;

use crate::models::activity::Locale;
use crate::services::catalog_service;

#[derive(Deserialize)]
pub struct ActivityQuery {
    #[serde(default)]
    pub locale: Option<Locale>,
}

pub async fn get_activities(query: web::Query<ActivityQuery>) -> impl Responder {
    let locale = query.locale.unwrap_or_default();
    HttpResponse::Ok().json(catalog_service::localized_activities(locale))
}
