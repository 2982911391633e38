use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App};

use surfcamp_api::routes;
use surfcamp_api::services::lobby::client::LobbyClient;
use surfcamp_api::services::notification_service::NotificationService;
use surfcamp_api::services::wetravel::interface::PaymentGateway;
use surfcamp_api::services::wetravel::provider::WeTravelProvider;
use surfcamp_api::store::sessions::SessionStore;

/// Test harness building the real application. No gateway, PMS or WhatsApp
/// credentials are set, so every outbound collaborator takes its demo path.
pub struct TestApp {
    pub store: SessionStore,
}

impl TestApp {
    pub fn new() -> Self {
        Self {
            store: SessionStore::new(),
        }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let gateway: Arc<dyn PaymentGateway> = Arc::new(WeTravelProvider::new(
            "https://api.wetravel.example/v1/trips",
            "",
            "https://api.wetravel.example/v1/payment-status",
            "https://api.wetravel.example/v1/payment-status-stream",
        ));
        let lobby = Arc::new(LobbyClient::new(
            "https://api.lobbypms.example/api/v1",
            "placeholder",
        ));
        let notifier = Arc::new(NotificationService::new("", ""));

        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .route("/health", web::get().to(|| async { "OK" }))
            .app_data(web::Data::new(self.store.clone()))
            .app_data(web::Data::new(gateway))
            .app_data(web::Data::new(lobby))
            .app_data(web::Data::new(notifier))
            .service(
                web::scope("/api")
                    .route(
                        "/activities",
                        web::get().to(routes::activity::get_activities),
                    )
                    .route(
                        "/availability",
                        web::post().to(routes::availability::check_availability),
                    )
                    .route("/quote", web::post().to(routes::quote::calculate_quote))
                    .route(
                        "/reserve",
                        web::post().to(routes::reservation::create_reservation),
                    )
                    .service(
                        web::scope("/sessions")
                            .route("", web::post().to(routes::session::create_session))
                            .route("/{id}", web::get().to(routes::session::get_session))
                            .route("/{id}/dates", web::put().to(routes::session::set_dates))
                            .route("/{id}/guests", web::put().to(routes::session::set_guests))
                            .route(
                                "/{id}/accommodation",
                                web::put().to(routes::session::set_accommodation),
                            )
                            .route("/{id}/contact", web::put().to(routes::session::set_contact))
                            .route(
                                "/{id}/upgrades",
                                web::put().to(routes::session::set_upgrades),
                            )
                            .route(
                                "/{id}/quote",
                                web::get().to(routes::session::get_session_quote),
                            )
                            .route(
                                "/{id}/participants",
                                web::post().to(routes::session::add_participant),
                            )
                            .route(
                                "/{id}/participants/{pid}",
                                web::delete().to(routes::session::remove_participant),
                            )
                            .route(
                                "/{id}/participants/{pid}/name",
                                web::put().to(routes::session::update_participant_name),
                            )
                            .route(
                                "/{id}/participants/{pid}/activate",
                                web::post().to(routes::session::activate_participant),
                            )
                            .route(
                                "/{id}/participants/{pid}/copy-to-all",
                                web::post().to(routes::session::copy_choices_to_all),
                            )
                            .route(
                                "/{id}/participants/{pid}/activities",
                                web::post().to(routes::session::select_activity),
                            )
                            .route(
                                "/{id}/participants/{pid}/activities/{aid}",
                                web::delete().to(routes::session::deselect_activity),
                            )
                            .route(
                                "/{id}/participants/{pid}/flow/{op}",
                                web::post().to(routes::session::flow_step),
                            )
                            .route("/{id}/checkout", web::post().to(routes::payment::checkout))
                            .route("/{id}/payment", web::get().to(routes::payment::get_payment))
                            .route(
                                "/{id}/payment/watch",
                                web::post().to(routes::payment::restart_watch),
                            )
                            .route(
                                "/{id}/payment/cancel",
                                web::post().to(routes::payment::cancel_payment),
                            ),
                    ),
            )
    }
}
