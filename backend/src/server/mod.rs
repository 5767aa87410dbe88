//! Server construction and middleware wiring.

mod config;
mod settings;
mod state_builders;

pub use config::ServerConfig;
pub use settings::AppSettings;
pub use state_builders::build_booking_service;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use ::meeting_room::Trace;
#[cfg(debug_assertions)]
use ::meeting_room::doc::ApiDoc;
use ::meeting_room::inbound::http::calendar::{advance, calendar};
use ::meeting_room::inbound::http::health::{HealthState, live, ready};
use ::meeting_room::inbound::http::reservations::{
    create_reservation, delete_reservation, list_reservations, update_reservation,
    validate_reservation,
};
use ::meeting_room::inbound::http::room::{meeting_room, refresh, time_options};
use ::meeting_room::inbound::http::state::HttpState;
use ::meeting_room::inbound::http::users::{create_user, delete_user, list_users, update_user};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let api = web::scope("/api/v1")
        .service(list_users)
        .service(create_user)
        .service(update_user)
        .service(delete_user)
        .service(list_reservations)
        .service(validate_reservation)
        .service(create_reservation)
        .service(update_reservation)
        .service(delete_reservation)
        .service(advance)
        .service(calendar)
        .service(time_options)
        .service(meeting_room)
        .service(refresh);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server over the shared booking state.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the listener is bound.
/// - `http_state`: booking service handle shared by every worker.
/// - `config`: validated [`ServerConfig`] carrying the bind address.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    config: &ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .bind(config.bind_addr())?
    .run();

    health_state.mark_ready();
    Ok(server)
}
