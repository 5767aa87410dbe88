//! Service entry-point: loads settings, builds the booking service and
//! serves the REST API.

mod server;

use std::sync::Arc;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use meeting_room::inbound::http::health::HealthState;
use meeting_room::inbound::http::state::HttpState;

use server::{AppSettings, ServerConfig, build_booking_service, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let config = ServerConfig::from_settings(&settings)
        .map_err(|e| std::io::Error::other(format!("invalid settings: {e}")))?;

    let booking = build_booking_service(&config)?;
    // Readiness stays false until a load succeeds, here or via POST /refresh.
    if let Err(e) = booking.load().await {
        warn!(code = ?e.code(), message = e.message(), "initial load failed");
    }

    let health_state = web::Data::new(HealthState::new());
    let http_state = web::Data::new(HttpState::new(Arc::clone(&booking)));
    info!(bind_addr = %config.bind_addr(), "starting server");
    let server = create_server(health_state.clone(), http_state, &config)?;
    let result = server.await;
    health_state.mark_unhealthy();
    result
}
