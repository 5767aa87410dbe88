//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every booking endpoint, the health probes and the
//! schemas they exchange. The document is served by Swagger UI in debug
//! builds and exported via `cargo run --bin openapi-dump` for tooling.

use utoipa::OpenApi;

use crate::domain::{
    Direction, Error, ErrorCode, Granularity, MeetingRoom, ReservationDto, User,
};
use crate::inbound::http::calendar::{AdvanceResponse, CalendarDayResponse, CalendarResponse};
use crate::inbound::http::reservations::{
    ReservationRequest, ReservationViewResponse, ValidationOutcome,
};
use crate::inbound::http::room::TimeOptionsResponse;
use crate::inbound::http::users::{CreateUserRequest, UpdateUserRequest};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Meeting room reservation API",
        description = "Roster management, reservations with booking rules, and calendar views for a single meeting room."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::reservations::list_reservations,
        crate::inbound::http::reservations::create_reservation,
        crate::inbound::http::reservations::validate_reservation,
        crate::inbound::http::reservations::update_reservation,
        crate::inbound::http::reservations::delete_reservation,
        crate::inbound::http::calendar::calendar,
        crate::inbound::http::calendar::advance,
        crate::inbound::http::room::meeting_room,
        crate::inbound::http::room::time_options,
        crate::inbound::http::room::refresh,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        User,
        CreateUserRequest,
        UpdateUserRequest,
        ReservationDto,
        ReservationRequest,
        ReservationViewResponse,
        ValidationOutcome,
        Granularity,
        Direction,
        CalendarResponse,
        CalendarDayResponse,
        AdvanceResponse,
        MeetingRoom,
        TimeOptionsResponse,
    )),
    tags(
        (name = "users", description = "Roster of people who can book the room"),
        (name = "reservations", description = "Bookings and the rules they must pass"),
        (name = "calendar", description = "Week and month projections"),
        (name = "room", description = "Room details, form options and snapshot refresh"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
