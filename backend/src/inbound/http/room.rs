//! Room details, booking form options and snapshot refresh.
//!
//! ```text
//! GET  /api/v1/meeting-room
//! GET  /api/v1/time-options
//! POST /api/v1/refresh
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    BOOKING_DAY_END, BOOKING_DAY_START, Error, MeetingRoom, SLOT_GRANULARITY_MINUTES,
    booking_time_options,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Times offered by the booking form.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimeOptionsResponse {
    #[schema(example = 15)]
    pub granularity_minutes: u16,
    #[schema(example = "09:00")]
    pub day_start: String,
    #[schema(example = "18:00")]
    pub day_end: String,
    #[schema(example = json!(["09:00", "09:15", "09:30"]))]
    pub options: Vec<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/meeting-room",
    responses(
        (status = 200, description = "Meeting room", body = MeetingRoom),
        (status = 404, description = "No room record", body = Error),
        (status = 503, description = "Records store unavailable", body = Error)
    ),
    tags = ["room"],
    operation_id = "getMeetingRoom"
)]
#[get("/meeting-room")]
pub async fn meeting_room(state: web::Data<HttpState>) -> ApiResult<web::Json<MeetingRoom>> {
    Ok(web::Json(state.booking.meeting_room().await?))
}

/// Times the booking form offers.
///
/// The window is a form hint only. The booking rules accept any quarter hour
/// of the day, so reservations outside 09:00-18:00 are still valid.
#[utoipa::path(
    get,
    path = "/api/v1/time-options",
    description = "Quarter-hour times the booking form offers. A hint for the form only: the booking rules accept any quarter hour of the day.",
    responses((status = 200, description = "Booking form times", body = TimeOptionsResponse)),
    tags = ["room"],
    operation_id = "getTimeOptions"
)]
#[get("/time-options")]
pub async fn time_options() -> web::Json<TimeOptionsResponse> {
    web::Json(TimeOptionsResponse {
        granularity_minutes: SLOT_GRANULARITY_MINUTES,
        day_start: BOOKING_DAY_START.to_string(),
        day_end: BOOKING_DAY_END.to_string(),
        options: booking_time_options()
            .into_iter()
            .map(|t| t.to_string())
            .collect(),
    })
}

/// Re-read users and reservations from the records store.
///
/// On failure the previous snapshot is kept and the error is returned.
#[utoipa::path(
    post,
    path = "/api/v1/refresh",
    responses(
        (status = 204, description = "Snapshot reloaded"),
        (status = 503, description = "Records store unavailable", body = Error)
    ),
    tags = ["room"],
    operation_id = "refreshSnapshot"
)]
#[post("/refresh")]
pub async fn refresh(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    state.booking.refresh().await?;
    Ok(HttpResponse::NoContent().finish())
}
