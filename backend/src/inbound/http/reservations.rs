//! Reservation API handlers.
//!
//! ```text
//! GET    /api/v1/reservations
//! POST   /api/v1/reservations           {"userId":"u1","date":"2024-06-10","startTime":"09:00","endTime":"10:00"}
//! PUT    /api/v1/reservations/{id}
//! DELETE /api/v1/reservations/{id}
//! POST   /api/v1/reservations/validate?excludeId=r1
//! ```
//!
//! Booking rules run in the service against the session snapshot; rejected
//! candidates never reach the records store.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    Error, ReservationDraft, ReservationDto, ReservationId, ReservationView, TimeSlot, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    DATE, END_TIME, ID, START_TIME, USER_ID, map_reservation_validation_error, parse_date,
    parse_id, parse_time,
};

/// Booking form payload used for creation, edits and dry runs.
///
/// A missing or blank `userId` means no user was selected and is refused by
/// the booking rules rather than by request parsing.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "u1")]
    pub user_id: Option<String>,
    #[schema(example = "2024-06-10")]
    pub date: String,
    #[schema(example = "09:00")]
    pub start_time: String,
    #[schema(example = "10:00")]
    pub end_time: String,
    #[serde(default)]
    #[schema(example = "Sprint planning")]
    pub purpose: String,
}

impl TryFrom<ReservationRequest> for ReservationDraft {
    type Error = Error;

    fn try_from(value: ReservationRequest) -> Result<Self, Self::Error> {
        let ReservationRequest {
            user_id,
            date,
            start_time,
            end_time,
            purpose,
        } = value;
        let user_id = user_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| parse_id::<UserId>(id, USER_ID))
            .transpose()?;
        let date = parse_date(&date, DATE)?;
        let slot = TimeSlot::new(
            parse_time(&start_time, START_TIME)?,
            parse_time(&end_time, END_TIME)?,
        );
        ReservationDraft::new(user_id, date, slot, purpose)
            .map_err(map_reservation_validation_error)
    }
}

/// A reservation joined with the display name of its user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReservationViewResponse {
    #[serde(flatten)]
    pub reservation: ReservationDto,
    #[schema(example = "Ada Lovelace")]
    pub user_name: String,
}

impl From<ReservationView> for ReservationViewResponse {
    fn from(value: ReservationView) -> Self {
        Self {
            reservation: value.reservation.into(),
            user_name: value.user_name,
        }
    }
}

/// Query string for dry-run validation.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ValidateQuery {
    /// Reservation being edited; its own slot is ignored.
    pub exclude_id: Option<String>,
}

/// Outcome of a dry run that passed every booking rule.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    pub accepted: bool,
}

/// List reservations sorted by date then start time.
#[utoipa::path(
    get,
    path = "/api/v1/reservations",
    responses(
        (status = 200, description = "Reservations", body = [ReservationViewResponse]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["reservations"],
    operation_id = "listReservations"
)]
#[get("/reservations")]
pub async fn list_reservations(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<ReservationViewResponse>>> {
    let views = state.booking.reservation_views().await;
    Ok(web::Json(views.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations",
    request_body = ReservationRequest,
    responses(
        (status = 201, description = "Reservation created", body = ReservationDto),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Time slot already booked", body = Error),
        (status = 503, description = "Records store unavailable", body = Error)
    ),
    tags = ["reservations"],
    operation_id = "createReservation"
)]
#[post("/reservations")]
pub async fn create_reservation(
    state: web::Data<HttpState>,
    payload: web::Json<ReservationRequest>,
) -> ApiResult<HttpResponse> {
    let draft = ReservationDraft::try_from(payload.into_inner())?;
    let stored = state.booking.create_reservation(draft).await?;
    Ok(HttpResponse::Created().json(ReservationDto::from(stored)))
}

/// Run the booking rules without saving.
///
/// Pass `excludeId` when checking an edit so the reservation does not
/// collide with itself.
#[utoipa::path(
    post,
    path = "/api/v1/reservations/validate",
    params(ValidateQuery),
    request_body = ReservationRequest,
    responses(
        (status = 200, description = "Candidate accepted", body = ValidationOutcome),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Unknown excluded reservation", body = Error),
        (status = 409, description = "Time slot already booked", body = Error)
    ),
    tags = ["reservations"],
    operation_id = "validateReservation"
)]
#[post("/reservations/validate")]
pub async fn validate_reservation(
    state: web::Data<HttpState>,
    query: web::Query<ValidateQuery>,
    payload: web::Json<ReservationRequest>,
) -> ApiResult<web::Json<ValidationOutcome>> {
    let exclude = query
        .into_inner()
        .exclude_id
        .map(|id| parse_id::<ReservationId>(&id, ID))
        .transpose()?;
    let draft = ReservationDraft::try_from(payload.into_inner())?;
    state
        .booking
        .check_reservation(&draft, exclude.as_ref())
        .await?;
    Ok(web::Json(ValidationOutcome { accepted: true }))
}

#[utoipa::path(
    put,
    path = "/api/v1/reservations/{id}",
    params(("id" = String, Path, description = "Reservation identifier")),
    request_body = ReservationRequest,
    responses(
        (status = 200, description = "Reservation updated", body = ReservationDto),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Unknown reservation", body = Error),
        (status = 409, description = "Time slot already booked", body = Error),
        (status = 503, description = "Records store unavailable", body = Error)
    ),
    tags = ["reservations"],
    operation_id = "updateReservation"
)]
#[put("/reservations/{id}")]
pub async fn update_reservation(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<ReservationRequest>,
) -> ApiResult<web::Json<ReservationDto>> {
    let id: ReservationId = parse_id(&path.into_inner(), ID)?;
    let draft = ReservationDraft::try_from(payload.into_inner())?;
    let stored = state.booking.update_reservation(&id, draft).await?;
    Ok(web::Json(stored.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/reservations/{id}",
    params(("id" = String, Path, description = "Reservation identifier")),
    responses(
        (status = 204, description = "Reservation deleted"),
        (status = 404, description = "Unknown reservation", body = Error),
        (status = 503, description = "Records store unavailable", body = Error)
    ),
    tags = ["reservations"],
    operation_id = "deleteReservation"
)]
#[delete("/reservations/{id}")]
pub async fn delete_reservation(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id: ReservationId = parse_id(&path.into_inner(), ID)?;
    state.booking.delete_reservation(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "reservations_tests.rs"]
mod tests;
