//! Calendar API handlers.
//!
//! ```text
//! GET /api/v1/calendar?date=2024-06-10&view=month&padded=true
//! GET /api/v1/calendar/advance?date=2024-01-31&view=month&direction=forward
//! ```

use std::str::FromStr;

use actix_web::{get, web};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{CalendarDay, CalendarPage, Direction, Error, Granularity};
use crate::inbound::http::ApiResult;
use crate::inbound::http::reservations::ReservationViewResponse;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    DATE, FieldName, invalid_value_error, missing_field_error, parse_date,
};

const VIEW: FieldName = FieldName::new("view");
const DIRECTION: FieldName = FieldName::new("direction");

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CalendarQuery {
    /// Reference date (`YYYY-MM-DD`); defaults to today (UTC).
    pub date: Option<String>,
    /// `week` (default) or `month`.
    pub view: Option<String>,
    /// Widen month views to whole weeks.
    pub padded: Option<bool>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AdvanceQuery {
    pub date: Option<String>,
    pub view: Option<String>,
    /// `forward` or `backward`.
    pub direction: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDayResponse {
    #[schema(value_type = String, format = Date, example = "2024-06-10")]
    pub date: NaiveDate,
    pub is_in_current_period: bool,
    pub reservations: Vec<ReservationViewResponse>,
}

impl From<CalendarDay> for CalendarDayResponse {
    fn from(value: CalendarDay) -> Self {
        Self {
            date: value.date,
            is_in_current_period: value.is_in_current_period,
            reservations: value.reservations.into_iter().map(Into::into).collect(),
        }
    }
}

/// One projected week or month, days in ascending order.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalendarResponse {
    #[schema(value_type = String, format = Date, example = "2024-06-10")]
    pub reference: NaiveDate,
    pub view: Granularity,
    pub padded: bool,
    pub days: Vec<CalendarDayResponse>,
}

impl From<CalendarPage> for CalendarResponse {
    fn from(value: CalendarPage) -> Self {
        Self {
            reference: value.reference,
            view: value.granularity,
            padded: value.padded,
            days: value.days.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceResponse {
    #[schema(value_type = String, format = Date, example = "2024-02-29")]
    pub date: NaiveDate,
}

fn reference_date(raw: Option<&str>) -> Result<NaiveDate, Error> {
    match raw {
        Some(value) => parse_date(value, DATE),
        None => Ok(Utc::now().date_naive()),
    }
}

fn parse_choice<T: FromStr>(raw: &str, field: FieldName, expected: &str) -> Result<T, Error> {
    raw.parse::<T>()
        .map_err(|_| invalid_value_error(field, raw, expected))
}

fn parse_view(raw: Option<&str>) -> Result<Granularity, Error> {
    raw.map_or(Ok(Granularity::Week), |value| {
        parse_choice(value, VIEW, "week, month")
    })
}

#[utoipa::path(
    get,
    path = "/api/v1/calendar",
    params(CalendarQuery),
    responses(
        (status = 200, description = "Calendar page", body = CalendarResponse),
        (status = 400, description = "Invalid request", body = Error)
    ),
    tags = ["calendar"],
    operation_id = "getCalendar"
)]
#[get("/calendar")]
pub async fn calendar(
    state: web::Data<HttpState>,
    query: web::Query<CalendarQuery>,
) -> ApiResult<web::Json<CalendarResponse>> {
    let reference = reference_date(query.date.as_deref())?;
    let view = parse_view(query.view.as_deref())?;
    let page = state
        .booking
        .calendar(reference, view, query.padded.unwrap_or(false))
        .await;
    Ok(web::Json(page.into()))
}

/// Step the reference date one week or one month.
///
/// Month steps clamp to the last day of the target month.
#[utoipa::path(
    get,
    path = "/api/v1/calendar/advance",
    params(AdvanceQuery),
    responses(
        (status = 200, description = "New reference date", body = AdvanceResponse),
        (status = 400, description = "Invalid request", body = Error)
    ),
    tags = ["calendar"],
    operation_id = "advanceCalendar"
)]
#[get("/calendar/advance")]
pub async fn advance(
    state: web::Data<HttpState>,
    query: web::Query<AdvanceQuery>,
) -> ApiResult<web::Json<AdvanceResponse>> {
    let reference = reference_date(query.date.as_deref())?;
    let view = parse_view(query.view.as_deref())?;
    let direction: Direction = query
        .direction
        .as_deref()
        .ok_or_else(|| missing_field_error(DIRECTION))
        .and_then(|raw| parse_choice(raw, DIRECTION, "forward, backward"))?;
    let date = state.booking.advance(reference, view, direction);
    Ok(web::Json(AdvanceResponse { date }))
}
