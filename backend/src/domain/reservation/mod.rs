//! Meeting-room reservations.
//!
//! A reservation pins a half-open [`TimeSlot`] to one calendar date. The
//! booking rules live in [`validator`]; this module only owns the shapes.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::UserId;
use super::record_id::{RecordIdValidationError, define_record_id};

mod time;
mod validator;

pub use time::{
    BOOKING_DAY_END, BOOKING_DAY_START, SLOT_GRANULARITY_MINUTES, TimeOfDay, TimeOfDayError,
    TimeSlot, booking_time_options, overlaps,
};
pub use validator::{Rejection, find_conflict, validate};

define_record_id! {
    /// Store-assigned reservation identifier.
    ReservationId
}

/// Maximum number of characters in a reservation purpose.
pub const PURPOSE_MAX: usize = 200;

/// Validation errors raised while decoding reservations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReservationValidationError {
    InvalidId(RecordIdValidationError),
    InvalidUserId(RecordIdValidationError),
    InvalidTime(TimeOfDayError),
    PurposeTooLong { max: usize },
}

impl fmt::Display for ReservationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId(err) => write!(f, "reservation {err}"),
            Self::InvalidUserId(err) => write!(f, "user {err}"),
            Self::InvalidTime(err) => err.fmt(f),
            Self::PurposeTooLong { max } => {
                write!(f, "purpose must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for ReservationValidationError {}

impl From<TimeOfDayError> for ReservationValidationError {
    fn from(value: TimeOfDayError) -> Self {
        Self::InvalidTime(value)
    }
}

fn check_purpose(purpose: String) -> Result<String, ReservationValidationError> {
    let purpose = purpose.trim().to_owned();
    if purpose.chars().count() > PURPOSE_MAX {
        return Err(ReservationValidationError::PurposeTooLong { max: PURPOSE_MAX });
    }
    Ok(purpose)
}

/// A persisted booking.
///
/// ## Invariants
/// - Reservations accepted through the booking service satisfy
///   `start < end` and never overlap another reservation on the same date.
/// - Records read back with [`Reservation::from_stored`] are taken as-is:
///   off-grid times and long purposes are kept so the snapshot still loads.
///
/// The wire form (and OpenAPI schema) is [`ReservationDto`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ReservationDto", into = "ReservationDto")]
pub struct Reservation {
    id: ReservationId,
    user_id: UserId,
    date: NaiveDate,
    slot: TimeSlot,
    purpose: String,
}

impl Reservation {
    /// Assemble a reservation from already-validated parts.
    pub fn new(
        id: ReservationId,
        user_id: UserId,
        date: NaiveDate,
        slot: TimeSlot,
        purpose: impl Into<String>,
    ) -> Result<Self, ReservationValidationError> {
        Ok(Self {
            id,
            user_id,
            date,
            slot,
            purpose: check_purpose(purpose.into())?,
        })
    }

    /// Decode a record read back from the records store.
    ///
    /// Only the identifiers and the `HH:MM` shape are checked. The
    /// quarter-hour grid and the purpose limit apply to new bookings, not to
    /// records other clients already wrote.
    pub fn from_stored(value: ReservationDto) -> Result<Self, ReservationValidationError> {
        let ReservationDto {
            id,
            user_id,
            date,
            start_time,
            end_time,
            purpose,
        } = value;
        Ok(Self {
            id: ReservationId::new(id).map_err(ReservationValidationError::InvalidId)?,
            user_id: UserId::new(user_id).map_err(ReservationValidationError::InvalidUserId)?,
            date,
            slot: TimeSlot::parse_stored(&start_time, &end_time)?,
            purpose,
        })
    }

    pub fn id(&self) -> &ReservationId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn slot(&self) -> TimeSlot {
        self.slot
    }

    pub fn purpose(&self) -> &str {
        self.purpose.as_str()
    }

    /// Whether this reservation shares a date and an overlapping slot with
    /// `date`/`slot`.
    pub fn collides_with(&self, date: NaiveDate, slot: &TimeSlot) -> bool {
        self.date == date && self.slot.overlaps(slot)
    }

    /// The editable fields as a candidate, for re-validation on edit.
    pub fn to_draft(&self) -> ReservationDraft {
        ReservationDraft {
            user_id: Some(self.user_id.clone()),
            date: self.date,
            slot: self.slot,
            purpose: self.purpose.clone(),
        }
    }
}

/// A reservation as submitted from the booking form, before validation.
///
/// `user_id` is optional because the form may be submitted without a user
/// selected; the validator rejects that case first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationDraft {
    pub user_id: Option<UserId>,
    pub date: NaiveDate,
    pub slot: TimeSlot,
    pub purpose: String,
}

impl ReservationDraft {
    /// Build a candidate, trimming and bounding the purpose text.
    pub fn new(
        user_id: Option<UserId>,
        date: NaiveDate,
        slot: TimeSlot,
        purpose: impl Into<String>,
    ) -> Result<Self, ReservationValidationError> {
        Ok(Self {
            user_id,
            date,
            slot,
            purpose: check_purpose(purpose.into())?,
        })
    }

    /// Attach the store identifier.
    ///
    /// Returns `None` when no user is selected; callers validate first.
    pub fn into_reservation(self, id: ReservationId) -> Option<Reservation> {
        let user_id = self.user_id?;
        Some(Reservation {
            id,
            user_id,
            date: self.date,
            slot: self.slot,
            purpose: self.purpose,
        })
    }
}

/// Wire shape shared by the HTTP API and the records store.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReservationDto {
    #[schema(example = "r8f3")]
    pub id: String,
    #[schema(example = "x7k2")]
    pub user_id: String,
    #[schema(value_type = String, format = Date, example = "2024-06-10")]
    pub date: NaiveDate,
    #[schema(example = "09:00")]
    pub start_time: String,
    #[schema(example = "10:00")]
    pub end_time: String,
    #[serde(default)]
    #[schema(example = "Sprint planning")]
    pub purpose: String,
}

impl From<Reservation> for ReservationDto {
    fn from(value: Reservation) -> Self {
        let Reservation {
            id,
            user_id,
            date,
            slot,
            purpose,
        } = value;
        Self {
            id: id.into(),
            user_id: user_id.into(),
            date,
            start_time: slot.start().to_string(),
            end_time: slot.end().to_string(),
            purpose,
        }
    }
}

impl TryFrom<ReservationDto> for Reservation {
    type Error = ReservationValidationError;

    fn try_from(value: ReservationDto) -> Result<Self, Self::Error> {
        Self::from_stored(value)
    }
}
