//! Booking rules applied before a reservation is created or edited.
//!
//! Checks run in a fixed order and stop at the first failure:
//! user selected, then `start < end`, then no overlap with another
//! reservation on the same date. Editing passes the reservation's own id so
//! an unchanged slot does not collide with itself.

use std::fmt;

use serde_json::json;

use super::{Reservation, ReservationDraft, ReservationId};
use crate::domain::Error;

/// Why a candidate reservation was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    NoUserSelected,
    EndNotAfterStart,
    SlotAlreadyBooked { conflicting: ReservationId },
}

impl Rejection {
    /// Stable machine-readable code for clients.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoUserSelected => "no_user_selected",
            Self::EndNotAfterStart => "end_not_after_start",
            Self::SlotAlreadyBooked { .. } => "slot_already_booked",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoUserSelected => write!(f, "no user selected"),
            Self::EndNotAfterStart => write!(f, "end time must be after start time"),
            Self::SlotAlreadyBooked { .. } => write!(f, "time slot already booked"),
        }
    }
}

impl std::error::Error for Rejection {}

impl From<Rejection> for Error {
    fn from(value: Rejection) -> Self {
        let message = value.to_string();
        match &value {
            Rejection::NoUserSelected => Error::invalid_request(message)
                .with_details(json!({ "field": "userId", "code": value.code() })),
            Rejection::EndNotAfterStart => Error::invalid_request(message)
                .with_details(json!({ "field": "endTime", "code": value.code() })),
            Rejection::SlotAlreadyBooked { conflicting } => Error::conflict(message)
                .with_details(json!({ "code": value.code(), "conflictingId": conflicting })),
        }
    }
}

/// First reservation on `candidate`'s date whose slot overlaps it, skipping
/// `exclude`.
pub fn find_conflict<'a>(
    candidate: &ReservationDraft,
    existing: &'a [Reservation],
    exclude: Option<&ReservationId>,
) -> Option<&'a Reservation> {
    existing
        .iter()
        .filter(|reservation| Some(reservation.id()) != exclude)
        .find(|reservation| reservation.collides_with(candidate.date, &candidate.slot))
}

/// Decide whether `candidate` may be booked alongside `existing`.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use meeting_room::domain::{Rejection, ReservationDraft, TimeSlot, UserId, validate};
///
/// let date = NaiveDate::from_ymd_opt(2024, 6, 10).expect("date");
/// let slot = TimeSlot::parse("10:00", "09:00").expect("times");
/// let user = UserId::new("u1").expect("id");
/// let draft = ReservationDraft::new(Some(user), date, slot, "").expect("draft");
/// assert_eq!(validate(&draft, &[], None), Err(Rejection::EndNotAfterStart));
/// ```
pub fn validate(
    candidate: &ReservationDraft,
    existing: &[Reservation],
    exclude: Option<&ReservationId>,
) -> Result<(), Rejection> {
    if candidate.user_id.is_none() {
        return Err(Rejection::NoUserSelected);
    }
    if !candidate.slot.is_well_ordered() {
        return Err(Rejection::EndNotAfterStart);
    }
    if let Some(conflict) = find_conflict(candidate, existing, exclude) {
        return Err(Rejection::SlotAlreadyBooked {
            conflicting: conflict.id().clone(),
        });
    }
    Ok(())
}
