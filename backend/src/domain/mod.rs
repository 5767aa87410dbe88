//! Domain primitives, booking rules and the booking service.
//!
//! Purpose: keep every rule about users, reservations and the calendar in
//! one place with no I/O. Adapters reach the records store only through the
//! traits in [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and its stable identifier.
//! - User, Reservation, MeetingRoom: entities mirrored from the store.
//! - TimeOfDay, TimeSlot, validate: the interval model and booking rules.
//! - project, month_grid, advance: calendar projection.
//! - BookingService: session state and use-cases.

mod record_id;

pub mod booking_service;
pub mod calendar;
pub mod error;
pub mod meeting_room;
pub mod ports;
pub mod reservation;
pub mod trace_id;
pub mod user;

pub use self::booking_service::{
    BookingOptions, BookingService, BookingStores, CalendarDay, CalendarPage, ReservationView,
    UNKNOWN_USER_NAME, UserDeletionPolicy,
};
pub use self::calendar::{
    CALENDAR_YEARS, DayBucket, Direction, Granularity, UnknownVariant, WeekStart, advance,
    is_calendar_date, month_bounds, month_grid, project, project_with, week_bounds,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::meeting_room::{MeetingRoom, MeetingRoomId};
pub use self::record_id::RecordIdValidationError;
pub use self::reservation::{
    BOOKING_DAY_END, BOOKING_DAY_START, PURPOSE_MAX, Rejection, Reservation, ReservationDraft,
    ReservationDto, ReservationId, ReservationValidationError, SLOT_GRANULARITY_MINUTES,
    TimeOfDay, TimeOfDayError, TimeSlot, booking_time_options, find_conflict, overlaps, validate,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    EMAIL_MAX, EmailAddress, NewUser, USER_NAME_MAX, User, UserId, UserName, UserPatch,
    UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use meeting_room::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("no such reservation"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
