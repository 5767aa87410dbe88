//! Calendar projection of the reservation list.
//!
//! Pure grouping: no validation happens here and the same inputs always
//! produce the same buckets. Each reservation whose date lies inside the
//! projected range lands in exactly one bucket, in input order.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Reservation;

/// Span of one calendar page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Week,
    Month,
}

/// Paging direction for [`advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
}

/// First column of a week row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

/// Raised when parsing enum values from query strings or configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

impl UnknownVariant {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} {:?}", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

fn parse_variant<T: Copy>(
    kind: &'static str,
    raw: &str,
    table: &[(&str, T)],
) -> Result<T, UnknownVariant> {
    let wanted = raw.trim();
    table
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(wanted))
        .map(|(_, value)| *value)
        .ok_or_else(|| UnknownVariant::new(kind, raw))
}

impl FromStr for Granularity {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant("view", s, &[("week", Self::Week), ("month", Self::Month)])
    }
}

impl FromStr for Direction {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant(
            "direction",
            s,
            &[("forward", Self::Forward), ("backward", Self::Backward)],
        )
    }
}

impl FromStr for WeekStart {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant(
            "week start",
            s,
            &[("sunday", Self::Sunday), ("monday", Self::Monday)],
        )
    }
}

impl WeekStart {
    fn weekday(self) -> Weekday {
        match self {
            Self::Sunday => Weekday::Sun,
            Self::Monday => Weekday::Mon,
        }
    }
}

/// One day of a calendar page and the reservations booked on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayBucket<'a> {
    pub date: NaiveDate,
    pub is_in_current_period: bool,
    pub reservations: Vec<&'a Reservation>,
}

/// Years the calendar pages and navigation work with.
///
/// Four-digit years only, matching the `YYYY-MM-DD` form the API accepts.
pub const CALENDAR_YEARS: RangeInclusive<i32> = 1..=9999;

/// Whether `date` falls inside [`CALENDAR_YEARS`].
pub fn is_calendar_date(date: NaiveDate) -> bool {
    CALENDAR_YEARS.contains(&date.year())
}

fn calendar_limit(direction: Direction) -> NaiveDate {
    let limit = match direction {
        Direction::Forward => NaiveDate::from_ymd_opt(*CALENDAR_YEARS.end(), 12, 31),
        Direction::Backward => NaiveDate::from_ymd_opt(*CALENDAR_YEARS.start(), 1, 1),
    };
    limit.unwrap_or(match direction {
        Direction::Forward => NaiveDate::MAX,
        Direction::Backward => NaiveDate::MIN,
    })
}

/// First and last day (inclusive) of the week containing `date`.
///
/// Weeks cut off by the limits of [`NaiveDate`] end at those limits.
pub fn week_bounds(date: NaiveDate, week_start: WeekStart) -> (NaiveDate, NaiveDate) {
    let week = date.week(week_start.weekday());
    (
        week.checked_first_day().unwrap_or(NaiveDate::MIN),
        week.checked_last_day().unwrap_or(NaiveDate::MAX),
    )
}

/// First and last day (inclusive) of the month containing `date`.
pub fn month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = date.with_day(1).unwrap_or(date);
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX);
    (first, last)
}

/// Sunday-first projection; see [`project_with`].
pub fn project(
    reference: NaiveDate,
    granularity: Granularity,
    reservations: &[Reservation],
) -> Vec<DayBucket<'_>> {
    project_with(reference, granularity, WeekStart::default(), reservations)
}

/// Bucket `reservations` into the week or month containing `reference`.
///
/// Week pages hold seven days. Month pages run from the 1st to the last day
/// of the month with no padding; use [`month_grid`] for a padded layout.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use meeting_room::domain::{Granularity, project};
///
/// let reference = NaiveDate::from_ymd_opt(2024, 6, 12).expect("date");
/// let week = project(reference, Granularity::Week, &[]);
/// assert_eq!(week.len(), 7);
/// assert_eq!(week[0].date, NaiveDate::from_ymd_opt(2024, 6, 9).expect("date"));
/// ```
pub fn project_with(
    reference: NaiveDate,
    granularity: Granularity,
    week_start: WeekStart,
    reservations: &[Reservation],
) -> Vec<DayBucket<'_>> {
    let (first, last) = match granularity {
        Granularity::Week => week_bounds(reference, week_start),
        Granularity::Month => month_bounds(reference),
    };
    bucket_range(first, last, reservations, |_| true)
}

/// Month page padded with leading and trailing days to whole weeks.
///
/// Padding days carry `is_in_current_period == false` but still collect
/// their reservations, so a grid shows bookings in the greyed cells too.
pub fn month_grid(
    reference: NaiveDate,
    week_start: WeekStart,
    reservations: &[Reservation],
) -> Vec<DayBucket<'_>> {
    let (month_first, month_last) = month_bounds(reference);
    let (first, _) = week_bounds(month_first, week_start);
    let (_, last) = week_bounds(month_last, week_start);
    bucket_range(first, last, reservations, |date| {
        date.year() == reference.year() && date.month() == reference.month()
    })
}

fn bucket_range<'a>(
    first: NaiveDate,
    last: NaiveDate,
    reservations: &'a [Reservation],
    in_period: impl Fn(NaiveDate) -> bool,
) -> Vec<DayBucket<'a>> {
    let mut buckets: Vec<DayBucket<'a>> = std::iter::successors(Some(first), |date| {
        date.succ_opt().filter(|next| *next <= last)
    })
    .map(|date| DayBucket {
        date,
        is_in_current_period: in_period(date),
        reservations: Vec::new(),
    })
    .collect();

    for reservation in reservations {
        let offset = reservation.date().signed_duration_since(first).num_days();
        let slot = usize::try_from(offset)
            .ok()
            .and_then(|index| buckets.get_mut(index));
        if let Some(bucket) = slot {
            bucket.reservations.push(reservation);
        }
    }
    buckets
}

/// Step `reference` one week or one calendar month.
///
/// Month steps clamp to the last day of the target month (31 January moves
/// to the end of February). Results stay inside [`CALENDAR_YEARS`], stopping
/// at 31 December 9999 going forward and 1 January 0001 going back.
pub fn advance(reference: NaiveDate, granularity: Granularity, direction: Direction) -> NaiveDate {
    let stepped = match (granularity, direction) {
        (Granularity::Week, Direction::Forward) => reference.checked_add_days(Days::new(7)),
        (Granularity::Week, Direction::Backward) => reference.checked_sub_days(Days::new(7)),
        (Granularity::Month, Direction::Forward) => reference.checked_add_months(Months::new(1)),
        (Granularity::Month, Direction::Backward) => reference.checked_sub_months(Months::new(1)),
    };
    let earliest = calendar_limit(Direction::Backward);
    let latest = calendar_limit(Direction::Forward);
    stepped.map_or(calendar_limit(direction), |date| date.clamp(earliest, latest))
}
