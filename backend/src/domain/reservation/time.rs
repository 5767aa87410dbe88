//! Time-of-day values and half-open booking intervals.
//!
//! Times are wall-clock `HH:MM` on the reservation's date. There is no
//! timezone and no interval crosses midnight.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Booking granularity in minutes.
pub const SLOT_GRANULARITY_MINUTES: u16 = 15;
/// First start time offered by the booking form.
pub const BOOKING_DAY_START: TimeOfDay = TimeOfDay::from_minutes_unchecked(9 * 60);
/// Last time offered by the booking form.
pub const BOOKING_DAY_END: TimeOfDay = TimeOfDay::from_minutes_unchecked(18 * 60);

const MINUTES_PER_DAY: u16 = 24 * 60;

/// Errors raised when parsing `HH:MM` values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeOfDayError {
    Malformed { value: String },
    OutOfRange { value: String },
    OffGranularity { value: String },
}

impl fmt::Display for TimeOfDayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed { value } => write!(f, "time {value:?} must be formatted as HH:MM"),
            Self::OutOfRange { value } => write!(f, "time {value:?} is not a valid time of day"),
            Self::OffGranularity { value } => write!(
                f,
                "time {value:?} must fall on a {SLOT_GRANULARITY_MINUTES}-minute boundary"
            ),
        }
    }
}

impl std::error::Error for TimeOfDayError {}

/// Minute-of-day.
///
/// Values built by [`TimeOfDay::new`] and [`TimeOfDay::parse`] sit on a
/// quarter-hour boundary. [`TimeOfDay::parse_stored`] accepts any minute so
/// records written by older clients still load.
///
/// Ordering matches the lexicographic ordering of the zero-padded `HH:MM`
/// form, so comparisons agree with comparing the strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    const fn from_minutes_unchecked(minutes: u16) -> Self {
        Self(minutes)
    }

    /// Build from hour and minute components.
    pub fn new(hour: u8, minute: u8) -> Result<Self, TimeOfDayError> {
        let rendered = format!("{hour:02}:{minute:02}");
        if hour >= 24 || minute >= 60 {
            return Err(TimeOfDayError::OutOfRange { value: rendered });
        }
        if u16::from(minute) % SLOT_GRANULARITY_MINUTES != 0 {
            return Err(TimeOfDayError::OffGranularity { value: rendered });
        }
        Ok(Self(u16::from(hour) * 60 + u16::from(minute)))
    }

    fn parse_components(value: &str) -> Result<(u8, u8), TimeOfDayError> {
        let malformed = || TimeOfDayError::Malformed {
            value: value.to_owned(),
        };
        let bytes = value.as_bytes();
        if bytes.len() != 5 || bytes.get(2) != Some(&b':') {
            return Err(malformed());
        }
        let (hours, minutes) = (&value[..2], &value[3..]);
        if !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let hour: u8 = hours.parse().map_err(|_| malformed())?;
        let minute: u8 = minutes.parse().map_err(|_| malformed())?;
        if hour >= 24 || minute >= 60 {
            return Err(TimeOfDayError::OutOfRange {
                value: value.to_owned(),
            });
        }
        Ok((hour, minute))
    }

    /// Parse a zero-padded `HH:MM` value.
    ///
    /// # Examples
    /// ```
    /// use meeting_room::domain::TimeOfDay;
    ///
    /// let t = TimeOfDay::parse("09:45").expect("valid");
    /// assert_eq!(t.to_string(), "09:45");
    /// assert!(TimeOfDay::parse("9:45").is_err());
    /// ```
    pub fn parse(value: &str) -> Result<Self, TimeOfDayError> {
        let (hour, minute) = Self::parse_components(value)?;
        if u16::from(minute) % SLOT_GRANULARITY_MINUTES != 0 {
            return Err(TimeOfDayError::OffGranularity {
                value: value.to_owned(),
            });
        }
        Ok(Self(u16::from(hour) * 60 + u16::from(minute)))
    }

    /// Parse a stored `HH:MM` value without the quarter-hour rule.
    ///
    /// # Examples
    /// ```
    /// use meeting_room::domain::TimeOfDay;
    ///
    /// assert!(TimeOfDay::parse("09:10").is_err());
    /// assert_eq!(TimeOfDay::parse_stored("09:10").expect("stored").to_string(), "09:10");
    /// ```
    pub fn parse_stored(value: &str) -> Result<Self, TimeOfDayError> {
        let (hour, minute) = Self::parse_components(value)?;
        Ok(Self(u16::from(hour) * 60 + u16::from(minute)))
    }

    pub fn hour(self) -> u8 {
        // Always < 24 by construction.
        u8::try_from(self.0 / 60).unwrap_or(u8::MAX)
    }

    pub fn minute(self) -> u8 {
        u8::try_from(self.0 % 60).unwrap_or(u8::MAX)
    }

    /// Minutes elapsed since midnight.
    pub fn minutes_since_midnight(self) -> u16 {
        self.0
    }

    /// The next quarter hour, or `None` past the end of the day.
    pub fn next_slot(self) -> Option<Self> {
        let next = self.0 + SLOT_GRANULARITY_MINUTES;
        (next < MINUTES_PER_DAY).then_some(Self(next))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeOfDayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = TimeOfDayError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

/// Start and end of a booking on one calendar date, read as `[start, end)`.
///
/// Construction does not require `start < end`; the reservation validator
/// reports that case with its own rejection reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeSlot {
    start: TimeOfDay,
    end: TimeOfDay,
}

impl TimeSlot {
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self { start, end }
    }

    /// Parse both bounds from `HH:MM` strings.
    pub fn parse(start: &str, end: &str) -> Result<Self, TimeOfDayError> {
        Ok(Self::new(TimeOfDay::parse(start)?, TimeOfDay::parse(end)?))
    }

    /// Parse bounds read back from the records store; see
    /// [`TimeOfDay::parse_stored`].
    pub fn parse_stored(start: &str, end: &str) -> Result<Self, TimeOfDayError> {
        Ok(Self::new(
            TimeOfDay::parse_stored(start)?,
            TimeOfDay::parse_stored(end)?,
        ))
    }

    pub fn start(&self) -> TimeOfDay {
        self.start
    }

    pub fn end(&self) -> TimeOfDay {
        self.end
    }

    /// Whether `start` is strictly before `end`.
    pub fn is_well_ordered(&self) -> bool {
        self.start < self.end
    }

    /// Length in minutes; zero for inverted slots.
    pub fn duration_minutes(&self) -> u16 {
        self.end.0.saturating_sub(self.start.0)
    }

    /// Half-open intersection test; back-to-back slots do not overlap.
    ///
    /// # Examples
    /// ```
    /// use meeting_room::domain::TimeSlot;
    ///
    /// let morning = TimeSlot::parse("09:00", "10:00").expect("valid");
    /// let next = TimeSlot::parse("10:00", "11:00").expect("valid");
    /// assert!(!morning.overlaps(&next));
    /// ```
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        overlaps(self.start, self.end, other.start, other.end)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Whether `[new_start, new_end)` intersects `[existing_start, existing_end)`.
pub fn overlaps(
    new_start: TimeOfDay,
    new_end: TimeOfDay,
    existing_start: TimeOfDay,
    existing_end: TimeOfDay,
) -> bool {
    new_start < existing_end && new_end > existing_start
}

/// Times offered by the booking form: 09:00 through 18:00 in quarter hours.
pub fn booking_time_options() -> Vec<TimeOfDay> {
    std::iter::successors(Some(BOOKING_DAY_START), |t| t.next_slot())
        .take_while(|t| *t <= BOOKING_DAY_END)
        .collect()
}
