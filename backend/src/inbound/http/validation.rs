//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request bodies arrive as loose strings; these helpers turn them into
//! domain values and report failures as `invalid_request` errors naming the
//! offending field.

use chrono::NaiveDate;
use serde_json::json;

use crate::domain::{
    Error, RecordIdValidationError, ReservationValidationError, TimeOfDay, TimeOfDayError,
    UserValidationError, is_calendar_date,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidId,
    InvalidDate,
    InvalidTime,
    InvalidValue,
    TooLong,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidId => "invalid_id",
            ErrorCode::InvalidDate => "invalid_date",
            ErrorCode::InvalidTime => "invalid_time",
            ErrorCode::InvalidValue => "invalid_value",
            ErrorCode::TooLong => "too_long",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

pub(crate) const USER_ID: FieldName = FieldName::new("userId");
pub(crate) const DATE: FieldName = FieldName::new("date");
pub(crate) const START_TIME: FieldName = FieldName::new("startTime");
pub(crate) const END_TIME: FieldName = FieldName::new("endTime");
pub(crate) const PURPOSE: FieldName = FieldName::new("purpose");
pub(crate) const NAME: FieldName = FieldName::new("name");
pub(crate) const EMAIL: FieldName = FieldName::new("email");
pub(crate) const ID: FieldName = FieldName::new("id");

pub(crate) fn field_error(field: FieldName, code: ErrorCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

fn field_value_error(
    field: FieldName,
    code: ErrorCode,
    value: &str,
    message: impl Into<String>,
) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    field_error(field, ErrorCode::MissingField, format!("missing required field: {name}"))
}

pub(crate) fn invalid_value_error(field: FieldName, value: &str, expected: &str) -> Error {
    let name = field.as_str();
    field_value_error(
        field,
        ErrorCode::InvalidValue,
        value,
        format!("{name} must be one of: {expected}"),
    )
}

pub(crate) fn parse_date(value: &str, field: FieldName) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .ok()
        .filter(|date| is_calendar_date(*date))
        .ok_or_else(|| {
            let name = field.as_str();
            field_value_error(
                field,
                ErrorCode::InvalidDate,
                value,
                format!("{name} must be a YYYY-MM-DD date between years 0001 and 9999"),
            )
        })
}

pub(crate) fn parse_time(value: &str, field: FieldName) -> Result<TimeOfDay, Error> {
    TimeOfDay::parse(value.trim()).map_err(|err| time_error(field, value, &err))
}

fn time_error(field: FieldName, value: &str, err: &TimeOfDayError) -> Error {
    field_value_error(field, ErrorCode::InvalidTime, value, err.to_string())
}

pub(crate) fn parse_id<T>(value: &str, field: FieldName) -> Result<T, Error>
where
    T: std::str::FromStr<Err = RecordIdValidationError>,
{
    value.parse::<T>().map_err(|err| id_error(field, value, &err))
}

fn id_error(field: FieldName, value: &str, err: &RecordIdValidationError) -> Error {
    let name = field.as_str();
    field_value_error(field, ErrorCode::InvalidId, value, format!("{name}: {err}"))
}

pub(crate) fn map_user_validation_error(err: UserValidationError) -> Error {
    let message = err.to_string();
    match err {
        UserValidationError::InvalidId(_) => field_error(ID, ErrorCode::InvalidId, message),
        UserValidationError::EmptyName => field_error(NAME, ErrorCode::MissingField, message),
        UserValidationError::NameTooLong { .. } => field_error(NAME, ErrorCode::TooLong, message),
        UserValidationError::EmptyEmail => field_error(EMAIL, ErrorCode::MissingField, message),
        UserValidationError::EmailTooLong { .. } => {
            field_error(EMAIL, ErrorCode::TooLong, message)
        }
        UserValidationError::InvalidEmail => field_error(EMAIL, ErrorCode::InvalidValue, message),
        UserValidationError::EmptyPatch => Error::invalid_request(message),
    }
}

pub(crate) fn map_reservation_validation_error(err: ReservationValidationError) -> Error {
    let message = err.to_string();
    match err {
        ReservationValidationError::InvalidId(_) => field_error(ID, ErrorCode::InvalidId, message),
        ReservationValidationError::InvalidUserId(_) => {
            field_error(USER_ID, ErrorCode::InvalidId, message)
        }
        ReservationValidationError::InvalidTime(_) => {
            field_error(START_TIME, ErrorCode::InvalidTime, message)
        }
        ReservationValidationError::PurposeTooLong { .. } => {
            field_error(PURPOSE, ErrorCode::TooLong, message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode as DomainCode, UserId};
    use rstest::rstest;

    fn detail<'a>(error: &'a Error, key: &str) -> Option<&'a str> {
        error.details()?.get(key)?.as_str()
    }

    #[rstest]
    #[case("2024-06-10", true)]
    #[case(" 2024-06-10 ", true)]
    #[case("10/06/2024", false)]
    #[case("2024-02-30", false)]
    #[case("9999-12-31", true)]
    #[case("+262142-12-31", false)]
    #[case("-0001-06-01", false)]
    fn parses_iso_dates(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(parse_date(raw, DATE).is_ok(), ok);
    }

    #[rstest]
    fn time_errors_name_the_field_and_value() {
        let error = parse_time("09:07", START_TIME).expect_err("off granularity");
        assert_eq!(error.code(), DomainCode::InvalidRequest);
        assert_eq!(detail(&error, "field"), Some("startTime"));
        assert_eq!(detail(&error, "value"), Some("09:07"));
        assert_eq!(detail(&error, "code"), Some("invalid_time"));
    }

    #[rstest]
    fn ids_are_parsed_into_domain_types() {
        let id: UserId = parse_id("x7k2", USER_ID).expect("valid id");
        assert_eq!(id.as_str(), "x7k2");
        let error = parse_id::<UserId>(" x7k2", USER_ID).expect_err("padded id");
        assert_eq!(detail(&error, "code"), Some("invalid_id"));
    }

    #[rstest]
    fn missing_fields_are_reported() {
        let error = missing_field_error(USER_ID);
        assert_eq!(error.message(), "missing required field: userId");
        assert_eq!(detail(&error, "code"), Some("missing_field"));
    }

    #[rstest]
    #[case(UserValidationError::EmptyName, "name")]
    #[case(UserValidationError::InvalidEmail, "email")]
    fn user_errors_point_at_fields(#[case] err: UserValidationError, #[case] field: &str) {
        let error = map_user_validation_error(err);
        assert_eq!(detail(&error, "field"), Some(field));
    }
}
