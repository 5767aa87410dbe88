//! HTTP adapter mapping for domain errors.
//!
//! Booking refusals (`409` for a taken slot, `400` for the other rules and
//! malformed fields) carry a machine-readable `details.code` that is logged
//! alongside the status. A `503` means the records store could not be
//! reached; the response suggests when to resubmit with `Retry-After`.

use actix_web::http::header::RETRY_AFTER;
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::{error, info};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Seconds a client should wait before resubmitting after a `503`.
pub const STORE_RETRY_AFTER_SECS: u32 = 5;

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// The rule or field code attached to a refusal, such as
/// `slot_already_booked` or `invalid_time`.
fn refusal_code(error: &Error) -> Option<&str> {
    error.details()?.get("code")?.as_str()
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        let mut redacted = Error::internal("Internal server error");
        if let Some(id) = error.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted
    } else {
        error.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        match self.code() {
            ErrorCode::InternalError => {
                error!(message = self.message(), trace_id = ?self.trace_id(), "internal error");
            }
            ErrorCode::InvalidRequest | ErrorCode::Conflict => {
                if let Some(rule) = refusal_code(self) {
                    info!(status = status.as_u16(), rule, "booking request refused");
                }
            }
            ErrorCode::NotFound | ErrorCode::ServiceUnavailable => {}
        }

        let mut builder = HttpResponse::build(status);
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        if matches!(self.code(), ErrorCode::ServiceUnavailable) {
            builder.insert_header((RETRY_AFTER, STORE_RETRY_AFTER_SECS.to_string()));
        }

        builder.json(redact_if_internal(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

#[cfg(test)]
mod tests;
