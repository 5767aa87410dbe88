//! HTTP inbound adapter exposing the booking API.
//!
//! Every handler is mounted under `/api/v1` except the health probes.

pub mod calendar;
pub mod error;
pub mod health;
pub mod reservations;
pub mod room;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;
