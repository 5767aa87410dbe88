//! Failures shared by every records-store port.

use super::define_port_error;

define_port_error! {
    /// Errors raised by records-store adapters.
    pub enum StoreError {
        /// The store could not be reached or the connection dropped.
        Transport { message: String } => "records store request failed: {message}",
        /// The store did not answer within the configured timeout.
        Timeout { message: String } => "records store timed out: {message}",
        /// The addressed record does not exist.
        NotFound { message: String } => "record not found: {message}",
        /// The store refused the request with a client error status.
        Rejected { status: u16, message: String } =>
            "records store rejected the request with status {status}: {message}",
        /// The store answered with a body that does not decode.
        Decode { message: String } => "records store returned malformed data: {message}",
    }
}

impl StoreError {
    /// Whether retrying later might succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Timeout { .. })
    }
}
