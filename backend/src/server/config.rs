//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use url::Url;

use meeting_room::domain::BookingOptions;

use super::settings::{AppSettings, SettingsError};

/// Validated configuration for creating the HTTP server and its stores.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) store_url: Option<Url>,
    pub(crate) store_timeout: Duration,
    pub(crate) options: BookingOptions,
}

impl ServerConfig {
    /// Validate loaded settings, applying defaults for absent values.
    ///
    /// # Errors
    /// Returns [`SettingsError`] when an address, URL or choice is malformed.
    pub fn from_settings(settings: &AppSettings) -> Result<Self, SettingsError> {
        Ok(Self {
            bind_addr: settings.bind_addr()?,
            store_url: settings.store_url()?,
            store_timeout: settings.store_timeout()?,
            options: settings.booking_options()?,
        })
    }

    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
