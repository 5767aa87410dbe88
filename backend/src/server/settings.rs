//! Service settings loaded via OrthoConfig.
//!
//! Values layer defaults, a configuration file, `MEETING_ROOM_*` environment
//! variables and command-line flags.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use meeting_room::domain::{BookingOptions, UnknownVariant, UserDeletionPolicy, WeekStart};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_STORE_TIMEOUT_MS: u64 = 5_000;

/// Reasons the loaded settings cannot be used.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address {value:?}: {source}")]
    BindAddr {
        value: String,
        source: std::net::AddrParseError,
    },
    #[error("invalid store URL {value:?}: {source}")]
    StoreUrl {
        value: String,
        source: url::ParseError,
    },
    #[error("store timeout must be positive")]
    ZeroTimeout,
    #[error(transparent)]
    Variant(#[from] UnknownVariant),
}

/// Configuration values controlling the HTTP server and records store.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MEETING_ROOM")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// Base URL of the records store; the in-memory store is used when unset.
    pub store_url: Option<String>,
    /// Per-request timeout for the records store, in milliseconds.
    pub store_timeout_ms: Option<u64>,
    /// First day of calendar weeks: `sunday` or `monday`.
    pub week_start: Option<String>,
    /// What deleting a user with reservations does: `block` or `cascade`.
    pub deletion_policy: Option<String>,
}

impl AppSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|source| SettingsError::BindAddr {
            value: raw.to_owned(),
            source,
        })
    }

    pub fn store_url(&self) -> Result<Option<Url>, SettingsError> {
        self.store_url
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(|raw| {
                Url::parse(raw).map_err(|source| SettingsError::StoreUrl {
                    value: raw.to_owned(),
                    source,
                })
            })
            .transpose()
    }

    pub fn store_timeout(&self) -> Result<Duration, SettingsError> {
        match self.store_timeout_ms.unwrap_or(DEFAULT_STORE_TIMEOUT_MS) {
            0 => Err(SettingsError::ZeroTimeout),
            ms => Ok(Duration::from_millis(ms)),
        }
    }

    pub fn booking_options(&self) -> Result<BookingOptions, SettingsError> {
        let week_start = self
            .week_start
            .as_deref()
            .map(str::parse::<WeekStart>)
            .transpose()?
            .unwrap_or_default();
        let deletion_policy = self
            .deletion_policy
            .as_deref()
            .map(str::parse::<UserDeletionPolicy>)
            .transpose()?
            .unwrap_or_default();
        Ok(BookingOptions {
            week_start,
            deletion_policy,
        })
    }
}
