//! Builders for the booking service and its records store adapters.

use std::sync::Arc;

use tracing::{info, warn};

use meeting_room::domain::ports::{MeetingRoomStore, ReservationStore, UserStore};
use meeting_room::domain::{BookingService, BookingStores, MeetingRoom, MeetingRoomId};
use meeting_room::outbound::records::{HttpRecordStore, InMemoryRecordStore};

use super::ServerConfig;

const DEFAULT_ROOM_ID: &str = "main";
const DEFAULT_ROOM_NAME: &str = "Meeting room";
const DEFAULT_ROOM_CAPACITY: u32 = 8;

fn share<S>(store: S) -> BookingStores
where
    S: UserStore + ReservationStore + MeetingRoomStore + 'static,
{
    let store = Arc::new(store);
    BookingStores {
        users: store.clone(),
        reservations: store.clone(),
        rooms: store,
    }
}

fn fallback_store() -> std::io::Result<InMemoryRecordStore> {
    let id = MeetingRoomId::new(DEFAULT_ROOM_ID)
        .map_err(|err| std::io::Error::other(format!("invalid default room id: {err}")))?;
    Ok(InMemoryRecordStore::new().with_meeting_room(MeetingRoom {
        id,
        name: DEFAULT_ROOM_NAME.to_owned(),
        capacity: DEFAULT_ROOM_CAPACITY,
        equipment: Vec::new(),
    }))
}

/// Build the booking service over the configured records store.
///
/// Uses the HTTP adapter when a store URL is configured, otherwise an
/// in-memory store holding only the room record.
///
/// # Errors
/// Returns [`std::io::Error`] when the HTTP client cannot be constructed.
pub fn build_booking_service(config: &ServerConfig) -> std::io::Result<Arc<BookingService>> {
    let stores = match &config.store_url {
        Some(url) => {
            info!(store_url = %url, timeout = ?config.store_timeout, "using HTTP records store");
            let store = HttpRecordStore::new(url.clone(), config.store_timeout).map_err(|err| {
                std::io::Error::other(format!("records store client setup failed: {err}"))
            })?;
            share(store)
        }
        None => {
            warn!("no records store configured; using in-memory store");
            share(fallback_store()?)
        }
    };
    Ok(Arc::new(BookingService::new(stores, config.options)))
}
