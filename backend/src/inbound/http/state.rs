//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on the booking service and remain testable against in-memory
//! stores.

use std::sync::Arc;

use crate::domain::BookingService;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub booking: Arc<BookingService>,
}

impl HttpState {
    /// Construct state from the shared booking service.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use meeting_room::domain::{BookingOptions, BookingService, BookingStores};
    /// use meeting_room::inbound::http::state::HttpState;
    /// use meeting_room::outbound::records::InMemoryRecordStore;
    ///
    /// let store = Arc::new(InMemoryRecordStore::new());
    /// let stores = BookingStores {
    ///     users: store.clone(),
    ///     reservations: store.clone(),
    ///     rooms: store,
    /// };
    /// let service = Arc::new(BookingService::new(stores, BookingOptions::default()));
    /// let _state = HttpState::new(service);
    /// ```
    pub fn new(booking: Arc<BookingService>) -> Self {
        Self { booking }
    }
}
