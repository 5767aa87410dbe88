//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::web;
use chrono::NaiveDate;

use crate::domain::{
    BookingOptions, BookingService, BookingStores, MeetingRoom, MeetingRoomId, Reservation,
    ReservationId, TimeSlot, User, UserId,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::records::InMemoryRecordStore;

/// Builder for the in-memory store handed to handler tests.
pub struct TestStore;

impl TestStore {
    /// Two users, two reservations on 2024-06-10 and the room record.
    ///
    /// - `u1` Ada holds `r1` 09:00-10:00.
    /// - `u2` Grace holds `r2` 11:00-12:00.
    pub fn seeded() -> InMemoryRecordStore {
        InMemoryRecordStore::new()
            .with_users(vec![
                user("u1", "Ada Lovelace", "ada@example.com"),
                user("u2", "Grace Hopper", "grace@example.com"),
            ])
            .with_reservations(vec![
                reservation("r1", "u1", "09:00", "10:00"),
                reservation("r2", "u2", "11:00", "12:00"),
            ])
            .with_meeting_room(MeetingRoom {
                id: MeetingRoomId::new("main").expect("fixture room id"),
                name: "Boardroom".to_owned(),
                capacity: 8,
                equipment: vec!["projector".to_owned()],
            })
    }
}

pub fn user(id: &str, name: &str, email: &str) -> User {
    User::try_from_strings(id, name, email).expect("fixture user")
}

pub fn reservation(id: &str, user_id: &str, start: &str, end: &str) -> Reservation {
    Reservation::new(
        ReservationId::new(id).expect("fixture reservation id"),
        UserId::new(user_id).expect("fixture user id"),
        fixture_date(),
        TimeSlot::parse(start, end).expect("fixture slot"),
        "Planning",
    )
    .expect("fixture reservation")
}

pub fn fixture_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 10).expect("fixture date")
}

/// Wrap a store in a booking service with default options.
pub fn test_state(store: InMemoryRecordStore) -> HttpState {
    test_state_with(store, BookingOptions::default())
}

pub fn test_state_with(store: InMemoryRecordStore, options: BookingOptions) -> HttpState {
    let store = Arc::new(store);
    let stores = BookingStores {
        users: store.clone(),
        reservations: store.clone(),
        rooms: store,
    };
    HttpState::new(Arc::new(BookingService::new(stores, options)))
}

/// A loaded state ready to be registered with `App::app_data`.
pub async fn loaded_state(store: InMemoryRecordStore) -> web::Data<HttpState> {
    let state = test_state(store);
    state.booking.load().await.expect("in-memory load succeeds");
    web::Data::new(state)
}
