//! Domain ports and supporting types for the hexagonal boundary.
//!
//! The records store is the only driven collaborator. Each port returns the
//! shared [`StoreError`] so the booking service maps failures in one place.

mod macros;
pub(crate) use macros::define_port_error;

mod meeting_room_store;
mod reservation_store;
mod store_error;
mod user_store;

pub use meeting_room_store::MeetingRoomStore;
#[cfg(test)]
pub use meeting_room_store::MockMeetingRoomStore;
pub use reservation_store::ReservationStore;
#[cfg(test)]
pub use reservation_store::MockReservationStore;
pub use store_error::StoreError;
#[cfg(test)]
pub use user_store::MockUserStore;
pub use user_store::UserStore;
