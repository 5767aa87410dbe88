//! Port for reservations held by the records store.

use async_trait::async_trait;

use crate::domain::{Reservation, ReservationId};

use super::StoreError;

/// CRUD access to reservations. Adapters perform no booking checks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReservationStore: Send + Sync {
    async fn list_reservations(&self) -> Result<Vec<Reservation>, StoreError>;

    /// Persist a new reservation; the store may replace the proposed id.
    async fn create_reservation(&self, reservation: &Reservation)
    -> Result<Reservation, StoreError>;

    /// Replace a stored reservation wholesale.
    async fn update_reservation(&self, reservation: &Reservation)
    -> Result<Reservation, StoreError>;

    async fn delete_reservation(&self, id: &ReservationId) -> Result<(), StoreError>;
}
