//! In-process records store.
//!
//! Backs development runs without an external store and gives tests a
//! deterministic collaborator. Identifiers proposed by callers are kept.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::ports::{MeetingRoomStore, ReservationStore, StoreError, UserStore};
use crate::domain::{MeetingRoom, Reservation, ReservationId, User, UserId, UserPatch};

#[derive(Debug, Default)]
struct Records {
    users: Vec<User>,
    reservations: Vec<Reservation>,
    meeting_room: Option<MeetingRoom>,
}

/// Thread-safe store implementing every records port in memory.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: Mutex<Records>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(self, users: Vec<User>) -> Self {
        let mut records = self.records.into_inner();
        records.users = users;
        Self {
            records: Mutex::new(records),
        }
    }

    pub fn with_reservations(self, reservations: Vec<Reservation>) -> Self {
        let mut records = self.records.into_inner();
        records.reservations = reservations;
        Self {
            records: Mutex::new(records),
        }
    }

    pub fn with_meeting_room(self, room: MeetingRoom) -> Self {
        let mut records = self.records.into_inner();
        records.meeting_room = Some(room);
        Self {
            records: Mutex::new(records),
        }
    }

    fn duplicate(resource: &str, id: &str) -> StoreError {
        StoreError::rejected(409_u16, format!("{resource}/{id} already exists"))
    }

    fn missing(resource: &str, id: &str) -> StoreError {
        StoreError::not_found(format!("{resource}/{id}"))
    }
}

#[async_trait]
impl UserStore for InMemoryRecordStore {
    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.records.lock().await.users.clone())
    }

    async fn create_user(&self, user: &User) -> Result<User, StoreError> {
        let mut records = self.records.lock().await;
        if records.users.iter().any(|u| u.id() == user.id()) {
            return Err(Self::duplicate("users", user.id().as_str()));
        }
        records.users.push(user.clone());
        Ok(user.clone())
    }

    async fn update_user(&self, id: &UserId, patch: &UserPatch) -> Result<User, StoreError> {
        let mut records = self.records.lock().await;
        let entry = records
            .users
            .iter_mut()
            .find(|u| u.id() == id)
            .ok_or_else(|| Self::missing("users", id.as_str()))?;
        *entry = patch.apply(entry);
        Ok(entry.clone())
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), StoreError> {
        let mut records = self.records.lock().await;
        let before = records.users.len();
        records.users.retain(|u| u.id() != id);
        if records.users.len() == before {
            return Err(Self::missing("users", id.as_str()));
        }
        Ok(())
    }
}

#[async_trait]
impl ReservationStore for InMemoryRecordStore {
    async fn list_reservations(&self) -> Result<Vec<Reservation>, StoreError> {
        Ok(self.records.lock().await.reservations.clone())
    }

    async fn create_reservation(
        &self,
        reservation: &Reservation,
    ) -> Result<Reservation, StoreError> {
        let mut records = self.records.lock().await;
        if records.reservations.iter().any(|r| r.id() == reservation.id()) {
            return Err(Self::duplicate("reservations", reservation.id().as_str()));
        }
        records.reservations.push(reservation.clone());
        Ok(reservation.clone())
    }

    async fn update_reservation(
        &self,
        reservation: &Reservation,
    ) -> Result<Reservation, StoreError> {
        let mut records = self.records.lock().await;
        let entry = records
            .reservations
            .iter_mut()
            .find(|r| r.id() == reservation.id())
            .ok_or_else(|| Self::missing("reservations", reservation.id().as_str()))?;
        *entry = reservation.clone();
        Ok(reservation.clone())
    }

    async fn delete_reservation(&self, id: &ReservationId) -> Result<(), StoreError> {
        let mut records = self.records.lock().await;
        let before = records.reservations.len();
        records.reservations.retain(|r| r.id() != id);
        if records.reservations.len() == before {
            return Err(Self::missing("reservations", id.as_str()));
        }
        Ok(())
    }
}

#[async_trait]
impl MeetingRoomStore for InMemoryRecordStore {
    async fn meeting_room(&self) -> Result<MeetingRoom, StoreError> {
        self.records
            .lock()
            .await
            .meeting_room
            .clone()
            .ok_or_else(|| StoreError::not_found("meetingRoom"))
    }
}
