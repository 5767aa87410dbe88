//! Booking service: the in-memory session state for one meeting room.
//!
//! The service owns a snapshot of the roster and the reservation list,
//! loaded from the records store and patched locally after each successful
//! mutation. Booking rules run against the snapshot before any store call,
//! so a rejected candidate never reaches the network.
//!
//! Mutations are serialised through a single async mutex held across the
//! store call. A second submission waits for the first to settle and then
//! validates against the updated snapshot. Store failures leave the
//! snapshot untouched.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use crate::domain::calendar::{self, Direction, Granularity, UnknownVariant, WeekStart};
use crate::domain::ports::{MeetingRoomStore, ReservationStore, StoreError, UserStore};
use crate::domain::{
    Error, MeetingRoom, NewUser, Rejection, Reservation, ReservationDraft, ReservationId, User,
    UserId, UserPatch, validate,
};

/// Name shown for reservations whose user is no longer on the roster.
pub const UNKNOWN_USER_NAME: &str = "unknown user";

/// What happens to a user's reservations when the user is deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserDeletionPolicy {
    /// Refuse with `conflict` while any reservation references the user.
    #[default]
    Block,
    /// Delete the user's reservations first, then the user.
    Cascade,
}

impl FromStr for UserDeletionPolicy {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "block" => Ok(Self::Block),
            "cascade" => Ok(Self::Cascade),
            _ => Err(UnknownVariant::new("deletion policy", s)),
        }
    }
}

impl fmt::Display for UserDeletionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Block => "block",
            Self::Cascade => "cascade",
        })
    }
}

/// Behavioural knobs for [`BookingService`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookingOptions {
    pub week_start: WeekStart,
    pub deletion_policy: UserDeletionPolicy,
}

/// Driven ports used by [`BookingService`].
#[derive(Clone)]
pub struct BookingStores {
    pub users: Arc<dyn UserStore>,
    pub reservations: Arc<dyn ReservationStore>,
    pub rooms: Arc<dyn MeetingRoomStore>,
}

/// A reservation joined with the display name of its user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationView {
    pub reservation: Reservation,
    pub user_name: String,
}

/// One day of a calendar page with owned reservation views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub is_in_current_period: bool,
    pub reservations: Vec<ReservationView>,
}

/// A projected week or month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarPage {
    pub reference: NaiveDate,
    pub granularity: Granularity,
    pub padded: bool,
    pub days: Vec<CalendarDay>,
}

#[derive(Debug, Default)]
struct Snapshot {
    loaded: bool,
    users: Vec<User>,
    reservations: Vec<Reservation>,
}

impl Snapshot {
    fn user_name(&self, id: &UserId) -> String {
        self.users
            .iter()
            .find(|user| user.id() == id)
            .map_or_else(|| UNKNOWN_USER_NAME.to_owned(), |user| user.name().to_string())
    }

    fn view(&self, reservation: &Reservation) -> ReservationView {
        ReservationView {
            reservation: reservation.clone(),
            user_name: self.user_name(reservation.user_id()),
        }
    }

    fn find_reservation(&self, id: &ReservationId) -> Option<&Reservation> {
        self.reservations.iter().find(|r| r.id() == id)
    }

    fn upsert_reservation(&mut self, reservation: Reservation) {
        match self
            .reservations
            .iter_mut()
            .find(|r| r.id() == reservation.id())
        {
            Some(slot) => *slot = reservation,
            None => self.reservations.push(reservation),
        }
        sort_reservations(&mut self.reservations);
    }

    fn upsert_user(&mut self, user: User) {
        match self.users.iter_mut().find(|u| u.id() == user.id()) {
            Some(slot) => *slot = user,
            None => self.users.push(user),
        }
    }
}

fn sort_reservations(reservations: &mut [Reservation]) {
    reservations.sort_by(|a, b| {
        (a.date(), a.slot().start(), a.slot().end(), a.id())
            .cmp(&(b.date(), b.slot().start(), b.slot().end(), b.id()))
    });
}

/// Session state and use-cases for booking the meeting room.
pub struct BookingService {
    stores: BookingStores,
    options: BookingOptions,
    snapshot: RwLock<Snapshot>,
    mutations: Mutex<()>,
}

impl BookingService {
    /// Create a service with an empty, not-yet-loaded snapshot.
    pub fn new(stores: BookingStores, options: BookingOptions) -> Self {
        Self {
            stores,
            options,
            snapshot: RwLock::new(Snapshot::default()),
            mutations: Mutex::new(()),
        }
    }

    pub fn options(&self) -> BookingOptions {
        self.options
    }

    fn map_store_error(operation: &'static str, error: StoreError) -> Error {
        match &error {
            StoreError::Transport { .. } | StoreError::Timeout { .. } => {
                warn!(operation, error = %error, "records store unavailable");
                Error::service_unavailable("records store unavailable")
            }
            StoreError::NotFound { message } => Error::not_found(message.clone()),
            StoreError::Rejected { status, message } => {
                warn!(operation, status, "records store rejected request");
                Error::invalid_request(format!("records store rejected the request: {message}"))
            }
            StoreError::Decode { .. } => {
                warn!(operation, error = %error, "records store returned malformed data");
                Error::internal(error.to_string())
            }
        }
    }

    /// Fetch users and reservations from the store, replacing the snapshot.
    pub async fn load(&self) -> Result<(), Error> {
        self.refresh().await
    }

    /// Re-fetch both collections concurrently. On failure the previous
    /// snapshot is kept.
    pub async fn refresh(&self) -> Result<(), Error> {
        let _guard = self.mutations.lock().await;
        let (users, mut reservations) = tokio::try_join!(
            async {
                self.stores
                    .users
                    .list_users()
                    .await
                    .map_err(|err| Self::map_store_error("list_users", err))
            },
            async {
                self.stores
                    .reservations
                    .list_reservations()
                    .await
                    .map_err(|err| Self::map_store_error("list_reservations", err))
            },
        )?;
        sort_reservations(&mut reservations);
        info!(
            users = users.len(),
            reservations = reservations.len(),
            "booking snapshot loaded"
        );
        let mut snapshot = self.snapshot.write().await;
        *snapshot = Snapshot {
            loaded: true,
            users,
            reservations,
        };
        Ok(())
    }

    /// Whether a load has completed at least once.
    pub async fn is_loaded(&self) -> bool {
        self.snapshot.read().await.loaded
    }

    pub async fn users(&self) -> Vec<User> {
        self.snapshot.read().await.users.clone()
    }

    /// Reservations ordered by date, then start time.
    pub async fn reservations(&self) -> Vec<Reservation> {
        self.snapshot.read().await.reservations.clone()
    }

    /// Reservations joined with their users' names.
    pub async fn reservation_views(&self) -> Vec<ReservationView> {
        let snapshot = self.snapshot.read().await;
        snapshot
            .reservations
            .iter()
            .map(|r| snapshot.view(r))
            .collect()
    }

    /// Run the booking rules without persisting anything.
    ///
    /// `exclude` names the reservation being edited; it must exist.
    pub async fn check_reservation(
        &self,
        draft: &ReservationDraft,
        exclude: Option<&ReservationId>,
    ) -> Result<(), Error> {
        let snapshot = self.snapshot.read().await;
        Self::check_against(&snapshot, draft, exclude)
    }

    fn check_against(
        snapshot: &Snapshot,
        draft: &ReservationDraft,
        exclude: Option<&ReservationId>,
    ) -> Result<(), Error> {
        if let Some(id) = exclude {
            if snapshot.find_reservation(id).is_none() {
                return Err(Error::not_found(format!("reservation {id} not found")));
            }
        }
        validate(draft, &snapshot.reservations, exclude).map_err(|rejection| {
            info!(code = rejection.code(), "reservation rejected");
            Error::from(rejection)
        })
    }

    /// Validate `draft`, persist it and add it to the snapshot.
    pub async fn create_reservation(&self, draft: ReservationDraft) -> Result<Reservation, Error> {
        let _guard = self.mutations.lock().await;
        Self::check_against(&*self.snapshot.read().await, &draft, None)?;

        let candidate = draft
            .into_reservation(ReservationId::random())
            .ok_or_else(|| Error::from(Rejection::NoUserSelected))?;
        let stored = self
            .stores
            .reservations
            .create_reservation(&candidate)
            .await
            .map_err(|err| Self::map_store_error("create_reservation", err))?;

        info!(reservation_id = %stored.id(), date = %stored.date(), "reservation created");
        self.snapshot
            .write()
            .await
            .upsert_reservation(stored.clone());
        Ok(stored)
    }

    /// Re-validate an edited reservation (ignoring itself) and replace it.
    pub async fn update_reservation(
        &self,
        id: &ReservationId,
        draft: ReservationDraft,
    ) -> Result<Reservation, Error> {
        let _guard = self.mutations.lock().await;
        Self::check_against(&*self.snapshot.read().await, &draft, Some(id))?;

        let candidate = draft
            .into_reservation(id.clone())
            .ok_or_else(|| Error::from(Rejection::NoUserSelected))?;
        let stored = self
            .stores
            .reservations
            .update_reservation(&candidate)
            .await
            .map_err(|err| Self::map_store_error("update_reservation", err))?;

        info!(reservation_id = %id, "reservation updated");
        let mut snapshot = self.snapshot.write().await;
        if stored.id() != id {
            snapshot.reservations.retain(|r| r.id() != id);
        }
        snapshot.upsert_reservation(stored.clone());
        Ok(stored)
    }

    pub async fn delete_reservation(&self, id: &ReservationId) -> Result<(), Error> {
        let _guard = self.mutations.lock().await;
        self.stores
            .reservations
            .delete_reservation(id)
            .await
            .map_err(|err| Self::map_store_error("delete_reservation", err))?;

        info!(reservation_id = %id, "reservation deleted");
        self.snapshot
            .write()
            .await
            .reservations
            .retain(|r| r.id() != id);
        Ok(())
    }

    /// Add a user to the roster under a freshly minted identifier.
    pub async fn create_user(&self, new_user: NewUser) -> Result<User, Error> {
        let _guard = self.mutations.lock().await;
        let candidate = new_user.with_id(UserId::random());
        let stored = self
            .stores
            .users
            .create_user(&candidate)
            .await
            .map_err(|err| Self::map_store_error("create_user", err))?;

        info!(user_id = %stored.id(), "user created");
        self.snapshot.write().await.upsert_user(stored.clone());
        Ok(stored)
    }

    /// Apply a partial update to a user.
    pub async fn update_user(&self, id: &UserId, patch: UserPatch) -> Result<User, Error> {
        if patch.is_empty() {
            return Err(Error::invalid_request("patch must change at least one field"));
        }
        let _guard = self.mutations.lock().await;
        let stored = self
            .stores
            .users
            .update_user(id, &patch)
            .await
            .map_err(|err| Self::map_store_error("update_user", err))?;

        info!(user_id = %id, "user updated");
        self.snapshot.write().await.upsert_user(stored.clone());
        Ok(stored)
    }

    /// Remove a user, applying the configured [`UserDeletionPolicy`] to
    /// reservations that still reference them.
    pub async fn delete_user(&self, id: &UserId) -> Result<(), Error> {
        let _guard = self.mutations.lock().await;
        let owned: Vec<ReservationId> = self
            .snapshot
            .read()
            .await
            .reservations
            .iter()
            .filter(|r| r.user_id() == id)
            .map(|r| r.id().clone())
            .collect();

        if !owned.is_empty() {
            match self.options.deletion_policy {
                UserDeletionPolicy::Block => {
                    return Err(Error::conflict("user has reservations").with_details(json!({
                        "code": "user_has_reservations",
                        "reservationIds": owned,
                    })));
                }
                UserDeletionPolicy::Cascade => self.cascade_reservations(id, &owned).await?,
            }
        }

        self.stores
            .users
            .delete_user(id)
            .await
            .map_err(|err| Self::map_store_error("delete_user", err))?;

        info!(user_id = %id, cascaded = owned.len(), "user deleted");
        self.snapshot.write().await.users.retain(|u| u.id() != id);
        Ok(())
    }

    // Deletions already acknowledged by the store are dropped from the
    // snapshot even when a later one fails.
    async fn cascade_reservations(
        &self,
        user_id: &UserId,
        owned: &[ReservationId],
    ) -> Result<(), Error> {
        for reservation_id in owned {
            let outcome = self
                .stores
                .reservations
                .delete_reservation(reservation_id)
                .await;
            match outcome {
                Ok(()) | Err(StoreError::NotFound { .. }) => {
                    self.snapshot
                        .write()
                        .await
                        .reservations
                        .retain(|r| r.id() != reservation_id);
                }
                Err(err) => {
                    warn!(user_id = %user_id, reservation_id = %reservation_id, "cascade stopped");
                    return Err(Self::map_store_error("delete_reservation", err));
                }
            }
        }
        Ok(())
    }

    /// Project the snapshot onto the week or month containing `reference`.
    ///
    /// `padded` only affects month pages, widening them to whole weeks.
    pub async fn calendar(
        &self,
        reference: NaiveDate,
        granularity: Granularity,
        padded: bool,
    ) -> CalendarPage {
        let snapshot = self.snapshot.read().await;
        let buckets = match (granularity, padded) {
            (Granularity::Month, true) => calendar::month_grid(
                reference,
                self.options.week_start,
                &snapshot.reservations,
            ),
            _ => calendar::project_with(
                reference,
                granularity,
                self.options.week_start,
                &snapshot.reservations,
            ),
        };
        let days = buckets
            .into_iter()
            .map(|bucket| CalendarDay {
                date: bucket.date,
                is_in_current_period: bucket.is_in_current_period,
                reservations: bucket
                    .reservations
                    .into_iter()
                    .map(|r| snapshot.view(r))
                    .collect(),
            })
            .collect();
        CalendarPage {
            reference,
            granularity,
            padded: padded && granularity == Granularity::Month,
            days,
        }
    }

    pub fn advance(
        &self,
        reference: NaiveDate,
        granularity: Granularity,
        direction: Direction,
    ) -> NaiveDate {
        calendar::advance(reference, granularity, direction)
    }

    /// Room details, fetched from the store on each call.
    pub async fn meeting_room(&self) -> Result<MeetingRoom, Error> {
        self.stores
            .rooms
            .meeting_room()
            .await
            .map_err(|err| Self::map_store_error("meeting_room", err))
    }
}

#[cfg(test)]
#[path = "booking_service_tests.rs"]
mod tests;
