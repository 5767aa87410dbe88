//! Tests for the booking service.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::*;
use crate::domain::ports::{MockMeetingRoomStore, MockReservationStore, MockUserStore};
use crate::domain::{ErrorCode, MeetingRoomId, TimeSlot};
use rstest::rstest;

fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("fixture date")
}

fn ada() -> User {
    User::try_from_strings("u1", "Ada", "ada@example.com").expect("fixture user")
}

fn booked(id: &str, user: &str, on: &str, start: &str, end: &str) -> Reservation {
    Reservation::new(
        ReservationId::new(id).expect("id"),
        UserId::new(user).expect("user"),
        date(on),
        TimeSlot::parse(start, end).expect("slot"),
        "standup",
    )
    .expect("fixture reservation")
}

fn draft(user: Option<&str>, on: &str, start: &str, end: &str) -> ReservationDraft {
    ReservationDraft::new(
        user.map(|u| UserId::new(u).expect("user")),
        date(on),
        TimeSlot::parse(start, end).expect("slot"),
        "review",
    )
    .expect("fixture draft")
}

fn seeded_users(users: Vec<User>) -> MockUserStore {
    let mut store = MockUserStore::new();
    store
        .expect_list_users()
        .returning(move || Ok(users.clone()));
    store
}

fn seeded_reservations(reservations: Vec<Reservation>) -> MockReservationStore {
    let mut store = MockReservationStore::new();
    store
        .expect_list_reservations()
        .returning(move || Ok(reservations.clone()));
    store
}

async fn loaded_service(
    users: MockUserStore,
    reservations: MockReservationStore,
    options: BookingOptions,
) -> BookingService {
    let service = BookingService::new(
        BookingStores {
            users: Arc::new(users),
            reservations: Arc::new(reservations),
            rooms: Arc::new(MockMeetingRoomStore::new()),
        },
        options,
    );
    service.load().await.expect("initial load");
    service
}

#[tokio::test]
async fn load_sorts_reservations_and_joins_user_names() {
    let reservations = seeded_reservations(vec![
        booked("r2", "u1", "2024-06-11", "09:00", "10:00"),
        booked("r3", "gone", "2024-06-10", "13:00", "14:00"),
        booked("r1", "u1", "2024-06-10", "09:00", "10:00"),
    ]);
    let service =
        loaded_service(seeded_users(vec![ada()]), reservations, BookingOptions::default()).await;

    assert!(service.is_loaded().await);
    let views = service.reservation_views().await;
    let order: Vec<_> = views.iter().map(|v| v.reservation.id().as_str()).collect();
    assert_eq!(order, vec!["r1", "r3", "r2"]);
    assert_eq!(views[0].user_name, "Ada");
    assert_eq!(views[1].user_name, UNKNOWN_USER_NAME);
}

#[tokio::test]
async fn failed_refresh_keeps_previous_snapshot() {
    let mut users = MockUserStore::new();
    let mut calls = 0;
    users.expect_list_users().returning(move || {
        calls += 1;
        if calls == 1 {
            Ok(vec![ada()])
        } else {
            Err(StoreError::timeout("5s elapsed"))
        }
    });
    let service = loaded_service(
        users,
        seeded_reservations(Vec::new()),
        BookingOptions::default(),
    )
    .await;

    let error = service.refresh().await.expect_err("second refresh fails");
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    assert_eq!(service.users().await, vec![ada()]);
}

#[tokio::test]
async fn rejected_candidate_never_reaches_the_store() {
    let mut reservations =
        seeded_reservations(vec![booked("r1", "u1", "2024-06-10", "09:30", "10:30")]);
    reservations.expect_create_reservation().never();
    let service =
        loaded_service(seeded_users(vec![ada()]), reservations, BookingOptions::default()).await;

    let error = service
        .create_reservation(draft(Some("u1"), "2024-06-10", "09:00", "10:00"))
        .await
        .expect_err("overlap");
    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(error.message(), "time slot already booked");

    let error = service
        .create_reservation(draft(None, "2024-06-12", "09:00", "10:00"))
        .await
        .expect_err("no user");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn created_reservation_takes_the_store_identifier() {
    let mut reservations = seeded_reservations(Vec::new());
    reservations
        .expect_create_reservation()
        .times(1)
        .returning(|candidate| {
            Ok(candidate
                .to_draft()
                .into_reservation(ReservationId::new("srv-9").expect("id"))
                .expect("user present"))
        });
    let service =
        loaded_service(seeded_users(vec![ada()]), reservations, BookingOptions::default()).await;

    let stored = service
        .create_reservation(draft(Some("u1"), "2024-06-10", "09:00", "10:00"))
        .await
        .expect("created");

    assert_eq!(stored.id().as_str(), "srv-9");
    assert_eq!(service.reservations().await, vec![stored]);
}

/// Reservation store that takes a while to acknowledge each write.
#[derive(Default)]
struct SlowReservationStore {
    writes: AtomicUsize,
}

#[async_trait]
impl ReservationStore for SlowReservationStore {
    async fn list_reservations(&self) -> Result<Vec<Reservation>, StoreError> {
        Ok(Vec::new())
    }

    async fn create_reservation(
        &self,
        reservation: &Reservation,
    ) -> Result<Reservation, StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        Ok(reservation.clone())
    }

    async fn update_reservation(
        &self,
        reservation: &Reservation,
    ) -> Result<Reservation, StoreError> {
        Ok(reservation.clone())
    }

    async fn delete_reservation(&self, _id: &ReservationId) -> Result<(), StoreError> {
        Ok(())
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn overlapping_submissions_in_flight_are_serialised() {
    let store = Arc::new(SlowReservationStore::default());
    let service = Arc::new(BookingService::new(
        BookingStores {
            users: Arc::new(seeded_users(vec![ada()])),
            reservations: store.clone(),
            rooms: Arc::new(MockMeetingRoomStore::new()),
        },
        BookingOptions::default(),
    ));
    service.load().await.expect("initial load");

    let first = Arc::clone(&service);
    let second = Arc::clone(&service);
    let (a, b) = tokio::join!(
        tokio::spawn(async move {
            first
                .create_reservation(draft(Some("u1"), "2024-06-10", "09:00", "10:00"))
                .await
        }),
        tokio::spawn(async move {
            second
                .create_reservation(draft(Some("u1"), "2024-06-10", "09:30", "10:30"))
                .await
        }),
    );
    let outcomes = [a.expect("first task"), b.expect("second task")];

    let accepted = outcomes.iter().filter(|o| o.is_ok()).count();
    assert_eq!(accepted, 1, "{outcomes:?}");
    let refused = outcomes
        .iter()
        .find_map(|o| o.as_ref().err())
        .expect("one submission refused");
    assert_eq!(refused.code(), ErrorCode::Conflict);
    assert_eq!(
        refused.details().and_then(|d| d.get("code")),
        Some(&serde_json::json!("slot_already_booked"))
    );
    assert_eq!(store.writes.load(Ordering::SeqCst), 1);
    assert_eq!(service.reservations().await.len(), 1);
}

#[tokio::test]
async fn store_failure_leaves_snapshot_unchanged() {
    let mut reservations = seeded_reservations(Vec::new());
    reservations
        .expect_create_reservation()
        .returning(|_| Err(StoreError::transport("connection refused")));
    let service =
        loaded_service(seeded_users(vec![ada()]), reservations, BookingOptions::default()).await;

    let error = service
        .create_reservation(draft(Some("u1"), "2024-06-10", "09:00", "10:00"))
        .await
        .expect_err("store down");
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    assert!(service.reservations().await.is_empty());
}

#[tokio::test]
async fn editing_in_place_is_accepted_and_replaces_the_entry() {
    let existing = booked("r1", "u1", "2024-06-10", "09:00", "10:00");
    let mut reservations = seeded_reservations(vec![existing.clone()]);
    reservations
        .expect_update_reservation()
        .times(1)
        .returning(|r| Ok(r.clone()));
    let service =
        loaded_service(seeded_users(vec![ada()]), reservations, BookingOptions::default()).await;

    let mut edited = existing.to_draft();
    edited.purpose = "retro".to_owned();
    let stored = service
        .update_reservation(existing.id(), edited)
        .await
        .expect("unchanged slot is accepted");

    assert_eq!(stored.purpose(), "retro");
    assert_eq!(service.reservations().await, vec![stored]);
}

#[tokio::test]
async fn editing_an_unknown_reservation_is_not_found() {
    let mut reservations = seeded_reservations(Vec::new());
    reservations.expect_update_reservation().never();
    let service =
        loaded_service(seeded_users(vec![ada()]), reservations, BookingOptions::default()).await;

    let error = service
        .update_reservation(
            &ReservationId::new("missing").expect("id"),
            draft(Some("u1"), "2024-06-10", "09:00", "10:00"),
        )
        .await
        .expect_err("unknown id");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn empty_user_patch_is_rejected_locally() {
    let mut users = seeded_users(vec![ada()]);
    users.expect_update_user().never();
    let service = loaded_service(
        users,
        seeded_reservations(Vec::new()),
        BookingOptions::default(),
    )
    .await;

    let error = service
        .update_user(ada().id(), UserPatch::default())
        .await
        .expect_err("empty patch");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn blocking_policy_refuses_to_delete_users_with_reservations() {
    let mut users = seeded_users(vec![ada()]);
    users.expect_delete_user().never();
    let service = loaded_service(
        users,
        seeded_reservations(vec![booked("r1", "u1", "2024-06-10", "09:00", "10:00")]),
        BookingOptions::default(),
    )
    .await;

    let error = service
        .delete_user(ada().id())
        .await
        .expect_err("user still booked");
    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(service.users().await.len(), 1);
}

#[tokio::test]
async fn cascade_policy_deletes_reservations_then_the_user() {
    let mut users = seeded_users(vec![ada()]);
    users.expect_delete_user().times(1).returning(|_| Ok(()));
    let mut reservations = seeded_reservations(vec![
        booked("r1", "u1", "2024-06-10", "09:00", "10:00"),
        booked("r2", "u2", "2024-06-10", "11:00", "12:00"),
    ]);
    reservations
        .expect_delete_reservation()
        .withf(|id| id.as_str() == "r1")
        .times(1)
        .returning(|_| Ok(()));
    let options = BookingOptions {
        deletion_policy: UserDeletionPolicy::Cascade,
        ..BookingOptions::default()
    };
    let service = loaded_service(users, reservations, options).await;

    service.delete_user(ada().id()).await.expect("cascade");

    assert!(service.users().await.is_empty());
    let left: Vec<_> = service
        .reservations()
        .await
        .iter()
        .map(|r| r.id().as_str().to_owned())
        .collect();
    assert_eq!(left, vec!["r2"]);
}

#[rstest]
#[case(false, 30)]
#[case(true, 42)]
#[tokio::test]
async fn month_calendar_honours_padding(#[case] padded: bool, #[case] days: usize) {
    let service = loaded_service(
        seeded_users(vec![ada()]),
        seeded_reservations(vec![booked("r1", "u1", "2024-06-10", "09:00", "10:00")]),
        BookingOptions::default(),
    )
    .await;

    let page = service
        .calendar(date("2024-06-12"), Granularity::Month, padded)
        .await;

    assert_eq!(page.days.len(), days);
    assert_eq!(page.padded, padded);
    let tenth = page
        .days
        .iter()
        .find(|d| d.date == date("2024-06-10"))
        .expect("in range");
    assert_eq!(tenth.reservations[0].user_name, "Ada");
}

#[tokio::test]
async fn meeting_room_maps_missing_record_to_not_found() {
    let mut rooms = MockMeetingRoomStore::new();
    rooms
        .expect_meeting_room()
        .returning(|| Err(StoreError::not_found("meetingRoom")));
    let service = BookingService::new(
        BookingStores {
            users: Arc::new(MockUserStore::new()),
            reservations: Arc::new(MockReservationStore::new()),
            rooms: Arc::new(rooms),
        },
        BookingOptions::default(),
    );

    let error = service.meeting_room().await.expect_err("missing");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn meeting_room_passes_through() {
    let room = MeetingRoom {
        id: MeetingRoomId::new("main").expect("id"),
        name: "Boardroom".to_owned(),
        capacity: 8,
        equipment: vec!["projector".to_owned()],
    };
    let expected = room.clone();
    let mut rooms = MockMeetingRoomStore::new();
    rooms
        .expect_meeting_room()
        .returning(move || Ok(room.clone()));
    let service = BookingService::new(
        BookingStores {
            users: Arc::new(MockUserStore::new()),
            reservations: Arc::new(MockReservationStore::new()),
            rooms: Arc::new(rooms),
        },
        BookingOptions::default(),
    );

    assert_eq!(service.meeting_room().await.expect("room"), expected);
}

#[rstest]
#[case("block", UserDeletionPolicy::Block)]
#[case(" Cascade", UserDeletionPolicy::Cascade)]
fn parses_deletion_policy(#[case] raw: &str, #[case] expected: UserDeletionPolicy) {
    assert_eq!(raw.parse::<UserDeletionPolicy>(), Ok(expected));
}
