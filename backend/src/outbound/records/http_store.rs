//! Reqwest-backed records store adapter.
//!
//! This adapter owns transport details only: URL construction, timeouts,
//! HTTP status mapping and JSON decoding into domain entities. It applies no
//! booking rules.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::dto::{
    MeetingRoomRecordDto, ReservationRecordDto, UserPatchDto, UserRecordDto, UserWriteDto,
};
use crate::domain::ports::{MeetingRoomStore, ReservationStore, StoreError, UserStore};
use crate::domain::{
    MeetingRoom, Reservation, ReservationDto, ReservationId, User, UserId, UserPatch,
};

const USERS: &str = "users";
const RESERVATIONS: &str = "reservations";
const MEETING_ROOM: &str = "meetingRoom";

/// Records store adapter speaking JSON over HTTP to one base URL.
#[derive(Debug, Clone)]
pub struct HttpRecordStore {
    client: Client,
    base_url: Url,
}

impl HttpRecordStore {
    /// Build an adapter using a reqwest client with an explicit request
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, StoreError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                StoreError::transport(format!("base URL {} cannot hold a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder, resource: &str) -> Result<Vec<u8>, StoreError> {
        let response = request
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        debug!(resource, status = status.as_u16(), bytes = body.len(), "records store replied");
        if !status.is_success() {
            return Err(map_status_error(status, resource, body.as_ref()));
        }
        Ok(body.to_vec())
    }
}

fn decode<T: DeserializeOwned>(body: &[u8], resource: &str) -> Result<T, StoreError> {
    serde_json::from_slice(body)
        .map_err(|error| StoreError::decode(format!("invalid {resource} payload: {error}")))
}

/// Keep the readable entries of a listed collection.
///
/// One unreadable record must not hide the rest of the collection, so each
/// failure is logged and the record skipped.
fn keep_readable<D, T>(
    records: Vec<D>,
    resource: &str,
    into_domain: impl Fn(D) -> Result<T, String>,
) -> Vec<T> {
    records
        .into_iter()
        .filter_map(|dto| match into_domain(dto) {
            Ok(value) => Some(value),
            Err(reason) => {
                warn!(resource, %reason, "skipping unreadable record");
                None
            }
        })
        .collect()
}

fn decode_users(body: &[u8]) -> Result<Vec<User>, StoreError> {
    let records = decode::<Vec<UserRecordDto>>(body, USERS)?;
    Ok(keep_readable(records, USERS, UserRecordDto::into_domain))
}

fn decode_user(body: &[u8]) -> Result<User, StoreError> {
    decode::<UserRecordDto>(body, USERS)?
        .into_domain()
        .map_err(StoreError::decode)
}

fn decode_reservations(body: &[u8]) -> Result<Vec<Reservation>, StoreError> {
    let records = decode::<Vec<ReservationRecordDto>>(body, RESERVATIONS)?;
    Ok(keep_readable(
        records,
        RESERVATIONS,
        ReservationRecordDto::into_domain,
    ))
}

fn decode_reservation(body: &[u8]) -> Result<Reservation, StoreError> {
    decode::<ReservationRecordDto>(body, RESERVATIONS)?
        .into_domain()
        .map_err(StoreError::decode)
}

#[async_trait]
impl UserStore for HttpRecordStore {
    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let url = self.endpoint(&[USERS])?;
        let body = self.send(self.client.get(url), USERS).await?;
        decode_users(&body)
    }

    async fn create_user(&self, user: &User) -> Result<User, StoreError> {
        let url = self.endpoint(&[USERS])?;
        let request = self.client.post(url).json(&UserWriteDto::from(user));
        let body = self.send(request, USERS).await?;
        decode_user(&body)
    }

    async fn update_user(&self, id: &UserId, patch: &UserPatch) -> Result<User, StoreError> {
        let url = self.endpoint(&[USERS, id.as_str()])?;
        let request = self.client.patch(url).json(&UserPatchDto::from(patch));
        let body = self.send(request, USERS).await?;
        decode_user(&body)
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), StoreError> {
        let url = self.endpoint(&[USERS, id.as_str()])?;
        self.send(self.client.delete(url), USERS).await?;
        Ok(())
    }
}

#[async_trait]
impl ReservationStore for HttpRecordStore {
    async fn list_reservations(&self) -> Result<Vec<Reservation>, StoreError> {
        let url = self.endpoint(&[RESERVATIONS])?;
        let body = self.send(self.client.get(url), RESERVATIONS).await?;
        decode_reservations(&body)
    }

    async fn create_reservation(
        &self,
        reservation: &Reservation,
    ) -> Result<Reservation, StoreError> {
        let url = self.endpoint(&[RESERVATIONS])?;
        let request = self
            .client
            .post(url)
            .json(&ReservationDto::from(reservation.clone()));
        let body = self.send(request, RESERVATIONS).await?;
        decode_reservation(&body)
    }

    async fn update_reservation(
        &self,
        reservation: &Reservation,
    ) -> Result<Reservation, StoreError> {
        let url = self.endpoint(&[RESERVATIONS, reservation.id().as_str()])?;
        let request = self
            .client
            .put(url)
            .json(&ReservationDto::from(reservation.clone()));
        let body = self.send(request, RESERVATIONS).await?;
        decode_reservation(&body)
    }

    async fn delete_reservation(&self, id: &ReservationId) -> Result<(), StoreError> {
        let url = self.endpoint(&[RESERVATIONS, id.as_str()])?;
        self.send(self.client.delete(url), RESERVATIONS).await?;
        Ok(())
    }
}

#[async_trait]
impl MeetingRoomStore for HttpRecordStore {
    async fn meeting_room(&self) -> Result<MeetingRoom, StoreError> {
        let url = self.endpoint(&[MEETING_ROOM])?;
        let body = self.send(self.client.get(url), MEETING_ROOM).await?;
        decode::<MeetingRoomRecordDto>(&body, MEETING_ROOM)?
            .into_domain()
            .map_err(StoreError::decode)
    }
}

fn map_transport_error(error: reqwest::Error) -> StoreError {
    if error.is_timeout() {
        StoreError::timeout(error.to_string())
    } else {
        StoreError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, resource: &str, body: &[u8]) -> StoreError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("{resource}: status {}", status.as_u16())
    } else {
        format!("{resource}: status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::NOT_FOUND => StoreError::not_found(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => StoreError::timeout(message),
        _ if status.is_client_error() => StoreError::rejected(status.as_u16(), message),
        _ => StoreError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for the non-network mapping helpers.

    use super::*;
    use crate::domain::PURPOSE_MAX;
    use rstest::rstest;

    fn store(base: &str) -> HttpRecordStore {
        HttpRecordStore::new(Url::parse(base).expect("url"), Duration::from_secs(1))
            .expect("client")
    }

    #[rstest]
    #[case("http://records.local", &[USERS], "http://records.local/users")]
    #[case("http://records.local/", &[USERS, "x7k2"], "http://records.local/users/x7k2")]
    #[case("http://records.local/api/", &[MEETING_ROOM], "http://records.local/api/meetingRoom")]
    #[case("http://records.local/api", &[RESERVATIONS, "a b"], "http://records.local/api/reservations/a%20b")]
    fn endpoints_extend_the_base_path(
        #[case] base: &str,
        #[case] segments: &[&str],
        #[case] expected: &str,
    ) {
        let url = store(base).endpoint(segments).expect("endpoint");
        assert_eq!(url.as_str(), expected);
    }

    #[rstest]
    #[case::not_found(StatusCode::NOT_FOUND, "NotFound")]
    #[case::request_timeout(StatusCode::REQUEST_TIMEOUT, "Timeout")]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT, "Timeout")]
    #[case::bad_request(StatusCode::BAD_REQUEST, "Rejected")]
    #[case::conflict(StatusCode::CONFLICT, "Rejected")]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, "Transport")]
    fn maps_http_statuses_to_store_errors(#[case] status: StatusCode, #[case] expected: &str) {
        let error = map_status_error(status, USERS, b"{\"error\":\"nope\"}");
        let matched = match expected {
            "NotFound" => matches!(error, StoreError::NotFound { .. }),
            "Timeout" => matches!(error, StoreError::Timeout { .. }),
            "Rejected" => matches!(error, StoreError::Rejected { .. }),
            "Transport" => matches!(error, StoreError::Transport { .. }),
            _ => panic!("unsupported test expectation: {expected}"),
        };
        assert!(matched, "{status} should map to {expected}, got {error:?}");
    }

    #[test]
    fn rejected_errors_keep_the_status_code() {
        let error = map_status_error(StatusCode::UNPROCESSABLE_ENTITY, RESERVATIONS, b"");
        assert_eq!(
            error,
            StoreError::rejected(422_u16, "reservations: status 422")
        );
    }

    #[test]
    fn previews_are_compacted_and_truncated() {
        let long = format!("{{ \"detail\":\n  \"{}\" }}", "x".repeat(400));
        let preview = body_preview(long.as_bytes());
        assert!(preview.starts_with("{ \"detail\": \"xxx"));
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 163);
    }

    #[test]
    fn decodes_user_lists_and_skips_bad_entries() {
        let body = br#"[
            {"id": 1, "name": "Ada", "email": "ada@example.com"},
            {"id": "u2", "name": "  ", "email": "x@example.com"}
        ]"#;
        let users = decode_users(body).expect("users");
        let ids: Vec<_> = users.iter().map(|u| u.id().as_str()).collect();
        assert_eq!(ids, ["1"]);

        let single = br#"{"id": "u2", "name": "  ", "email": "x@example.com"}"#;
        assert!(matches!(decode_user(single), Err(StoreError::Decode { .. })));
    }

    #[test]
    fn reservations_written_off_the_quarter_hour_grid_still_load() {
        let long_purpose = "x".repeat(PURPOSE_MAX + 50);
        let body = serde_json::json!([
            {"id": "r1", "userId": "u1", "date": "2024-06-10",
             "startTime": "09:00", "endTime": "10:00", "purpose": "Planning"},
            {"id": "r2", "userId": "u2", "date": "2024-06-10",
             "startTime": "09:10", "endTime": "10:40", "purpose": long_purpose},
        ])
        .to_string();

        let reservations = decode_reservations(body.as_bytes()).expect("reservations");
        let slots: Vec<_> = reservations.iter().map(|r| r.slot().to_string()).collect();
        assert_eq!(slots, ["09:00-10:00", "09:10-10:40"]);
        assert_eq!(reservations[1].purpose().chars().count(), PURPOSE_MAX + 50);
    }

    #[test]
    fn unreadable_reservations_are_skipped_not_fatal() {
        let body = br#"[
            {"id": "r1", "userId": "u1", "date": "2024-06-10", "startTime": "09:00", "endTime": "10:00"},
            {"id": "r2", "userId": "u2", "date": "2024-06-10", "startTime": "9am", "endTime": "10:00"}
        ]"#;
        let reservations = decode_reservations(body).expect("reservations");
        let ids: Vec<_> = reservations.iter().map(|r| r.id().as_str()).collect();
        assert_eq!(ids, ["r1"]);
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        let error = decode_reservations(b"<html>").expect_err("not json");
        assert!(matches!(error, StoreError::Decode { .. }));
    }
}
