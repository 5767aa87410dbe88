//! DTOs for the records store wire format.
//!
//! Responses are decoded into these shapes first and then mapped into
//! domain entities in one pass. Older store revisions issued numeric
//! identifiers, so every id field accepts a string or an integer and
//! normalises it to a string.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{MeetingRoom, MeetingRoomId, Reservation, ReservationDto, User, UserPatch};

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(super) enum RecordIdDto {
    Text(String),
    Number(i64),
}

impl RecordIdDto {
    fn into_string(self) -> String {
        match self {
            Self::Text(value) => value,
            Self::Number(value) => value.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct UserRecordDto {
    id: RecordIdDto,
    name: String,
    email: String,
}

impl UserRecordDto {
    pub(super) fn into_domain(self) -> Result<User, String> {
        let id = self.id.into_string();
        User::try_from_strings(id.clone(), self.name, self.email)
            .map_err(|err| format!("user {id}: {err}"))
    }
}

#[derive(Debug, Serialize)]
pub(super) struct UserWriteDto<'a> {
    id: &'a str,
    name: &'a str,
    email: &'a str,
}

impl<'a> From<&'a User> for UserWriteDto<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            id: user.id().as_str(),
            name: user.name().as_ref(),
            email: user.email().as_ref(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct UserPatchDto<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
}

impl<'a> From<&'a UserPatch> for UserPatchDto<'a> {
    fn from(patch: &'a UserPatch) -> Self {
        Self {
            name: patch.name.as_ref().map(AsRef::<str>::as_ref),
            email: patch.email.as_ref().map(AsRef::<str>::as_ref),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ReservationRecordDto {
    id: RecordIdDto,
    user_id: RecordIdDto,
    date: NaiveDate,
    start_time: String,
    end_time: String,
    #[serde(default)]
    purpose: String,
}

impl ReservationRecordDto {
    pub(super) fn into_domain(self) -> Result<Reservation, String> {
        let id = self.id.into_string();
        Reservation::from_stored(ReservationDto {
            id: id.clone(),
            user_id: self.user_id.into_string(),
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            purpose: self.purpose,
        })
        .map_err(|err| format!("reservation {id}: {err}"))
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct MeetingRoomRecordDto {
    id: RecordIdDto,
    name: String,
    #[serde(default)]
    capacity: u32,
    #[serde(default)]
    equipment: Vec<String>,
}

impl MeetingRoomRecordDto {
    pub(super) fn into_domain(self) -> Result<MeetingRoom, String> {
        let raw_id = self.id.into_string();
        let id = MeetingRoomId::new(raw_id.clone())
            .map_err(|err| format!("meeting room {raw_id}: {err}"))?;
        Ok(MeetingRoom {
            id,
            name: self.name,
            capacity: self.capacity,
            equipment: self.equipment,
        })
    }
}
