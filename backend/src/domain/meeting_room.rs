//! The meeting room itself.
//!
//! There is a single room. Its record is read-only and only surfaced for
//! display; reservations do not reference it.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::record_id::define_record_id;

define_record_id! {
    /// Store-assigned meeting room identifier.
    MeetingRoomId
}

/// Room details as stored by the records service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeetingRoom {
    #[schema(value_type = String, example = "main")]
    pub id: MeetingRoomId,
    #[schema(example = "Boardroom")]
    pub name: String,
    #[schema(example = 8)]
    pub capacity: u32,
    #[serde(default)]
    #[schema(example = json!(["projector", "whiteboard"]))]
    pub equipment: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn decodes_room_without_equipment() {
        let room: MeetingRoom = serde_json::from_value(json!({
            "id": "main",
            "name": "Boardroom",
            "capacity": 8
        }))
        .expect("decode");
        assert_eq!(room.id.as_str(), "main");
        assert!(room.equipment.is_empty());
    }
}
