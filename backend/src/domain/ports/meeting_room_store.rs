//! Port for the read-only meeting room record.

use async_trait::async_trait;

use crate::domain::MeetingRoom;

use super::StoreError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MeetingRoomStore: Send + Sync {
    /// Fetch the room details.
    async fn meeting_room(&self) -> Result<MeetingRoom, StoreError>;
}
