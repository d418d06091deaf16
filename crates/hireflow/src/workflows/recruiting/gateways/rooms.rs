use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::recruiting::applications::domain::{ApplicationId, RoomPurpose};

/// Parameters for a room creation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomRequest {
    pub unique_name: String,
    pub metadata: BTreeMap<String, String>,
    pub participant_display_name: String,
}

/// Room handle plus the join token minted for the requested participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewRoom {
    pub room_id: String,
    pub room_name: String,
    pub join_token: String,
}

/// External real-time room service.
///
/// Creation is idempotent by name: asking for a name that already exists returns the existing
/// room with a fresh token for the participant instead of an error.
#[async_trait]
pub trait RoomProvisioner: Send + Sync {
    async fn create_room(&self, request: RoomRequest) -> Result<InterviewRoom, ProvisioningError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProvisioningError {
    #[error("room provider rejected request: {0}")]
    Rejected(String),
    #[error("room provider unavailable: {0}")]
    Unavailable(String),
}

static ROOM_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// `{purpose}-{application_id}-{unix_millis}-{seq}`.
///
/// The process-wide sequence keeps names distinct when two rooms for the same application are
/// requested within the same millisecond.
pub fn room_name(
    purpose: RoomPurpose,
    application_id: &ApplicationId,
    at: DateTime<Utc>,
) -> String {
    let seq = ROOM_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!(
        "{}-{}-{}-{seq}",
        purpose.label(),
        application_id,
        at.timestamp_millis()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_names_follow_scheme_and_never_repeat() {
        let id = ApplicationId("app-42".to_string());
        let at = Utc::now();
        let first = room_name(RoomPurpose::Approach, &id, at);
        let second = room_name(RoomPurpose::Approach, &id, at);

        let prefix = format!("approach-app-42-{}-", at.timestamp_millis());
        assert!(first.starts_with(&prefix), "unexpected name {first}");
        assert!(second.starts_with(&prefix));
        assert_ne!(first, second);
        assert!(room_name(RoomPurpose::Interview, &id, at).starts_with("interview-app-42-"));
    }
}
