//! User-facing notification records

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    PickupCancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub pickup_id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub created_at: i64,
}

impl Notification {
    pub fn pickup_cancelled(
        id: String,
        user_id: String,
        pickup_id: String,
        queue_number: &str,
        reason: &str,
        created_at: i64,
    ) -> Self {
        Self {
            id,
            user_id,
            pickup_id,
            kind: NotificationKind::PickupCancelled,
            title: "Penjemputan dibatalkan".to_string(),
            message: format!(
                "Penjemputan {} dibatalkan. Alasan: {}",
                queue_number, reason
            ),
            created_at,
        }
    }
}
