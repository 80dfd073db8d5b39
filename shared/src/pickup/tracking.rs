//! Tracking ledger entry - append-only status history of one pickup

use super::status::PickupStatus;
use serde::{Deserialize, Serialize};

/// One history row
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    pub status: PickupStatus,
    /// Unix millis
    pub timestamp: i64,
}

/// Tracking entry
///
/// Created once, at the first transition away from `Pending`. Mutated only
/// through [`TrackingEntry::append`]; history is never truncated or reordered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TrackingEntry {
    pub id: String,
    /// Foreign key to the owning pickup
    pub pickup_id: String,
    pub queue_number: String,
    pub current_status: PickupStatus,
    pub history: Vec<StatusChange>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl TrackingEntry {
    pub fn new(
        id: String,
        pickup_id: String,
        queue_number: String,
        initial_status: PickupStatus,
        timestamp: i64,
    ) -> Self {
        Self {
            id,
            pickup_id,
            queue_number,
            current_status: initial_status,
            history: vec![StatusChange {
                status: initial_status,
                timestamp,
            }],
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    pub fn append(&mut self, status: PickupStatus, timestamp: i64) {
        self.history.push(StatusChange { status, timestamp });
        self.current_status = status;
        self.updated_at = timestamp;
    }

    pub fn view(&self) -> TrackingView {
        TrackingView {
            pickup_id: self.pickup_id.clone(),
            queue_number: self.queue_number.clone(),
            current_status: self.current_status,
            history: self.history.clone(),
        }
    }
}

/// Read model returned by "track my pickup"
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TrackingView {
    pub pickup_id: String,
    pub queue_number: String,
    pub current_status: PickupStatus,
    pub history: Vec<StatusChange>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entry_has_initial_row() {
        let entry = TrackingEntry::new(
            "t-1".into(),
            "p-1".into(),
            "ANTRIAN-001".into(),
            PickupStatus::Dijemput,
            1_000,
        );
        assert_eq!(entry.current_status, PickupStatus::Dijemput);
        assert_eq!(
            entry.history,
            vec![StatusChange {
                status: PickupStatus::Dijemput,
                timestamp: 1_000
            }]
        );
    }

    #[test]
    fn test_append_keeps_insertion_order() {
        let mut entry = TrackingEntry::new(
            "t-1".into(),
            "p-1".into(),
            "ANTRIAN-001".into(),
            PickupStatus::Dijemput,
            1_000,
        );
        entry.append(PickupStatus::Ditimbang, 2_000);
        entry.append(PickupStatus::Selesai, 3_000);

        let statuses: Vec<_> = entry.history.iter().map(|h| h.status).collect();
        assert_eq!(
            statuses,
            vec![
                PickupStatus::Dijemput,
                PickupStatus::Ditimbang,
                PickupStatus::Selesai
            ]
        );
        assert_eq!(entry.current_status, PickupStatus::Selesai);
        assert_eq!(entry.updated_at, 3_000);
        assert_eq!(entry.created_at, 1_000);
    }
}
