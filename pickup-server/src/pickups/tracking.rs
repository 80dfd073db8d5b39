//! Tracking ledger - append-only status history per queue number
//!
//! Write operations take the caller's transaction so that a status change
//! and its history row commit or abort together.

use super::manager::{ManagerError, ManagerResult};
use super::storage::{PickupStorage, StorageResult};
use redb::WriteTransaction;
use shared::pickup::{PickupStatus, TrackingEntry, TrackingView};

#[derive(Clone)]
pub struct TrackingLedger {
    storage: PickupStorage,
}

impl TrackingLedger {
    pub fn new(storage: PickupStorage) -> Self {
        Self { storage }
    }

    /// Create the entry for `queue_number` unless one exists.
    ///
    /// Returns the entry as it stands after the call.
    pub fn ensure_created(
        &self,
        txn: &WriteTransaction,
        pickup_id: &str,
        queue_number: &str,
        initial_status: PickupStatus,
        timestamp: i64,
    ) -> StorageResult<TrackingEntry> {
        if let Some(existing) = self
            .storage
            .get_tracking_by_queue_number_txn(txn, queue_number)?
        {
            return Ok(existing);
        }

        let entry = TrackingEntry::new(
            shared::util::new_id(),
            pickup_id.to_string(),
            queue_number.to_string(),
            initial_status,
            timestamp,
        );
        self.storage.insert_tracking(txn, &entry)?;
        tracing::debug!(queue_number = %queue_number, pickup_id = %pickup_id, "Tracking entry created");
        Ok(entry)
    }

    /// Append a history row; `TrackingNotFound` if no entry exists
    pub fn append(
        &self,
        txn: &WriteTransaction,
        queue_number: &str,
        status: PickupStatus,
        timestamp: i64,
    ) -> ManagerResult<TrackingEntry> {
        let mut entry = self
            .storage
            .get_tracking_by_queue_number_txn(txn, queue_number)?
            .ok_or_else(|| ManagerError::TrackingNotFound(queue_number.to_string()))?;
        entry.append(status, timestamp);
        self.storage.update_tracking(txn, &entry)?;
        Ok(entry)
    }

    /// Append only if an entry exists; returns whether a row was written
    pub fn append_if_exists(
        &self,
        txn: &WriteTransaction,
        queue_number: &str,
        status: PickupStatus,
        timestamp: i64,
    ) -> StorageResult<bool> {
        match self.storage.get_tracking_by_queue_number_txn(txn, queue_number)? {
            Some(mut entry) => {
                entry.append(status, timestamp);
                self.storage.update_tracking(txn, &entry)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Tracking view for a pickup.
    ///
    /// Distinguishes an unknown pickup from a pickup that has no history yet.
    pub fn lookup(&self, pickup_id: &str) -> ManagerResult<TrackingView> {
        let pickup = self
            .storage
            .get_pickup(pickup_id)?
            .ok_or_else(|| ManagerError::PickupNotFound(pickup_id.to_string()))?;

        let entry = match self.storage.get_tracking_by_pickup(&pickup.id)? {
            Some(entry) => Some(entry),
            None => self
                .storage
                .get_tracking_by_queue_number(&pickup.queue_number)?,
        };
        entry
            .map(|e| e.view())
            .ok_or_else(|| ManagerError::TrackingNotFound(pickup_id.to_string()))
    }

    pub fn lookup_by_queue_number(&self, queue_number: &str) -> ManagerResult<TrackingView> {
        self.storage
            .get_tracking_by_queue_number(queue_number)?
            .map(|e| e.view())
            .ok_or_else(|| ManagerError::TrackingNotFound(queue_number.to_string()))
    }
}
