//! redb-based storage layer for pickup requests
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `pickups` | `pickup_id` | `PickupRequest` | Primary records |
//! | `pickup_queue_index` | `queue_number` | `pickup_id` | Queue number uniqueness + lookup |
//! | `pickup_user_index` | `(user_id, pickup_id)` | `()` | Per-user listing |
//! | `tracking` | `tracking_id` | `TrackingEntry` | Status history ledger |
//! | `tracking_queue_index` | `queue_number` | `tracking_id` | Tracking by queue number |
//! | `tracking_pickup_index` | `pickup_id` | `tracking_id` | Tracking by pickup |
//! | `sequence_counter` | `&str` | `u64` | Queue counter and other sequences |
//! | `fee_overrides` | `seq` | `FeeOverride` | Per-sub-district fees, insertion ordered |
//! | `notifications` | `(user_id, seq)` | `Notification` | User notifications |
//!
//! Every mutation of a pickup happens inside a single write transaction that
//! also covers its index rows and tracking entry. redb admits one writer at a
//! time, so read-modify-write sequences inside a transaction cannot interleave.

use redb::{
    Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition,
    WriteTransaction,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::pickup::{
    FeeOverride, Notification, PickupRequest, TrackingEntry, parse_queue_number,
};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

const PICKUPS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("pickups");

const PICKUP_QUEUE_INDEX: TableDefinition<&str, &str> = TableDefinition::new("pickup_queue_index");

const PICKUP_USER_INDEX: TableDefinition<(&str, &str), ()> =
    TableDefinition::new("pickup_user_index");

const TRACKING_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("tracking");

const TRACKING_QUEUE_INDEX: TableDefinition<&str, &str> =
    TableDefinition::new("tracking_queue_index");

const TRACKING_PICKUP_INDEX: TableDefinition<&str, &str> =
    TableDefinition::new("tracking_pickup_index");

/// Table for sequence counters: key = counter name, value = last issued value
const SEQUENCE_TABLE: TableDefinition<&str, u64> = TableDefinition::new("sequence_counter");

const FEE_OVERRIDES_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("fee_overrides");

const NOTIFICATIONS_TABLE: TableDefinition<(&str, u64), &[u8]> =
    TableDefinition::new("notifications");

const QUEUE_COUNTER_KEY: &str = "queue_number";
const FEE_SEQUENCE_KEY: &str = "fee_override";
const NOTIFICATION_SEQUENCE_KEY: &str = "notification";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Queue number already taken: {0}")]
    QueueNumberTaken(String),

    #[error("Tracking entry already exists for queue number {0}")]
    TrackingExists(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

fn encode<T: Serialize>(value: &T) -> StorageResult<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> StorageResult<T> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Pickup storage backed by redb
#[derive(Clone)]
pub struct PickupStorage {
    db: Arc<Database>,
}

impl std::fmt::Debug for PickupStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PickupStorage").finish_non_exhaustive()
    }
}

impl PickupStorage {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        let storage = Self { db: Arc::new(db) };
        storage.init_tables()?;
        storage.reconcile_queue_counter()?;
        Ok(storage)
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        let storage = Self { db: Arc::new(db) };
        storage.init_tables()?;
        Ok(storage)
    }

    fn init_tables(&self) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let _ = write_txn.open_table(PICKUPS_TABLE)?;
            let _ = write_txn.open_table(PICKUP_QUEUE_INDEX)?;
            let _ = write_txn.open_table(PICKUP_USER_INDEX)?;
            let _ = write_txn.open_table(TRACKING_TABLE)?;
            let _ = write_txn.open_table(TRACKING_QUEUE_INDEX)?;
            let _ = write_txn.open_table(TRACKING_PICKUP_INDEX)?;
            let _ = write_txn.open_table(FEE_OVERRIDES_TABLE)?;
            let _ = write_txn.open_table(NOTIFICATIONS_TABLE)?;

            let mut seq_table = write_txn.open_table(SEQUENCE_TABLE)?;
            if seq_table.get(QUEUE_COUNTER_KEY)?.is_none() {
                seq_table.insert(QUEUE_COUNTER_KEY, 0u64)?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Begin a write transaction
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    // ========== Sequence Operations ==========

    fn increment_counter(txn: &WriteTransaction, key: &str) -> StorageResult<u64> {
        let mut table = txn.open_table(SEQUENCE_TABLE)?;
        let current = table.get(key)?.map(|guard| guard.value()).unwrap_or(0);
        let next = current + 1;
        table.insert(key, next)?;
        Ok(next)
    }

    /// Increment and return the queue counter (within transaction)
    pub fn next_queue_counter(&self, txn: &WriteTransaction) -> StorageResult<u64> {
        Self::increment_counter(txn, QUEUE_COUNTER_KEY)
    }

    /// Current queue counter (read-only)
    pub fn current_queue_counter(&self) -> StorageResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SEQUENCE_TABLE)?;
        Ok(table
            .get(QUEUE_COUNTER_KEY)?
            .map(|guard| guard.value())
            .unwrap_or(0))
    }

    /// Raise the queue counter to the highest number already issued.
    ///
    /// Guards against a counter that was lost or rolled back while pickups
    /// referencing later numbers survived. Never lowers the counter.
    pub fn reconcile_queue_counter(&self) -> StorageResult<u64> {
        let txn = self.db.begin_write()?;
        let reconciled = {
            let index = txn.open_table(PICKUP_QUEUE_INDEX)?;
            let mut highest = 0u64;
            for result in index.iter()? {
                let (key, _) = result?;
                if let Some(n) = parse_queue_number(key.value()) {
                    highest = highest.max(n);
                }
            }

            let mut seq_table = txn.open_table(SEQUENCE_TABLE)?;
            let current = seq_table
                .get(QUEUE_COUNTER_KEY)?
                .map(|guard| guard.value())
                .unwrap_or(0);
            if highest > current {
                tracing::warn!(
                    current,
                    highest,
                    "Queue counter behind issued queue numbers, raising"
                );
                seq_table.insert(QUEUE_COUNTER_KEY, highest)?;
                highest
            } else {
                current
            }
        };
        txn.commit()?;
        Ok(reconciled)
    }

    // ========== Pickup Operations ==========

    /// Claim a queue number for a pickup (within transaction)
    pub fn reserve_queue_number(
        &self,
        txn: &WriteTransaction,
        queue_number: &str,
        pickup_id: &str,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(PICKUP_QUEUE_INDEX)?;
        if table.get(queue_number)?.is_some() {
            return Err(StorageError::QueueNumberTaken(queue_number.to_string()));
        }
        table.insert(queue_number, pickup_id)?;
        Ok(())
    }

    /// Insert or replace a pickup record and its user index row (within transaction)
    pub fn store_pickup(&self, txn: &WriteTransaction, pickup: &PickupRequest) -> StorageResult<()> {
        let value = encode(pickup)?;
        {
            let mut table = txn.open_table(PICKUPS_TABLE)?;
            table.insert(pickup.id.as_str(), value.as_slice())?;
        }
        {
            let mut index = txn.open_table(PICKUP_USER_INDEX)?;
            index.insert((pickup.user_id.as_str(), pickup.id.as_str()), ())?;
        }
        Ok(())
    }

    /// Get a pickup (within transaction)
    pub fn get_pickup_txn(
        &self,
        txn: &WriteTransaction,
        pickup_id: &str,
    ) -> StorageResult<Option<PickupRequest>> {
        let table = txn.open_table(PICKUPS_TABLE)?;
        match table.get(pickup_id)? {
            Some(value) => Ok(Some(decode(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn get_pickup(&self, pickup_id: &str) -> StorageResult<Option<PickupRequest>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PICKUPS_TABLE)?;
        match table.get(pickup_id)? {
            Some(value) => Ok(Some(decode(value.value())?)),
            None => Ok(None),
        }
    }

    /// Resolve a queue number to its pickup id
    pub fn find_pickup_id_by_queue_number(&self, queue_number: &str) -> StorageResult<Option<String>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PICKUP_QUEUE_INDEX)?;
        Ok(table.get(queue_number)?.map(|guard| guard.value().to_string()))
    }

    /// All pickups owned by a user, newest first
    pub fn list_pickups_for_user(&self, user_id: &str) -> StorageResult<Vec<PickupRequest>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(PICKUP_USER_INDEX)?;
        let table = read_txn.open_table(PICKUPS_TABLE)?;

        let mut pickups = Vec::new();
        for result in index.range((user_id, "")..)? {
            let (key, _) = result?;
            let (owner, pickup_id) = key.value();
            if owner != user_id {
                break;
            }
            if let Some(value) = table.get(pickup_id)? {
                pickups.push(decode::<PickupRequest>(value.value())?);
            }
        }

        // Same-millisecond submissions fall back to queue order
        pickups.sort_by(|a, b| {
            b.created_at.cmp(&a.created_at).then_with(|| {
                parse_queue_number(&b.queue_number).cmp(&parse_queue_number(&a.queue_number))
            })
        });
        Ok(pickups)
    }

    pub fn count_pickups(&self) -> StorageResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PICKUPS_TABLE)?;
        Ok(table.len()?)
    }

    // ========== Tracking Operations ==========

    /// Insert a new tracking entry and its index rows (within transaction).
    ///
    /// Fails with [`StorageError::TrackingExists`] if the queue number
    /// already has an entry.
    pub fn insert_tracking(&self, txn: &WriteTransaction, entry: &TrackingEntry) -> StorageResult<()> {
        {
            let mut queue_index = txn.open_table(TRACKING_QUEUE_INDEX)?;
            if queue_index.get(entry.queue_number.as_str())?.is_some() {
                return Err(StorageError::TrackingExists(entry.queue_number.clone()));
            }
            queue_index.insert(entry.queue_number.as_str(), entry.id.as_str())?;
        }
        {
            let mut pickup_index = txn.open_table(TRACKING_PICKUP_INDEX)?;
            pickup_index.insert(entry.pickup_id.as_str(), entry.id.as_str())?;
        }
        self.update_tracking(txn, entry)
    }

    /// Overwrite an existing tracking entry (within transaction)
    pub fn update_tracking(&self, txn: &WriteTransaction, entry: &TrackingEntry) -> StorageResult<()> {
        let value = encode(entry)?;
        let mut table = txn.open_table(TRACKING_TABLE)?;
        table.insert(entry.id.as_str(), value.as_slice())?;
        Ok(())
    }

    /// Tracking entry for a queue number (within transaction)
    pub fn get_tracking_by_queue_number_txn(
        &self,
        txn: &WriteTransaction,
        queue_number: &str,
    ) -> StorageResult<Option<TrackingEntry>> {
        let queue_index = txn.open_table(TRACKING_QUEUE_INDEX)?;
        let Some(tracking_id) = queue_index.get(queue_number)?.map(|g| g.value().to_string())
        else {
            return Ok(None);
        };
        let table = txn.open_table(TRACKING_TABLE)?;
        match table.get(tracking_id.as_str())? {
            Some(value) => Ok(Some(decode(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn get_tracking_by_queue_number(&self, queue_number: &str) -> StorageResult<Option<TrackingEntry>> {
        let read_txn = self.db.begin_read()?;
        let queue_index = read_txn.open_table(TRACKING_QUEUE_INDEX)?;
        let Some(tracking_id) = queue_index.get(queue_number)?.map(|g| g.value().to_string())
        else {
            return Ok(None);
        };
        let table = read_txn.open_table(TRACKING_TABLE)?;
        match table.get(tracking_id.as_str())? {
            Some(value) => Ok(Some(decode(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn get_tracking_by_pickup(&self, pickup_id: &str) -> StorageResult<Option<TrackingEntry>> {
        let read_txn = self.db.begin_read()?;
        let pickup_index = read_txn.open_table(TRACKING_PICKUP_INDEX)?;
        let Some(tracking_id) = pickup_index.get(pickup_id)?.map(|g| g.value().to_string()) else {
            return Ok(None);
        };
        let table = read_txn.open_table(TRACKING_TABLE)?;
        match table.get(tracking_id.as_str())? {
            Some(value) => Ok(Some(decode(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn count_tracking(&self) -> StorageResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TRACKING_TABLE)?;
        Ok(table.len()?)
    }

    // ========== Fee Override Operations ==========

    /// All fee overrides in insertion order
    pub fn list_fee_overrides(&self) -> StorageResult<Vec<FeeOverride>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(FEE_OVERRIDES_TABLE)?;

        let mut overrides = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            overrides.push(decode(value.value())?);
        }
        Ok(overrides)
    }

    /// Replace the first row whose key matches `same_key`, or append a new row.
    pub fn upsert_fee_override(
        &self,
        row: &FeeOverride,
        same_key: impl Fn(&FeeOverride) -> bool,
    ) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(FEE_OVERRIDES_TABLE)?;
            let mut existing = None;
            for result in table.iter()? {
                let (key, value) = result?;
                let current: FeeOverride = decode(value.value())?;
                if same_key(&current) {
                    existing = Some(key.value());
                    break;
                }
            }

            let seq = match existing {
                Some(seq) => seq,
                None => Self::increment_counter(&txn, FEE_SEQUENCE_KEY)?,
            };
            let value = encode(row)?;
            table.insert(seq, value.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Seed overrides into an empty table; returns how many rows were written
    pub fn seed_fee_overrides(&self, rows: &[FeeOverride]) -> StorageResult<usize> {
        let txn = self.db.begin_write()?;
        let written = {
            let mut table = txn.open_table(FEE_OVERRIDES_TABLE)?;
            if !table.is_empty()? {
                0
            } else {
                for row in rows {
                    let seq = Self::increment_counter(&txn, FEE_SEQUENCE_KEY)?;
                    let value = encode(row)?;
                    table.insert(seq, value.as_slice())?;
                }
                rows.len()
            }
        };
        txn.commit()?;
        Ok(written)
    }

    // ========== Notification Operations ==========

    pub fn append_notification(&self, notification: &Notification) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let seq = Self::increment_counter(&txn, NOTIFICATION_SEQUENCE_KEY)?;
            let mut table = txn.open_table(NOTIFICATIONS_TABLE)?;
            let value = encode(notification)?;
            table.insert((notification.user_id.as_str(), seq), value.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Notifications for a user, oldest first
    pub fn list_notifications(&self, user_id: &str) -> StorageResult<Vec<Notification>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(NOTIFICATIONS_TABLE)?;

        let mut notifications = Vec::new();
        for result in table.range((user_id, 0u64)..=(user_id, u64::MAX))? {
            let (_key, value) = result?;
            notifications.push(decode(value.value())?);
        }
        Ok(notifications)
    }
}
