//! Queue number allocation
//!
//! The counter is read, incremented and written inside the caller's write
//! transaction, so a number is only consumed if that transaction commits.

use super::storage::{PickupStorage, StorageResult};
use redb::WriteTransaction;
use shared::pickup::format_queue_number;

#[derive(Clone)]
pub struct QueueSequencer {
    storage: PickupStorage,
}

impl QueueSequencer {
    pub fn new(storage: PickupStorage) -> Self {
        Self { storage }
    }

    /// Next queue number, `ANTRIAN-001` on an empty store
    pub fn next(&self, txn: &WriteTransaction) -> StorageResult<String> {
        let number = self.storage.next_queue_counter(txn)?;
        Ok(format_queue_number(number))
    }

    /// Last issued number without consuming one
    pub fn peek_last(&self) -> StorageResult<u64> {
        self.storage.current_queue_counter()
    }
}
