//! Pickup request lifecycle
//!
//! - **storage**: redb persistence for pickups, tracking, fees and notifications
//! - **sequencer**: `ANTRIAN-NNN` queue number allocation
//! - **fees**: sub-district fee lookup
//! - **pickup_date**: localized long-date parsing
//! - **tracking**: append-only status history
//! - **notification**: best-effort user notifications
//! - **manager**: PickupManager, the entry point for every operation
//!
//! # Architecture
//!
//! ```text
//! HTTP handler → PickupManager → [redb write txn] → pickups + tracking
//!                      │
//!                      ├─ FeeCalculator (submit)
//!                      ├─ QueueSequencer (submit)
//!                      └─ NotificationSink (cancel) → mpsc → NotificationWorker
//! ```

pub mod fees;
pub mod manager;
pub mod notification;
pub mod pickup_date;
pub mod sequencer;
pub mod storage;
pub mod tracking;

pub use fees::FeeCalculator;
pub use manager::{ManagerError, ManagerResult, PickupManager, QuantityEditPolicy};
pub use notification::{NotificationService, NotificationSink, NotificationWorker};
pub use storage::{PickupStorage, StorageError, StorageResult};
pub use tracking::TrackingLedger;
