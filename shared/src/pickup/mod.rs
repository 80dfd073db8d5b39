//! Pickup lifecycle types
//!
//! - [`PickupStatus`]: the state machine, independent of storage
//! - [`PickupRequest`]: the primary record
//! - [`TrackingEntry`]: append-only status history keyed by queue number
//! - [`Notification`]: records emitted to users

pub mod fee;
pub mod notification;
pub mod queue;
pub mod request;
pub mod status;
pub mod tracking;

pub use fee::{FeeOverride, FeeQuote};
pub use notification::{Notification, NotificationKind};
pub use queue::{format_queue_number, parse_queue_number, QUEUE_PREFIX};
pub use request::{
    Address, PickupFilter, PickupItem, PickupRequest, StatusResponse, SubmitPickupRequest,
    SubmitPickupResponse,
};
pub use status::{InvalidTransition, PickupStatus, UnknownStatus};
pub use tracking::{StatusChange, TrackingEntry, TrackingView};
