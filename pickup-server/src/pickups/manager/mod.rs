//! PickupManager - owns the pickup lifecycle
//!
//! # Flow
//!
//! ```text
//! submit()               -> validate -> fee -> [txn: queue number, record] -> Pending
//! advance_status(id, s)  -> [txn: re-read, transition, record, tracking create/append]
//! cancel(id, reason)     -> [txn: re-read, cancel, record, tracking append if any] -> notify
//! update_item_quantity() -> [txn: re-read, policy, item quantity]
//! ```
//!
//! Every write reads the current record inside its own redb write
//! transaction. redb serializes writers, so two requests racing on the same
//! pickup observe each other's committed state.

mod error;

#[cfg(test)]
mod tests;

pub use error::{ManagerError, ManagerResult};

use super::fees::FeeCalculator;
use super::notification::NotificationSink;
use super::pickup_date::parse_pickup_date;
use super::sequencer::QueueSequencer;
use super::storage::{PickupStorage, StorageError};
use super::tracking::TrackingLedger;
use chrono_tz::Tz;
use shared::pickup::{
    Address, Notification, PickupFilter, PickupItem, PickupRequest, PickupStatus,
    SubmitPickupRequest, TrackingView,
};
use std::str::FromStr;
use std::sync::Arc;

/// Whether item quantities may change once a pickup is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuantityEditPolicy {
    /// Edits are accepted in every status
    #[default]
    AllowAny,
    /// Edits are refused once the pickup is `Selesai` or `Dibatalkan`
    RejectTerminal,
}

impl FromStr for QuantityEditPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "allow_any" | "allow-any" | "any" => Ok(Self::AllowAny),
            "reject_terminal" | "reject-terminal" | "terminal" => Ok(Self::RejectTerminal),
            other => Err(format!("unknown quantity edit policy: {}", other)),
        }
    }
}

/// Validated submission fields
struct SubmitInput {
    user_id: String,
    address: Address,
    items: Vec<PickupItem>,
    photos: Vec<String>,
    pick_up_date: i64,
}

fn validate_quantity(quantity: f64) -> ManagerResult<()> {
    if !quantity.is_finite() {
        return Err(ManagerError::InvalidField {
            field: "quantity",
            message: "quantity must be a finite number".to_string(),
        });
    }
    if quantity < 0.0 {
        return Err(ManagerError::InvalidField {
            field: "quantity",
            message: "quantity must not be negative".to_string(),
        });
    }
    Ok(())
}

pub struct PickupManager {
    storage: PickupStorage,
    sequencer: QueueSequencer,
    tracking: TrackingLedger,
    fees: Arc<FeeCalculator>,
    notifier: Arc<dyn NotificationSink>,
    tz: Tz,
    quantity_policy: QuantityEditPolicy,
}

impl std::fmt::Debug for PickupManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PickupManager")
            .field("tz", &self.tz)
            .field("quantity_policy", &self.quantity_policy)
            .finish_non_exhaustive()
    }
}

impl PickupManager {
    pub fn new(
        storage: PickupStorage,
        fees: Arc<FeeCalculator>,
        notifier: Arc<dyn NotificationSink>,
        tz: Tz,
    ) -> Self {
        Self {
            sequencer: QueueSequencer::new(storage.clone()),
            tracking: TrackingLedger::new(storage.clone()),
            storage,
            fees,
            notifier,
            tz,
            quantity_policy: QuantityEditPolicy::default(),
        }
    }

    pub fn with_quantity_policy(mut self, policy: QuantityEditPolicy) -> Self {
        self.quantity_policy = policy;
        self
    }

    #[cfg(test)]
    pub(crate) fn storage(&self) -> &PickupStorage {
        &self.storage
    }

    /// Last issued queue number, 0 before the first submission
    pub fn last_queue_number(&self) -> ManagerResult<u64> {
        Ok(self.sequencer.peek_last()?)
    }

    // ========== Submission ==========

    fn validate_submission(&self, request: SubmitPickupRequest) -> ManagerResult<SubmitInput> {
        let user_id = request
            .user_id
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .ok_or(ManagerError::MissingField("userId"))?;

        let address = request.address.ok_or(ManagerError::MissingField("address"))?;
        if address.sub_district.trim().is_empty() {
            return Err(ManagerError::MissingField("address.subDistrict"));
        }

        let items = request.items.ok_or(ManagerError::MissingField("items"))?;
        if items.is_empty() {
            return Err(ManagerError::Validation(
                "at least one item is required".to_string(),
            ));
        }
        for item in &items {
            if item.id.trim().is_empty() {
                return Err(ManagerError::Validation("item id must not be blank".to_string()));
            }
            validate_quantity(item.quantity)?;
        }

        let photos: Vec<String> = request
            .photos
            .unwrap_or_default()
            .into_iter()
            .filter(|p| !p.trim().is_empty())
            .collect();
        if photos.is_empty() {
            return Err(ManagerError::Validation(
                "at least one photo is required".to_string(),
            ));
        }

        let raw_date = request
            .pick_up_date
            .ok_or(ManagerError::MissingField("pickUpDate"))?;
        let pick_up_date = parse_pickup_date(&raw_date, self.tz)?;

        Ok(SubmitInput {
            user_id,
            address,
            items,
            photos,
            pick_up_date,
        })
    }

    /// Submit a new pickup request.
    ///
    /// Validation happens before any queue number is allocated.
    pub fn submit(&self, request: SubmitPickupRequest) -> ManagerResult<PickupRequest> {
        let input = self.validate_submission(request)?;
        let fee = self.fees.fee_for(&input.address.sub_district);

        let txn = self.storage.begin_write()?;
        let queue_number = self.sequencer.next(&txn)?;
        let pickup_id = shared::util::new_id();

        if let Err(e) = self
            .storage
            .reserve_queue_number(&txn, &queue_number, &pickup_id)
        {
            return Err(match e {
                StorageError::QueueNumberTaken(q) => {
                    tracing::error!(queue_number = %q, "Queue number already issued, counter out of step");
                    ManagerError::QueueConflict(q)
                }
                other => other.into(),
            });
        }

        let now = shared::util::now_millis();
        let pickup = PickupRequest {
            id: pickup_id,
            user_id: input.user_id,
            queue_number,
            address: input.address,
            items: input.items,
            photos: input.photos,
            pick_up_date: input.pick_up_date,
            pick_up_fee: fee,
            status: PickupStatus::Pending,
            cancel_reason: None,
            created_at: now,
            updated_at: now,
        };
        self.storage.store_pickup(&txn, &pickup)?;
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(
            pickup_id = %pickup.id,
            queue_number = %pickup.queue_number,
            user_id = %pickup.user_id,
            fee = pickup.pick_up_fee,
            "Pickup submitted"
        );
        Ok(pickup)
    }

    // ========== Queries ==========

    pub fn get_pickup(&self, pickup_id: &str) -> ManagerResult<PickupRequest> {
        self.storage
            .get_pickup(pickup_id)?
            .ok_or_else(|| ManagerError::PickupNotFound(pickup_id.to_string()))
    }

    pub fn get_by_queue_number(&self, queue_number: &str) -> ManagerResult<PickupRequest> {
        let pickup_id = self
            .storage
            .find_pickup_id_by_queue_number(queue_number.trim())?
            .ok_or_else(|| ManagerError::PickupNotFound(queue_number.to_string()))?;
        self.get_pickup(&pickup_id)
    }

    /// A user's pickups, newest first
    pub fn list_for_user(
        &self,
        user_id: &str,
        filter: &PickupFilter,
    ) -> ManagerResult<Vec<PickupRequest>> {
        let pickups = self.storage.list_pickups_for_user(user_id)?;
        Ok(pickups.into_iter().filter(|p| filter.matches(p)).collect())
    }

    pub fn track(&self, pickup_id: &str) -> ManagerResult<TrackingView> {
        self.tracking.lookup(pickup_id)
    }

    pub fn track_by_queue_number(&self, queue_number: &str) -> ManagerResult<TrackingView> {
        self.tracking.lookup_by_queue_number(queue_number.trim())
    }

    // ========== Status Transitions ==========

    /// Move a pickup to the next status in the forward table.
    ///
    /// The first move away from `Pending` creates the tracking entry; later
    /// moves append to it. Both happen in the transaction that writes the
    /// new status.
    pub fn advance_status(
        &self,
        pickup_id: &str,
        target: PickupStatus,
    ) -> ManagerResult<PickupRequest> {
        let txn = self.storage.begin_write()?;
        let mut pickup = self
            .storage
            .get_pickup_txn(&txn, pickup_id)?
            .ok_or_else(|| ManagerError::PickupNotFound(pickup_id.to_string()))?;

        let from = pickup.status;
        PickupStatus::transition(from, target).map_err(|e| ManagerError::InvalidTransition {
            pickup_id: pickup_id.to_string(),
            from: e.from,
            to: e.to,
        })?;

        let now = shared::util::now_millis();
        pickup.status = target;
        pickup.updated_at = now;
        self.storage.store_pickup(&txn, &pickup)?;

        if from == PickupStatus::Pending {
            self.tracking
                .ensure_created(&txn, &pickup.id, &pickup.queue_number, target, now)?;
        } else {
            match self.tracking.append(&txn, &pickup.queue_number, target, now) {
                Ok(_) => {}
                Err(ManagerError::TrackingNotFound(_)) => {
                    tracing::error!(
                        pickup_id = %pickup.id,
                        queue_number = %pickup.queue_number,
                        from = %from,
                        to = %target,
                        "Tracking entry missing for a pickup past Pending, aborting transition"
                    );
                    if let Err(e) = txn.abort() {
                        tracing::warn!(error = %e, "Failed to abort transaction");
                    }
                    return Err(ManagerError::TrackingOutOfSync {
                        pickup_id: pickup.id,
                        queue_number: pickup.queue_number,
                    });
                }
                Err(e) => return Err(e),
            }
        }

        txn.commit().map_err(StorageError::from)?;
        tracing::info!(
            pickup_id = %pickup.id,
            queue_number = %pickup.queue_number,
            from = %from,
            to = %target,
            "Pickup status changed"
        );
        Ok(pickup)
    }

    // ========== Cancellation ==========

    /// Cancel a non-terminal pickup.
    ///
    /// The owning user is notified after the commit; a failed notification
    /// is logged and does not affect the result.
    pub fn cancel(&self, pickup_id: &str, reason: &str) -> ManagerResult<PickupRequest> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(ManagerError::MissingField("reason"));
        }

        let txn = self.storage.begin_write()?;
        let mut pickup = self
            .storage
            .get_pickup_txn(&txn, pickup_id)?
            .ok_or_else(|| ManagerError::PickupNotFound(pickup_id.to_string()))?;

        let from = pickup.status;
        let target = PickupStatus::cancel(from).map_err(|e| ManagerError::InvalidTransition {
            pickup_id: pickup_id.to_string(),
            from: e.from,
            to: e.to,
        })?;

        let now = shared::util::now_millis();
        pickup.status = target;
        pickup.cancel_reason = Some(reason.to_string());
        pickup.updated_at = now;
        self.storage.store_pickup(&txn, &pickup)?;

        let tracked = self
            .tracking
            .append_if_exists(&txn, &pickup.queue_number, target, now)?;
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(
            pickup_id = %pickup.id,
            queue_number = %pickup.queue_number,
            from = %from,
            tracked,
            "Pickup cancelled"
        );

        let notification = Notification::pickup_cancelled(
            shared::util::new_id(),
            pickup.user_id.clone(),
            pickup.id.clone(),
            &pickup.queue_number,
            reason,
            now,
        );
        if let Err(e) = self.notifier.emit(notification) {
            tracing::warn!(
                pickup_id = %pickup.id,
                user_id = %pickup.user_id,
                error = %e,
                "Failed to emit cancellation notification"
            );
        }

        Ok(pickup)
    }

    // ========== Item Quantity ==========

    /// Replace one item's quantity.
    ///
    /// An unknown pickup is reported before a bad quantity.
    /// Returns `false` without writing when `item_id` is not on the pickup.
    pub fn update_item_quantity(
        &self,
        pickup_id: &str,
        item_id: &str,
        quantity: f64,
    ) -> ManagerResult<bool> {
        let txn = self.storage.begin_write()?;
        let mut pickup = self
            .storage
            .get_pickup_txn(&txn, pickup_id)?
            .ok_or_else(|| ManagerError::PickupNotFound(pickup_id.to_string()))?;
        validate_quantity(quantity)?;

        if self.quantity_policy == QuantityEditPolicy::RejectTerminal && pickup.is_terminal() {
            return Err(ManagerError::NotEditable {
                pickup_id: pickup_id.to_string(),
                status: pickup.status,
            });
        }

        let Some(item) = pickup.find_item_mut(item_id) else {
            tracing::debug!(pickup_id = %pickup_id, item_id = %item_id, "Item not on pickup, nothing to update");
            return Ok(false);
        };
        item.quantity = quantity;
        pickup.updated_at = shared::util::now_millis();

        self.storage.store_pickup(&txn, &pickup)?;
        txn.commit().map_err(StorageError::from)?;

        tracing::debug!(pickup_id = %pickup_id, item_id = %item_id, quantity, "Item quantity updated");
        Ok(true)
    }
}
