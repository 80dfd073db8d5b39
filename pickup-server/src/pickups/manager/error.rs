use super::super::pickup_date::PickupDateError;
use super::super::storage::StorageError;
use shared::error::{AppError, ErrorCode};
use shared::pickup::PickupStatus;
use thiserror::Error;

/// Manager errors
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error("Invalid {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },

    #[error("Invalid pick-up date: {0}")]
    InvalidDate(#[from] PickupDateError),

    #[error("Pickup not found: {0}")]
    PickupNotFound(String),

    #[error("Tracking data not found: {0}")]
    TrackingNotFound(String),

    #[error("Cannot change status from {from} to {to}")]
    InvalidTransition {
        pickup_id: String,
        from: PickupStatus,
        to: PickupStatus,
    },

    #[error("Queue number conflict: {0}")]
    QueueConflict(String),

    #[error("Tracking out of sync for {queue_number} (pickup {pickup_id})")]
    TrackingOutOfSync {
        pickup_id: String,
        queue_number: String,
    },

    #[error("Pickup {pickup_id} is {status} and can no longer be edited")]
    NotEditable {
        pickup_id: String,
        status: PickupStatus,
    },
}

pub type ManagerResult<T> = Result<T, ManagerError>;

/// Map a storage failure to an error code
fn classify_storage_error(e: &StorageError) -> ErrorCode {
    match e {
        StorageError::Serialization(_) => return ErrorCode::InternalError,
        StorageError::QueueNumberTaken(_) | StorageError::TrackingExists(_) => {
            return ErrorCode::ConcurrencyConflict;
        }
        _ => {}
    }

    // redb errors are classified by message
    let err_str = e.to_string().to_lowercase();

    if err_str.contains("no space") || err_str.contains("disk full") || err_str.contains("enospc")
    {
        return ErrorCode::StorageFull;
    }

    if err_str.contains("corrupt") || err_str.contains("invalid database") {
        return ErrorCode::StorageCorrupted;
    }

    ErrorCode::DatabaseError
}

impl From<ManagerError> for AppError {
    fn from(err: ManagerError) -> Self {
        match err {
            ManagerError::Storage(e) => {
                let code = classify_storage_error(&e);
                tracing::error!(error = %e, error_code = %code, "Storage error occurred");
                AppError::new(code)
            }
            ManagerError::MissingField(field) => AppError::required_field(field),
            ManagerError::Validation(msg) => AppError::validation(msg),
            ManagerError::InvalidField { field, message } => {
                AppError::validation(message).with_detail("field", field)
            }
            ManagerError::InvalidDate(e) => {
                AppError::invalid_format(e.to_string()).with_detail("field", "pickUpDate")
            }
            ManagerError::PickupNotFound(id) => AppError::pickup_not_found(id),
            ManagerError::TrackingNotFound(key) => AppError::tracking_not_found(key),
            ManagerError::InvalidTransition {
                pickup_id,
                from,
                to,
            } => AppError::invalid_transition(from.as_str(), to.as_str())
                .with_detail("pickupId", pickup_id),
            ManagerError::QueueConflict(queue_number) => {
                AppError::concurrency("Queue number allocation conflicted, retry the submission")
                    .with_detail("queueNumber", queue_number)
            }
            ManagerError::TrackingOutOfSync {
                pickup_id,
                queue_number,
            } => AppError::concurrency("Tracking data is out of sync with the pickup")
                .with_detail("pickupId", pickup_id)
                .with_detail("queueNumber", queue_number),
            ManagerError::NotEditable { pickup_id, status } => {
                AppError::not_editable(format!("Pickup is {} and can no longer be edited", status))
                    .with_detail("pickupId", pickup_id)
                    .with_detail("currentStatus", status.as_str())
            }
        }
    }
}
