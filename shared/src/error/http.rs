//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::PickupNotFound | Self::TrackingNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::InvalidStatusTransition
            | Self::ConcurrencyConflict
            | Self::PickupNotEditable => StatusCode::CONFLICT,

            // 500 Internal Server Error
            Self::InternalError
            | Self::DatabaseError
            | Self::StorageFull
            | Self::StorageCorrupted => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request
            Self::ValidationFailed | Self::InvalidFormat | Self::RequiredField => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}
