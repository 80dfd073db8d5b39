use crate::pickups::StorageError;
use crate::pickups::fees::FeeTableError;
use thiserror::Error;

/// Startup and serve errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Fee table error: {0}")]
    FeeTable(#[from] FeeTableError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
