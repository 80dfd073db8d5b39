//! Shared types for the pickup platform
//!
//! Domain types and the unified error system used by the server and by any
//! client that talks to it.

pub mod error;
pub mod pickup;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};
