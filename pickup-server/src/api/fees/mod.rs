//! Fee API Module
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/fees | GET | default fee and override rows |
//! | /api/fees | PUT | add or replace an override |
//! | /api/fees/quote?subDistrict= | GET | fee for one sub-district |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/fees", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).put(handler::set_override))
        .route("/quote", get(handler::quote))
}
