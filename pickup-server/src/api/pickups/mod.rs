//! Pickup API Module
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/pickups | POST | submit a pickup request |
//! | /api/pickups?userId=&status= | GET | a user's pickups, newest first |
//! | /api/pickups/{id} | GET | one pickup |
//! | /api/pickups/queue/{queueNumber} | GET | pickup by queue number |
//! | /api/pickups/{id}/status | POST | advance to the next status |
//! | /api/pickups/{id}/cancel | POST | cancel with a reason |
//! | /api/pickups/{id}/items/{itemId} | PUT | change an item quantity |
//! | /api/pickups/{id}/tracking | GET | status history |

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/pickups", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::submit).get(handler::list_for_user))
        .route("/queue/{queue_number}", get(handler::get_by_queue_number))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", post(handler::advance_status))
        .route("/{id}/cancel", post(handler::cancel))
        .route("/{id}/items/{item_id}", put(handler::update_item_quantity))
        .route("/{id}/tracking", get(handler::track))
}
