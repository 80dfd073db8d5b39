//! Public tracking by queue number
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/tracking/{queueNumber} | GET | status history for a queue number |

use axum::{
    Router,
    extract::{Path, State},
    routing::get,
};
use shared::pickup::TrackingView;

use crate::api::run_blocking;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult};

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/tracking/{queue_number}", get(track_by_queue_number))
}

pub async fn track_by_queue_number(
    State(state): State<ServerState>,
    Path(queue_number): Path<String>,
) -> AppResult<ApiResponse<TrackingView>> {
    let manager = state.manager.clone();
    let view = run_blocking(move || manager.track_by_queue_number(&queue_number)).await?;
    Ok(ApiResponse::success(view))
}
