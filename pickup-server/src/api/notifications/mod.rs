//! User notifications
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/users/{userId}/notifications | GET | notifications, oldest first |

use axum::{
    Router,
    extract::{Path, State},
    routing::get,
};
use shared::pickup::Notification;

use crate::api::run_blocking;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult};

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/users/{user_id}/notifications", get(list_for_user))
}

pub async fn list_for_user(
    State(state): State<ServerState>,
    Path(user_id): Path<String>,
) -> AppResult<ApiResponse<Vec<Notification>>> {
    let notifications = state.notifications.clone();
    let listed = run_blocking(move || Ok(notifications.list_for_user(&user_id)?)).await?;
    Ok(ApiResponse::success(listed))
}
