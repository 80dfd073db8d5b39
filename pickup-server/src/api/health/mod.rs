//! Health check
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /health | GET | liveness plus storage check |

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// healthy | degraded
    status: &'static str,
    version: &'static str,
    environment: String,
    /// Last issued queue number, `None` if storage could not be read
    #[serde(skip_serializing_if = "Option::is_none")]
    last_queue_number: Option<u64>,
}

pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    let manager = state.manager.clone();
    let last = tokio::task::spawn_blocking(move || manager.last_queue_number()).await;

    let last_queue_number = match last {
        Ok(Ok(n)) => Some(n),
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Health check could not read storage");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "Health check task failed");
            None
        }
    };

    Json(HealthResponse {
        status: if last_queue_number.is_some() {
            "healthy"
        } else {
            "degraded"
        },
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
        last_queue_number,
    })
}
