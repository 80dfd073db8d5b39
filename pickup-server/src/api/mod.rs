//! API routes
//!
//! - [`health`] - health check
//! - [`pickups`] - pickup lifecycle
//! - [`tracking`] - public tracking by queue number
//! - [`fees`] - fee quotes and overrides
//! - [`notifications`] - user notifications

pub mod fees;
pub mod health;
pub mod notifications;
pub mod pickups;
pub mod tracking;

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;
use crate::pickups::ManagerResult;
use crate::utils::{AppError, AppResult};

/// All routes, without state or middleware
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(pickups::router())
        .merge(tracking::router())
        .merge(fees::router())
        .merge(notifications::router())
}

/// Fully configured application, used by the server and by oneshot tests
pub fn build_app(state: ServerState) -> Router {
    build_router()
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Run synchronous storage work off the async executor
pub(crate) async fn run_blocking<T, F>(f: F) -> AppResult<T>
where
    F: FnOnce() -> ManagerResult<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result.map_err(AppError::from),
        Err(e) => {
            tracing::error!(error = %e, "Blocking task failed");
            Err(AppError::internal("internal error"))
        }
    }
}

/// JSON body extractor whose rejections are `AppError`s
///
/// A body that parses as JSON but does not fit the target type is a
/// validation failure; the offending path is reported as `field`.
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(json_rejection_error(rejection)),
        }
    }
}

const DATA_ERROR_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";

fn json_rejection_error(rejection: JsonRejection) -> AppError {
    let text = rejection.body_text();
    match rejection {
        JsonRejection::JsonDataError(_) => {
            let detail = text.strip_prefix(DATA_ERROR_PREFIX).unwrap_or(&text);
            let err = AppError::validation(detail);
            match detail.split_once(": ") {
                Some((path, _)) if path != "." && !path.contains(char::is_whitespace) => {
                    err.with_detail("field", path)
                }
                _ => err,
            }
        }
        _ => AppError::invalid_format(text),
    }
}
