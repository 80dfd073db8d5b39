//! Pickup API Handlers

use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::pickup::{
    PickupFilter, PickupRequest, PickupStatus, StatusResponse, SubmitPickupRequest,
    SubmitPickupResponse, TrackingView,
};

use crate::api::{ApiJson, run_blocking};
use crate::core::ServerState;
use crate::pickups::ManagerError;
use crate::utils::{ApiResponse, AppError, AppResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AdvanceStatusBody {
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CancelBody {
    #[serde(default)]
    pub reason: Option<String>,
}

/// Raw quantity, checked after the pickup is found
#[derive(Debug, Deserialize)]
pub struct QuantityBody {
    #[serde(default)]
    pub quantity: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuantityResponse {
    /// false when the item is not on the pickup
    pub success: bool,
}

fn parse_status(raw: &str) -> AppResult<PickupStatus> {
    raw.parse::<PickupStatus>()
        .map_err(|e| AppError::invalid_format(e.to_string()).with_detail("field", "status"))
}

/// Submit a pickup request
pub async fn submit(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<SubmitPickupRequest>,
) -> AppResult<ApiResponse<SubmitPickupResponse>> {
    let manager = state.manager.clone();
    let pickup = run_blocking(move || manager.submit(payload)).await?;
    Ok(ApiResponse::success(SubmitPickupResponse {
        queue_number: pickup.queue_number,
        pickup_id: pickup.id,
    }))
}

/// List a user's pickups
pub async fn list_for_user(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<ApiResponse<Vec<PickupRequest>>> {
    let user_id = query
        .user_id
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::required_field("userId"))?;
    let filter = PickupFilter {
        status: query.status.as_deref().map(parse_status).transpose()?,
    };

    let manager = state.manager.clone();
    let pickups = run_blocking(move || manager.list_for_user(&user_id, &filter)).await?;
    Ok(ApiResponse::success(pickups))
}

/// Get pickup by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<PickupRequest>> {
    let manager = state.manager.clone();
    let pickup = run_blocking(move || manager.get_pickup(&id)).await?;
    Ok(ApiResponse::success(pickup))
}

/// Get pickup by queue number
pub async fn get_by_queue_number(
    State(state): State<ServerState>,
    Path(queue_number): Path<String>,
) -> AppResult<ApiResponse<PickupRequest>> {
    let manager = state.manager.clone();
    let pickup = run_blocking(move || manager.get_by_queue_number(&queue_number)).await?;
    Ok(ApiResponse::success(pickup))
}

/// Advance a pickup to its next status
pub async fn advance_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<AdvanceStatusBody>,
) -> AppResult<ApiResponse<StatusResponse>> {
    let raw = body
        .status
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::required_field("status"))?;
    let target = parse_status(&raw)?;

    let manager = state.manager.clone();
    let pickup = run_blocking(move || manager.advance_status(&id, target)).await?;
    Ok(ApiResponse::success(StatusResponse {
        pickup_id: pickup.id,
        status: pickup.status,
    }))
}

/// Cancel a pickup
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<CancelBody>,
) -> AppResult<ApiResponse<StatusResponse>> {
    let reason = body.reason.unwrap_or_default();

    let manager = state.manager.clone();
    let pickup = run_blocking(move || manager.cancel(&id, &reason)).await?;
    Ok(ApiResponse::success(StatusResponse {
        pickup_id: pickup.id,
        status: pickup.status,
    }))
}

/// Change one item's quantity
pub async fn update_item_quantity(
    State(state): State<ServerState>,
    Path((id, item_id)): Path<(String, String)>,
    ApiJson(body): ApiJson<QuantityBody>,
) -> AppResult<ApiResponse<QuantityResponse>> {
    let quantity = body.quantity.as_ref().and_then(Value::as_f64);

    let manager = state.manager.clone();
    let applied = run_blocking(move || match quantity {
        Some(quantity) => manager.update_item_quantity(&id, &item_id, quantity),
        None => {
            manager.get_pickup(&id)?;
            Err(ManagerError::InvalidField {
                field: "quantity",
                message: "quantity must be a number".to_string(),
            })
        }
    })
    .await?;
    Ok(ApiResponse::success(QuantityResponse { success: applied }))
}

/// Status history of a pickup
pub async fn track(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<TrackingView>> {
    let manager = state.manager.clone();
    let view = run_blocking(move || manager.track(&id)).await?;
    Ok(ApiResponse::success(view))
}
