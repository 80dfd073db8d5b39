//! Fee API Handlers

use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};
use shared::pickup::{FeeOverride, FeeQuote};

use crate::api::{ApiJson, run_blocking};
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppError, AppResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteQuery {
    #[serde(default)]
    pub sub_district: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetOverrideBody {
    #[serde(default)]
    pub sub_district: Option<String>,
    pub fee: u64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeTableResponse {
    pub default_fee: u64,
    pub overrides: Vec<FeeOverride>,
}

pub async fn quote(
    State(state): State<ServerState>,
    Query(query): Query<QuoteQuery>,
) -> AppResult<ApiResponse<FeeQuote>> {
    let sub_district = query
        .sub_district
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::required_field("subDistrict"))?;
    Ok(ApiResponse::success(state.fees.quote(&sub_district)))
}

pub async fn list(State(state): State<ServerState>) -> AppResult<ApiResponse<FeeTableResponse>> {
    Ok(ApiResponse::success(FeeTableResponse {
        default_fee: state.fees.default_fee(),
        overrides: state.fees.list_overrides(),
    }))
}

pub async fn set_override(
    State(state): State<ServerState>,
    ApiJson(body): ApiJson<SetOverrideBody>,
) -> AppResult<ApiResponse<FeeOverride>> {
    let sub_district = body
        .sub_district
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::required_field("subDistrict"))?;

    let fees = state.fees.clone();
    let row = run_blocking(move || Ok(fees.set_override(&sub_district, body.fee)?)).await?;
    Ok(ApiResponse::success(row))
}
