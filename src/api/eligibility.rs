// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::str::FromStr;

use alloy::primitives::Address;
use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    blockchain::collection::is_eligible,
    error::ApiError,
    models::{EligibilityResponse, ErrorResponse},
    state::AppState,
};

/// Whether an address may still mint.
#[utoipa::path(
    get,
    path = "/api/eligibility/{address}",
    tag = "Minting",
    params(("address" = String, Path, description = "Wallet address (0x-prefixed)")),
    responses(
        (status = 200, description = "Eligibility", body = EligibilityResponse),
        (status = 400, description = "Invalid address", body = ErrorResponse),
        (status = 500, description = "RPC failure", body = ErrorResponse)
    )
)]
pub async fn check_eligibility(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<EligibilityResponse>, ApiError> {
    let owner = Address::from_str(&address)
        .map_err(|_| ApiError::bad_request(format!("Invalid address: {address}")))?;

    let balance = state
        .collection
        .balance_of(owner)
        .await
        .map_err(ApiError::server_error)?;

    Ok(Json(EligibilityResponse {
        address,
        balance: balance.to_string(),
        eligible: is_eligible(balance),
    }))
}
