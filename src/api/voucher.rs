// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};

use super::extract::JsonBody;
use crate::{
    auth::OptionalSession,
    error::ApiError,
    minting::VoucherError,
    models::{ErrorResponse, MintVoucherRequest, SignedPayloadResponse},
    state::AppState,
};

impl From<VoucherError> for ApiError {
    fn from(err: VoucherError) -> Self {
        match err {
            VoucherError::AlreadyMinted => ApiError::bad_request(err.to_string()),
            VoucherError::Outstanding => ApiError::conflict(err.to_string()),
            VoucherError::Unauthenticated => ApiError::unauthorized(err.to_string()),
            VoucherError::InvalidRequest(_)
            | VoucherError::LedgerFull
            | VoucherError::Chain(_)
            | VoucherError::Profile(_)
            | VoucherError::Content(_) => ApiError::server_error(err),
        }
    }
}

/// Issue a signed mint voucher for the signed-in user.
///
/// The body may be a JSON object or a JSON-encoded string of one. A
/// malformed body is a 500, and the holder check runs before the session
/// check.
#[utoipa::path(
    post,
    path = "/api/server",
    request_body = MintVoucherRequest,
    tag = "Minting",
    responses(
        (status = 200, description = "Voucher issued", body = SignedPayloadResponse),
        (status = 400, description = "Recipient already holds a token", body = ErrorResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 409, description = "A voucher for this address is outstanding", body = ErrorResponse),
        (status = 500, description = "Malformed request or upstream failure", body = ErrorResponse)
    )
)]
pub async fn issue_voucher(
    State(state): State<AppState>,
    OptionalSession(session): OptionalSession,
    JsonBody(request): JsonBody<MintVoucherRequest>,
) -> Result<Json<SignedPayloadResponse>, ApiError> {
    let signed_payload = state.vouchers.issue(&request, session.as_ref()).await?;
    Ok(Json(SignedPayloadResponse { signed_payload }))
}
