// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};
use tracing::info;

use crate::{
    auth::SessionAuth,
    error::ApiError,
    models::{ErrorResponse, UriResponse},
    state::AppState,
};

const AVATAR_FILE_NAME: &str = "image";

/// Largest profile image copied into storage.
const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;

/// Read `response` into memory, refusing bodies over `limit` bytes.
async fn read_capped(mut response: reqwest::Response, limit: usize) -> Result<Vec<u8>, ApiError> {
    if response.content_length().is_some_and(|len| len > limit as u64) {
        return Err(ApiError::server_error(format!(
            "profile image exceeds {limit} bytes"
        )));
    }

    let mut bytes = Vec::new();
    while let Some(chunk) = response.chunk().await.map_err(ApiError::server_error)? {
        if bytes.len() + chunk.len() > limit {
            return Err(ApiError::server_error(format!(
                "profile image exceeds {limit} bytes"
            )));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

/// Copy the signed-in user's profile image into content storage.
#[utoipa::path(
    post,
    path = "/api/avatar",
    tag = "Images",
    responses(
        (status = 200, description = "Profile image uploaded", body = UriResponse),
        (status = 400, description = "Session has no profile image", body = ErrorResponse),
        (status = 401, description = "Not signed in"),
        (status = 500, description = "Download or upload failed", body = ErrorResponse)
    )
)]
pub async fn upload_avatar(
    State(state): State<AppState>,
    SessionAuth(session): SessionAuth,
) -> Result<Json<UriResponse>, ApiError> {
    if session.avatar_url.trim().is_empty() {
        return Err(ApiError::bad_request("Profile image missing"));
    }

    let response = state
        .http
        .get(&session.avatar_url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(ApiError::server_error)?;
    let bytes = read_capped(response, MAX_AVATAR_BYTES).await?;

    let uri = state
        .content
        .upload(AVATAR_FILE_NAME, bytes)
        .await
        .map_err(ApiError::server_error)?;

    info!(user_id = %session.user_id, uri = %uri, "Stored profile image");
    Ok(Json(UriResponse { uri }))
}
