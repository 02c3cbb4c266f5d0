// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};
use tracing::info;

use super::extract::JsonBody;
use crate::{
    error::ApiError,
    models::{ErrorResponse, GenerateImageRequest, UriResponse},
    state::AppState,
};

const IMAGE_FILE_NAME: &str = "image.png";

/// Generate an image from a prompt and store it.
#[utoipa::path(
    post,
    path = "/api/stability",
    request_body = GenerateImageRequest,
    tag = "Images",
    responses(
        (status = 200, description = "Image generated and uploaded", body = UriResponse),
        (status = 500, description = "Malformed request, generation or upload failed", body = ErrorResponse)
    )
)]
pub async fn generate_image(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<GenerateImageRequest>,
) -> Result<Json<UriResponse>, ApiError> {
    if request.prompt.trim().is_empty() {
        return Err(ApiError::server_error("prompt must not be empty"));
    }

    let generator = state
        .images
        .as_ref()
        .ok_or_else(|| ApiError::server_error("image generation is not configured"))?;

    let bytes = generator
        .generate(&request.prompt)
        .await
        .map_err(ApiError::server_error)?;
    let uri = state
        .content
        .upload(IMAGE_FILE_NAME, bytes)
        .await
        .map_err(ApiError::server_error)?;

    info!(uri = %uri, "Stored generated image");
    Ok(Json(UriResponse { uri }))
}
