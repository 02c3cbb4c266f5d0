// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request body extractor.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

/// JSON body decoded into `T`. Any mismatch is a generic 500.
///
/// Unlike `axum::Json`, the content type is not checked, and a body that is
/// itself a JSON string is decoded once more. Browser clients post
/// `JSON.stringify(...)` without a JSON content type.
#[derive(Debug, Clone, Copy)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    Bytes: FromRequest<S>,
    <Bytes as FromRequest<S>>::Rejection: std::fmt::Display,
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::server_error(format!("could not read request body: {e}")))?;

        decode(&body).map(JsonBody)
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::server_error(format!("invalid JSON body: {e}")))?;

    let value = match value {
        Value::String(inner) => serde_json::from_str(&inner)
            .map_err(|e| ApiError::server_error(format!("invalid JSON body: {e}")))?,
        other => other,
    };

    serde_json::from_value(value)
        .map_err(|e| ApiError::server_error(format!("invalid request body: {e}")))
}
