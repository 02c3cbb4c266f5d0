// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for the signed-in session.
//!
//! ```rust,ignore
//! async fn my_handler(SessionAuth(session): SessionAuth) -> impl IntoResponse {
//!     // session.display_name, session.access_token, ...
//! }
//! ```
//!
//! The token is read from the `session_token` cookie first, then from an
//! `Authorization: Bearer` header for non-browser clients.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use axum_extra::extract::cookie::CookieJar;

use super::{cookies, AuthError, Session};
use crate::state::AppState;

/// Extractor that requires a valid session.
pub struct SessionAuth(pub Session);

impl FromRequestParts<AppState> for SessionAuth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers)?;
        let session = state.sessions.verify(&token)?;

        Ok(SessionAuth(session))
    }
}

fn session_token(headers: &HeaderMap) -> Result<String, AuthError> {
    let jar = CookieJar::from_headers(headers);
    if let Some(token) = cookies::get_session_token(&jar) {
        return Ok(token);
    }

    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingSession)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::to_string)
        .ok_or(AuthError::InvalidAuthHeader)
}

/// Optional session extractor.
///
/// Returns `None` if no valid session is present, instead of rejecting.
pub struct OptionalSession(pub Option<Session>);

impl FromRequestParts<AppState> for OptionalSession {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match SessionAuth::from_request_parts(parts, state).await {
            Ok(SessionAuth(session)) => Ok(OptionalSession(Some(session))),
            Err(_) => Ok(OptionalSession(None)),
        }
    }
}
