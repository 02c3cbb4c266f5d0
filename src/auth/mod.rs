// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Sign-in with Twitter/X and the session that results from it.
//!
//! ## Auth Flow
//!
//! 1. `GET /api/auth/signin` redirects to the provider with PKCE parameters,
//!    keeping the verifier and state in short-lived cookies
//! 2. `GET /api/auth/callback/twitter`:
//!    - checks the returned state against the cookie
//!    - exchanges the code for an access token
//!    - reads the user's profile
//!    - sets an HttpOnly `session_token` cookie
//! 3. Protected handlers take [`SessionAuth`], which verifies the token and
//!    yields the [`Session`]
//!
//! ## Security
//!
//! - Sessions are HS256 JWTs signed with `SESSION_SECRET`
//! - Clock skew tolerance is 60 seconds
//! - The upstream access token only ever travels inside the signed cookie

pub mod cookies;
pub mod error;
pub mod extractor;
pub mod oauth;
pub mod pkce;
pub mod session;

pub use error::AuthError;
pub use extractor::{OptionalSession, SessionAuth};
pub use oauth::TwitterOAuth;
pub use session::{Session, SessionCodec};
