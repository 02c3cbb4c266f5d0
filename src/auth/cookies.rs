// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Cookie helpers for the sign-in flow and the session.

use std::time::Duration as StdDuration;

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

pub const SESSION_COOKIE_NAME: &str = "session_token";
const PKCE_COOKIE_NAME: &str = "oauth_pkce";
const STATE_COOKIE_NAME: &str = "oauth_state";

/// Path the PKCE cookies are scoped to.
pub const AUTH_PATH: &str = "/api/auth";

/// Create PKCE verifier + state cookies for the authorization request.
pub fn pkce_cookies(
    code_verifier: &str,
    state: &str,
    secure: bool,
) -> (Cookie<'static>, Cookie<'static>) {
    let verifier = Cookie::build((PKCE_COOKIE_NAME, code_verifier.to_string()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path(AUTH_PATH)
        .max_age(Duration::minutes(5))
        .build();

    let state = Cookie::build((STATE_COOKIE_NAME, state.to_string()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path(AUTH_PATH)
        .max_age(Duration::minutes(5))
        .build();

    (verifier, state)
}

/// Create removal cookies for PKCE verifier + state.
pub fn clear_pkce_cookies() -> (Cookie<'static>, Cookie<'static>) {
    let verifier = Cookie::build((PKCE_COOKIE_NAME, ""))
        .path(AUTH_PATH)
        .max_age(Duration::ZERO)
        .build();

    let state = Cookie::build((STATE_COOKIE_NAME, ""))
        .path(AUTH_PATH)
        .max_age(Duration::ZERO)
        .build();

    (verifier, state)
}

/// Create the session cookie.
pub fn session_cookie(token: &str, ttl: StdDuration, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, token.to_string()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::seconds(ttl.as_secs() as i64))
        .build()
}

/// Create removal cookie for the session.
pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, ""))
        .path("/")
        .max_age(Duration::ZERO)
        .build()
}

pub fn get_pkce_verifier(jar: &CookieJar) -> Option<String> {
    jar.get(PKCE_COOKIE_NAME).map(|c| c.value().to_string())
}

pub fn get_state(jar: &CookieJar) -> Option<String> {
    jar.get(STATE_COOKIE_NAME).map(|c| c.value().to_string())
}

pub fn get_session_token(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE_NAME)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_is_http_only_and_site_wide() {
        let cookie = session_cookie("tok", StdDuration::from_secs(60), true);
        assert_eq!(cookie.name(), SESSION_COOKIE_NAME);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(Duration::seconds(60)));
    }

    #[test]
    fn pkce_cookies_are_scoped_to_auth_routes() {
        let (verifier, state) = pkce_cookies("v", "s", false);
        assert_eq!(verifier.path(), Some(AUTH_PATH));
        assert_eq!(state.value(), "s");
        assert_eq!(verifier.max_age(), Some(Duration::minutes(5)));
    }

    #[test]
    fn empty_session_cookie_is_ignored() {
        let jar = CookieJar::new().add(Cookie::new(SESSION_COOKIE_NAME, ""));
        assert!(get_session_token(&jar).is_none());
    }
}
