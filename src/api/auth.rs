// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Sign-in routes: Twitter/X OAuth 2.0 with PKCE.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use url::Url;

use crate::{
    auth::{cookies, AuthError, OptionalSession, Session},
    models::{SessionResponse, SessionUser},
    state::AppState,
};

/// Redirect back to the app with an error code the UI can show.
fn login_error(app_url: &Url, code: &str) -> Response {
    let mut target = app_url.clone();
    target.query_pairs_mut().append_pair("error", code);
    Redirect::to(target.as_str()).into_response()
}

/// Start sign-in: redirect to the provider's consent screen.
#[utoipa::path(
    get,
    path = "/api/auth/signin",
    tag = "Auth",
    responses((status = 303, description = "Redirect to the provider"))
)]
pub async fn signin(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), AuthError> {
    let auth_req = state.oauth.authorization_url()?;

    let (pkce_cookie, state_cookie) = cookies::pkce_cookies(
        &auth_req.code_verifier,
        &auth_req.state,
        state.config.secure_cookies(),
    );
    let jar = jar.add(pkce_cookie).add(state_cookie);

    Ok((jar, Redirect::to(&auth_req.url)))
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

/// Finish sign-in: exchange the code, read the profile, set the session.
#[utoipa::path(
    get,
    path = "/api/auth/callback/twitter",
    tag = "Auth",
    responses((status = 303, description = "Redirect to the app, with a session cookie on success"))
)]
pub async fn callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Result<(CookieJar, Redirect), Response> {
    let app_url = &state.config.app_url;

    if let Some(error) = &params.error {
        tracing::warn!(error = %error, "OAuth error from provider");
        return Err(login_error(app_url, AuthError::Provider(error.clone()).error_code()));
    }

    let code = params
        .code
        .ok_or_else(|| login_error(app_url, "missing_code"))?;

    let received_state = params
        .state
        .ok_or_else(|| login_error(app_url, AuthError::StateMismatch.error_code()))?;
    let stored_state = cookies::get_state(&jar)
        .ok_or_else(|| login_error(app_url, AuthError::StateMismatch.error_code()))?;
    if received_state != stored_state {
        tracing::warn!("OAuth state mismatch");
        return Err(login_error(app_url, AuthError::StateMismatch.error_code()));
    }

    let code_verifier = cookies::get_pkce_verifier(&jar)
        .ok_or_else(|| login_error(app_url, AuthError::MissingVerifier.error_code()))?;

    let tokens = state
        .oauth
        .exchange_code(&code, &code_verifier)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Token exchange failed");
            login_error(app_url, e.error_code())
        })?;

    let profile = state
        .profiles
        .fetch_profile(&tokens.access_token)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Profile request failed");
            login_error(app_url, "profile_failed")
        })?;

    let session = Session {
        user_id: profile.id,
        display_name: profile.name,
        avatar_url: profile.profile_image_url.unwrap_or_default(),
        access_token: tokens.access_token,
    };
    let token = state.sessions.issue(&session).map_err(|e| {
        tracing::error!(error = %e, "Session signing failed");
        login_error(app_url, e.error_code())
    })?;

    let session_cookie = cookies::session_cookie(
        &token,
        state.sessions.ttl(),
        state.config.secure_cookies(),
    );
    let (clear_pkce, clear_state) = cookies::clear_pkce_cookies();
    let jar = jar.add(session_cookie).add(clear_pkce).add(clear_state);

    tracing::info!(user_id = %session.user_id, "Sign-in successful");

    Ok((jar, Redirect::to(app_url.as_str())))
}

/// The current session, without the upstream access token.
#[utoipa::path(
    get,
    path = "/api/auth/session",
    tag = "Auth",
    responses((status = 200, description = "Session user, or `{}` when signed out", body = SessionResponse))
)]
pub async fn session(OptionalSession(session): OptionalSession) -> Json<SessionResponse> {
    Json(SessionResponse {
        user: session.map(|s| SessionUser {
            name: s.display_name,
            image: s.avatar_url,
        }),
    })
}

/// Sign out: clear the session cookie.
#[utoipa::path(
    post,
    path = "/api/auth/signout",
    tag = "Auth",
    responses((status = 303, description = "Redirect to the app"))
)]
pub async fn signout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    let jar = jar.add(cookies::clear_session_cookie());
    (jar, Redirect::to(state.config.app_url.as_str()))
}

#[cfg(test)]
mod tests {
    use crate::auth::cookies::SESSION_COOKIE_NAME;
    use crate::config::tests::test_config;
    use crate::testing::{alice_session, send, spawn_upstream, TestApp};
    use axum::{
        body::Body,
        http::{header, Request, Response, StatusCode},
        routing::post,
        Json, Router,
    };
    use serde_json::json;
    use tower::ServiceExt;
    use url::Url;

    fn set_cookies<B>(response: &Response<B>) -> Vec<String> {
        response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }

    fn location<B>(response: &Response<B>) -> Url {
        Url::parse(response.headers()[header::LOCATION].to_str().unwrap()).unwrap()
    }

    async fn app_with_token_endpoint() -> TestApp {
        let upstream = Router::new().route(
            "/2/oauth2/token",
            post(|| async { Json(json!({ "access_token": "fresh-token", "token_type": "bearer" })) }),
        );
        let base = spawn_upstream(upstream).await;

        let mut config = test_config();
        config.twitter.token_url = base.join("/2/oauth2/token").unwrap();
        TestApp::with_config(config)
    }

    fn callback_request(query: &str, cookies: &str) -> Request<Body> {
        Request::builder()
            .uri(format!("/api/auth/callback/twitter?{query}"))
            .header(header::COOKIE, cookies)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn signin_redirects_with_pkce_cookies() {
        let app = TestApp::new();
        let request = Request::builder()
            .uri("/api/auth/signin")
            .body(Body::empty())
            .unwrap();

        let response = app.router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let target = location(&response);
        assert_eq!(target.host_str(), Some("twitter.com"));
        assert!(target.query_pairs().any(|(k, v)| k == "code_challenge_method" && v == "S256"));

        let cookies = set_cookies(&response);
        assert!(cookies.iter().any(|c| c.starts_with("oauth_pkce=")));
        assert!(cookies.iter().any(|c| c.starts_with("oauth_state=")));
    }

    #[tokio::test]
    async fn callback_sets_session_cookie() {
        let app = app_with_token_endpoint().await;

        let response = app
            .router()
            .oneshot(callback_request(
                "code=abc&state=xyz",
                "oauth_state=xyz; oauth_pkce=verifier",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response).as_str(), "http://localhost:3000/");

        let cookies = set_cookies(&response);
        let session_cookie = cookies
            .iter()
            .find(|c| c.starts_with(&format!("{SESSION_COOKIE_NAME}=")))
            .unwrap();
        assert!(session_cookie.contains("HttpOnly"));

        let token = session_cookie
            .trim_start_matches(&format!("{SESSION_COOKIE_NAME}="))
            .split(';')
            .next()
            .unwrap();
        let session = app.state.sessions.verify(token).unwrap();
        assert_eq!(session.display_name, "Alice");
        assert_eq!(session.access_token, "fresh-token");
        assert_eq!(session.avatar_url, "https://pbs.twimg.com/alice.jpg");
        assert_eq!(app.profiles.tokens(), vec!["fresh-token".to_string()]);
    }

    #[tokio::test]
    async fn callback_rejects_state_mismatch() {
        let app = app_with_token_endpoint().await;

        let response = app
            .router()
            .oneshot(callback_request(
                "code=abc&state=forged",
                "oauth_state=xyz; oauth_pkce=verifier",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(location(&response)
            .query_pairs()
            .any(|(k, v)| k == "error" && v == "state_mismatch"));
        assert_eq!(app.profiles.calls(), 0);
    }

    #[tokio::test]
    async fn callback_reports_provider_error() {
        let app = TestApp::new();

        let response = app
            .router()
            .oneshot(callback_request("error=access_denied", ""))
            .await
            .unwrap();

        assert!(location(&response)
            .query_pairs()
            .any(|(k, v)| k == "error" && v == "provider_error"));
    }

    #[tokio::test]
    async fn session_hides_access_token() {
        let app = TestApp::new();
        let request = Request::builder()
            .uri("/api/auth/session")
            .header(header::COOKIE, app.session_cookie(&alice_session()))
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(app.router(), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "user": { "name": "Alice", "image": "https://pbs.twimg.com/alice.jpg" } })
        );
    }

    #[tokio::test]
    async fn signed_out_session_is_empty() {
        let app = TestApp::new();
        let request = Request::builder()
            .uri("/api/auth/session")
            .body(Body::empty())
            .unwrap();

        let (_, body) = send(app.router(), request).await;
        assert_eq!(body, json!({}));
    }

    #[tokio::test]
    async fn signout_clears_session_cookie() {
        let app = TestApp::new();
        let request = Request::builder()
            .method("POST")
            .uri("/api/auth/signout")
            .header(header::COOKIE, app.session_cookie(&alice_session()))
            .body(Body::empty())
            .unwrap();

        let response = app.router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let cookies = set_cookies(&response);
        assert!(cookies
            .iter()
            .any(|c| c.starts_with(&format!("{SESSION_COOKIE_NAME}=;")) && c.contains("Max-Age=0")));
    }
}
