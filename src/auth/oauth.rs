// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Twitter/X OAuth 2.0 Authorization Code flow with PKCE.
//!
//! 1. [`TwitterOAuth::authorization_url`] builds the authorize URL and returns
//!    the state and code verifier, which the caller keeps in short-lived
//!    cookies.
//! 2. On callback, [`TwitterOAuth::exchange_code`] trades the code and
//!    verifier for an access token. Twitter treats this app as a confidential
//!    client, so the exchange authenticates with HTTP Basic.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use super::{pkce, AuthError};
use crate::config::TwitterConfig;

const SCOPES: &str = "users.read tweet.read offline.access";

/// Authorization URL with the PKCE parameters to remember until callback.
pub struct AuthorizationRequest {
    pub url: String,
    pub state: String,
    pub code_verifier: String,
}

/// Token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// OAuth 2.0 client for the social provider.
pub struct TwitterOAuth {
    config: TwitterConfig,
    http: Client,
}

impl TwitterOAuth {
    pub fn new(config: TwitterConfig) -> Result<Self, AuthError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| AuthError::InternalError(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    /// Generate an authorization URL with fresh state and PKCE parameters.
    pub fn authorization_url(&self) -> Result<AuthorizationRequest, AuthError> {
        let state = pkce::generate_state()?;
        let code_verifier = pkce::generate_code_verifier()?;
        let code_challenge = pkce::generate_code_challenge(&code_verifier);

        let mut url = self.config.auth_url.clone();
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", self.config.redirect_uri.as_str())
            .append_pair("scope", SCOPES)
            .append_pair("state", &state)
            .append_pair("code_challenge", &code_challenge)
            .append_pair("code_challenge_method", "S256");

        Ok(AuthorizationRequest {
            url: url.into(),
            state,
            code_verifier,
        })
    }

    /// Exchange an authorization code for tokens.
    pub async fn exchange_code(
        &self,
        code: &str,
        code_verifier: &str,
    ) -> Result<TokenResponse, AuthError> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("client_id", self.config.client_id.as_str()),
            ("code_verifier", code_verifier),
        ];

        let response = self
            .http
            .post(self.config.token_url.clone())
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&params)
            .send()
            .await
            .map_err(|e| AuthError::TokenExchange(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::TokenExchange(format!("{status}: {body}")));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| AuthError::TokenExchange(format!("invalid token response: {e}")))
    }
}
