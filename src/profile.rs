// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Social profile lookup (Twitter/X API v2).
//!
//! The same `GET /2/users/me` call serves two callers: the OAuth callback,
//! which needs the display name and avatar for the session, and voucher
//! issuance, which needs the bio, canonical URL, and handle for the NFT
//! metadata.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

const PROFILE_FIELDS: &str = "description,url,username,name,profile_image_url";

/// The caller's public profile as returned by the social API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SocialProfile {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub username: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub profile_image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProfileEnvelope {
    data: SocialProfile,
}

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("Profile request failed: {0}")]
    Request(String),

    #[error("Profile API returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Profile response was invalid: {0}")]
    InvalidResponse(String),
}

/// Source of the signed-in user's social profile.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn fetch_profile(&self, access_token: &str) -> Result<SocialProfile, ProfileError>;
}

/// Twitter/X API v2 client.
#[derive(Debug, Clone)]
pub struct TwitterProfileClient {
    api_base: Url,
    http: Client,
}

impl TwitterProfileClient {
    pub fn new(api_base: Url) -> Result<Self, ProfileError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| ProfileError::Request(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { api_base, http })
    }

    fn me_url(&self) -> Result<Url, ProfileError> {
        let mut url = self
            .api_base
            .join("/2/users/me")
            .map_err(|e| ProfileError::Request(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("user.fields", PROFILE_FIELDS);
        Ok(url)
    }
}

#[async_trait]
impl ProfileSource for TwitterProfileClient {
    async fn fetch_profile(&self, access_token: &str) -> Result<SocialProfile, ProfileError> {
        let response = self
            .http
            .get(self.me_url()?)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| ProfileError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ProfileError::Upstream { status, body });
        }

        let envelope: ProfileEnvelope = response
            .json()
            .await
            .map_err(|e| ProfileError::InvalidResponse(e.to_string()))?;
        Ok(envelope.data)
    }
}
