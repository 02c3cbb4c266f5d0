// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Text-to-image generation (Stability AI REST API).
//!
//! A generation is a single request that returns base64-encoded artifacts.
//! The call is bounded by the configured timeout; there is no retry.

use std::time::Duration;

use async_trait::async_trait;
use base64ct::{Base64, Encoding};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use crate::config::StabilityConfig;

const FINISH_SUCCESS: &str = "SUCCESS";

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("Image generation request failed: {0}")]
    Request(String),

    #[error("Image API returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Image generation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Image API response was invalid: {0}")]
    InvalidResponse(String),
}

/// Produces image bytes for a text prompt.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<Vec<u8>, ImageError>;
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    artifacts: Vec<Artifact>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Artifact {
    base64: String,
    #[serde(default)]
    finish_reason: Option<String>,
}

/// Stability AI text-to-image client.
pub struct StabilityClient {
    api_key: String,
    endpoint: Url,
    timeout: Duration,
    http: Client,
}

impl StabilityClient {
    /// Build a client, or `None` when no API key is configured.
    pub fn from_config(config: &StabilityConfig) -> Result<Option<Self>, ImageError> {
        let Some(api_key) = config.api_key.clone() else {
            return Ok(None);
        };

        let endpoint = config
            .api_base
            .join(&format!("/v1/generation/{}/text-to-image", config.engine))
            .map_err(|e| ImageError::Request(e.to_string()))?;

        let http = Client::builder()
            .build()
            .map_err(|e| ImageError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Some(Self {
            api_key,
            endpoint,
            timeout: config.timeout,
            http,
        }))
    }

    async fn request_image(&self, prompt: &str) -> Result<Vec<u8>, ImageError> {
        let body = json!({
            "text_prompts": [{ "text": prompt }],
            "samples": 1,
        });

        let response = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ImageError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ImageError::Upstream { status, body });
        }

        let generation: GenerationResponse = response
            .json()
            .await
            .map_err(|e| ImageError::InvalidResponse(e.to_string()))?;

        first_image(generation)
    }
}

#[async_trait]
impl ImageGenerator for StabilityClient {
    async fn generate(&self, prompt: &str) -> Result<Vec<u8>, ImageError> {
        tokio::time::timeout(self.timeout, self.request_image(prompt))
            .await
            .map_err(|_| ImageError::Timeout(self.timeout))?
    }
}

/// Decode the first successfully finished artifact.
fn first_image(generation: GenerationResponse) -> Result<Vec<u8>, ImageError> {
    let artifact = generation
        .artifacts
        .into_iter()
        .find(|a| a.finish_reason.as_deref().map_or(true, |r| r == FINISH_SUCCESS))
        .ok_or_else(|| ImageError::InvalidResponse("no successful artifact".to_string()))?;

    Base64::decode_vec(&artifact.base64)
        .map_err(|e| ImageError::InvalidResponse(format!("artifact is not base64: {e}")))
}
