// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! IPFS HTTP API (Kubo) backed content store.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, Client};
use serde::Deserialize;
use url::Url;

use super::{parse_ipfs_uri, ContentError, ContentStore, IPFS_SCHEME};

#[derive(Debug, Deserialize)]
struct AddResponse {
    #[serde(rename = "Hash")]
    hash: String,
}

/// Uploads through `/api/v0/add` and reads back through a gateway.
#[derive(Debug, Clone)]
pub struct IpfsStore {
    api_url: Url,
    gateway_url: Url,
    http: Client,
}

impl IpfsStore {
    pub fn new(api_url: Url, gateway_url: Url) -> Result<Self, ContentError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| ContentError::Upload(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            api_url,
            gateway_url,
            http,
        })
    }

    fn add_url(&self) -> Result<Url, ContentError> {
        let mut url = self
            .api_url
            .join("/api/v0/add")
            .map_err(|e| ContentError::Upload(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("cid-version", "1")
            .append_pair("pin", "true");
        Ok(url)
    }

    /// HTTPS gateway URL for an `ipfs://` URI.
    pub fn gateway_url_for(&self, uri: &str) -> Result<Url, ContentError> {
        let path = parse_ipfs_uri(uri)?;
        let mut base = self.gateway_url.clone();
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        base.join(path)
            .map_err(|e| ContentError::InvalidUri(format!("{uri}: {e}")))
    }
}

#[async_trait]
impl ContentStore for IpfsStore {
    async fn upload(&self, name: &str, bytes: Vec<u8>) -> Result<String, ContentError> {
        let size = bytes.len();
        let part = multipart::Part::bytes(bytes).file_name(name.to_string());
        let form = multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(self.add_url()?)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ContentError::Upload(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ContentError::Upload(format!("IPFS add returned {status}: {body}")));
        }

        let added: AddResponse = response
            .json()
            .await
            .map_err(|e| ContentError::Upload(format!("invalid add response: {e}")))?;

        tracing::debug!(cid = %added.hash, size, "Uploaded content to IPFS");
        Ok(format!("{IPFS_SCHEME}{}", added.hash))
    }

    async fn fetch(&self, uri: &str) -> Result<Vec<u8>, ContentError> {
        let url = self.gateway_url_for(uri)?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ContentError::Download(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ContentError::Download(format!(
                "gateway returned {} for {uri}",
                response.status()
            )));
        }

        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| ContentError::Download(e.to_string()))
    }
}
