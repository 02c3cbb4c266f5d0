// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Content-addressed storage.
//!
//! Images and NFT metadata are uploaded to IPFS and referenced by
//! `ipfs://<cid>` URIs. The URI is derived from the content, so uploading the
//! same bytes twice yields the same URI.

use async_trait::async_trait;
use serde::Serialize;

pub mod ipfs;
#[cfg(test)]
pub mod memory;

pub use ipfs::IpfsStore;

/// URI scheme for content-addressed references.
pub const IPFS_SCHEME: &str = "ipfs://";

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Download failed: {0}")]
    Download(String),

    #[error("Not a content-addressed URI: {0}")]
    InvalidUri(String),

    #[error("Content could not be encoded: {0}")]
    Encoding(String),
}

/// A store that turns bytes into content-derived URIs and back.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Upload `bytes` under the display name `name`, returning its URI.
    async fn upload(&self, name: &str, bytes: Vec<u8>) -> Result<String, ContentError>;

    /// Fetch the bytes behind a URI previously returned by [`upload`](Self::upload).
    async fn fetch(&self, uri: &str) -> Result<Vec<u8>, ContentError>;
}

/// Serialize `value` as JSON and upload it.
pub async fn upload_json<T: Serialize + Sync>(
    store: &dyn ContentStore,
    name: &str,
    value: &T,
) -> Result<String, ContentError> {
    let bytes = serde_json::to_vec(value).map_err(|e| ContentError::Encoding(e.to_string()))?;
    store.upload(name, bytes).await
}

/// Strip the scheme from an `ipfs://<cid>[/path]` URI.
pub fn parse_ipfs_uri(uri: &str) -> Result<&str, ContentError> {
    uri.strip_prefix(IPFS_SCHEME)
        .filter(|rest| !rest.is_empty())
        .ok_or_else(|| ContentError::InvalidUri(uri.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ipfs_uris() {
        assert_eq!(parse_ipfs_uri("ipfs://QmHash").unwrap(), "QmHash");
        assert_eq!(parse_ipfs_uri("ipfs://QmHash/0").unwrap(), "QmHash/0");
        assert!(parse_ipfs_uri("ipfs://").is_err());
        assert!(parse_ipfs_uri("https://example.com/a.png").is_err());
    }
}
