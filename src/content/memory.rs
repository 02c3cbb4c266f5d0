// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory content store for tests.

use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use super::{parse_ipfs_uri, ContentError, ContentStore, IPFS_SCHEME};

/// Stores blobs keyed by the hex SHA-256 of their content.
#[derive(Default)]
pub struct MemoryContentStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct blobs uploaded so far.
    pub fn len(&self) -> usize {
        self.blobs.lock().unwrap().len()
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn upload(&self, _name: &str, bytes: Vec<u8>) -> Result<String, ContentError> {
        let digest = alloy::hex::encode(Sha256::digest(&bytes));
        self.blobs.lock().unwrap().insert(digest.clone(), bytes);
        Ok(format!("{IPFS_SCHEME}{digest}"))
    }

    async fn fetch(&self, uri: &str) -> Result<Vec<u8>, ContentError> {
        let key = parse_ipfs_uri(uri)?;
        self.blobs
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| ContentError::Download(format!("no content for {uri}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn same_content_gives_same_uri() {
        let store = MemoryContentStore::new();
        let a = store.upload("a", b"hello".to_vec()).await.unwrap();
        let b = store.upload("b", b"hello".to_vec()).await.unwrap();
        let c = store.upload("c", b"world".to_vec()).await.unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(store.len(), 2);
        assert_eq!(store.fetch(&a).await.unwrap(), b"hello");
    }
}
