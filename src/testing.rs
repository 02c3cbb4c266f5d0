// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Test fixtures: fake upstreams and a fully wired [`AppState`].

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use url::Url;

use crate::auth::Session;
use crate::blockchain::{ChainError, CollectionReader};
use crate::config::{tests::test_config, AppConfig};
use crate::content::memory::MemoryContentStore;
use crate::imaging::{ImageError, ImageGenerator};
use crate::profile::{ProfileError, ProfileSource, SocialProfile};
use crate::state::{AppState, Services};

/// Recipient used across tests. Deliberately not in checksum case.
pub const ALICE_ADDRESS: &str = "0xABC0000000000000000000000000000000000001";

/// Send `request` through `router`, returning the status and JSON body
/// (`Value::Null` for an empty or non-JSON body).
pub async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn spawn_upstream(router: Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Url::parse(&format!("http://{addr}")).unwrap()
}

pub fn alice_session() -> Session {
    Session {
        user_id: "42".to_string(),
        display_name: "Alice".to_string(),
        avatar_url: "https://pbs.twimg.com/alice.jpg".to_string(),
        access_token: "alice-access-token".to_string(),
    }
}

pub fn alice_profile() -> SocialProfile {
    SocialProfile {
        id: "42".to_string(),
        name: "Alice".to_string(),
        username: "alice".to_string(),
        description: "bio".to_string(),
        url: "https://t.co/alice".to_string(),
        profile_image_url: Some("https://pbs.twimg.com/alice.jpg".to_string()),
    }
}

/// Collection with settable balances. Unknown addresses hold nothing.
#[derive(Default)]
pub struct FakeCollection {
    balances: Mutex<HashMap<Address, U256>>,
    calls: AtomicUsize,
    down: AtomicBool,
}

impl FakeCollection {
    pub fn set_balance(&self, address: &str, balance: u64) {
        let address = Address::from_str(address).unwrap();
        self.balances
            .lock()
            .unwrap()
            .insert(address, U256::from(balance));
    }

    /// Make every RPC call fail.
    pub fn go_down(&self) {
        self.down.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CollectionReader for FakeCollection {
    async fn balance_of(&self, owner: Address) -> Result<U256, ChainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.down.load(Ordering::SeqCst) {
            return Err(ChainError::RpcError("connection refused".to_string()));
        }
        Ok(self
            .balances
            .lock()
            .unwrap()
            .get(&owner)
            .copied()
            .unwrap_or(U256::ZERO))
    }

    async fn block_number(&self) -> Result<u64, ChainError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(ChainError::RpcError("connection refused".to_string()));
        }
        Ok(1)
    }
}

/// Profile API returning [`alice_profile`].
pub struct FakeProfiles {
    profile: SocialProfile,
    calls: AtomicUsize,
    fail_next: AtomicBool,
    tokens: Mutex<Vec<String>>,
}

impl FakeProfiles {
    pub fn new(profile: SocialProfile) -> Self {
        Self {
            profile,
            calls: AtomicUsize::new(0),
            fail_next: AtomicBool::new(false),
            tokens: Mutex::new(Vec::new()),
        }
    }

    /// Fail the next fetch with an upstream error.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Access tokens seen so far.
    pub fn tokens(&self) -> Vec<String> {
        self.tokens.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProfileSource for FakeProfiles {
    async fn fetch_profile(&self, access_token: &str) -> Result<SocialProfile, ProfileError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.tokens.lock().unwrap().push(access_token.to_string());
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(ProfileError::Upstream {
                status: 503,
                body: "over capacity".to_string(),
            });
        }
        Ok(self.profile.clone())
    }
}

/// Image generator returning fixed bytes.
#[derive(Default)]
pub struct FakeImages {
    calls: AtomicUsize,
}

impl FakeImages {
    pub const BYTES: &'static [u8] = b"\x89PNG fake image";

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageGenerator for FakeImages {
    async fn generate(&self, prompt: &str) -> Result<Vec<u8>, ImageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if prompt.contains("timeout") {
            return Err(ImageError::Timeout(std::time::Duration::from_secs(120)));
        }
        Ok(Self::BYTES.to_vec())
    }
}

/// Application state over fakes, with handles to inspect them.
pub struct TestApp {
    pub state: AppState,
    pub collection: Arc<FakeCollection>,
    pub profiles: Arc<FakeProfiles>,
    pub content: Arc<MemoryContentStore>,
    pub images: Arc<FakeImages>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::build(test_config(), true)
    }

    /// As [`new`](Self::new), but without an image API key.
    pub fn without_images() -> Self {
        Self::build(test_config(), false)
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self::build(config, true)
    }

    fn build(config: AppConfig, with_images: bool) -> Self {
        let collection = Arc::new(FakeCollection::default());
        let profiles = Arc::new(FakeProfiles::new(alice_profile()));
        let content = Arc::new(MemoryContentStore::new());
        let images = Arc::new(FakeImages::default());

        let services = Services {
            collection: collection.clone(),
            profiles: profiles.clone(),
            content: content.clone(),
            images: with_images.then(|| images.clone() as Arc<dyn ImageGenerator>),
        };
        let state = AppState::new(config, services).unwrap();

        Self {
            state,
            collection,
            profiles,
            content,
            images,
        }
    }

    pub fn router(&self) -> Router {
        crate::api::router(self.state.clone())
    }

    pub fn session_token(&self, session: &Session) -> String {
        self.state.sessions.issue(session).unwrap()
    }

    /// `Cookie` header value carrying a session for `session`.
    pub fn session_cookie(&self, session: &Session) -> String {
        format!(
            "{}={}",
            crate::auth::cookies::SESSION_COOKIE_NAME,
            self.session_token(session)
        )
    }
}
