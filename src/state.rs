// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::auth::{AuthError, SessionCodec, TwitterOAuth};
use crate::blockchain::{ChainClient, CollectionReader, VoucherSigner};
use crate::config::AppConfig;
use crate::content::{ContentError, ContentStore, IpfsStore};
use crate::imaging::{ImageError, ImageGenerator, StabilityClient};
use crate::minting::VoucherService;
use crate::profile::{ProfileError, ProfileSource, TwitterProfileClient};

/// Default timeout for outbound HTTP calls.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// Errors while wiring up the application.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Auth: {0}")]
    Auth(#[from] AuthError),

    #[error("Profile client: {0}")]
    Profile(#[from] ProfileError),

    #[error("Content store: {0}")]
    Content(#[from] ContentError),

    #[error("Image client: {0}")]
    Image(#[from] ImageError),
}

/// Upstream integrations, each behind a trait so tests can swap them.
pub struct Services {
    pub collection: Arc<dyn CollectionReader>,
    pub profiles: Arc<dyn ProfileSource>,
    pub content: Arc<dyn ContentStore>,
    /// `None` when no image API key is configured.
    pub images: Option<Arc<dyn ImageGenerator>>,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub collection: Arc<dyn CollectionReader>,
    pub profiles: Arc<dyn ProfileSource>,
    pub content: Arc<dyn ContentStore>,
    pub images: Option<Arc<dyn ImageGenerator>>,
    pub vouchers: Arc<VoucherService>,
    pub oauth: Arc<TwitterOAuth>,
    pub sessions: Arc<SessionCodec>,
    /// Plain client for fetching avatars.
    pub http: Client,
}

impl AppState {
    pub fn new(config: AppConfig, services: Services) -> Result<Self, StateError> {
        let signer = VoucherSigner::new(
            config.signer.clone(),
            config.network.chain_id,
            config.collection_address,
        );
        let vouchers = VoucherService::new(
            services.collection.clone(),
            services.profiles.clone(),
            services.content.clone(),
            signer,
            config.voucher_ttl,
        );
        let oauth = TwitterOAuth::new(config.twitter.clone())?;
        let sessions = SessionCodec::new(&config.session_secret, config.session_ttl);
        let http = Client::builder().timeout(HTTP_TIMEOUT).build()?;

        Ok(Self {
            config: Arc::new(config),
            collection: services.collection,
            profiles: services.profiles,
            content: services.content,
            images: services.images,
            vouchers: Arc::new(vouchers),
            oauth: Arc::new(oauth),
            sessions: Arc::new(sessions),
            http,
        })
    }

    /// Wire up the real upstream clients described by `config`.
    pub fn from_config(config: AppConfig) -> Result<Self, StateError> {
        let collection = ChainClient::new(config.rpc_url.clone(), config.collection_address);
        let profiles = TwitterProfileClient::new(config.twitter.api_base.clone())?;
        let content = IpfsStore::new(config.ipfs.api_url.clone(), config.ipfs.gateway_url.clone())?;
        let images = StabilityClient::from_config(&config.stability)?
            .map(|client| Arc::new(client) as Arc<dyn ImageGenerator>);

        let services = Services {
            collection: Arc::new(collection),
            profiles: Arc::new(profiles),
            content: Arc::new(content),
            images,
        };
        Self::new(config, services)
    }
}
