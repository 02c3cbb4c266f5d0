// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JSON-RPC client for the target EVM chain.

use alloy::{
    network::Ethereum,
    primitives::{Address, U256},
    providers::{
        fillers::{BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller},
        Identity, Provider, ProviderBuilder, RootProvider,
    },
};
use async_trait::async_trait;
use url::Url;

use super::collection::{CollectionReader, Erc721Collection};

/// HTTP provider type (with the default fillers).
type HttpProvider = FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    RootProvider<Ethereum>,
>;

/// Read-only chain client bound to one collection contract.
pub struct ChainClient {
    provider: HttpProvider,
    collection: Address,
}

impl ChainClient {
    /// Create a client for the collection at `collection`, reached through `rpc_url`.
    pub fn new(rpc_url: Url, collection: Address) -> Self {
        let provider = ProviderBuilder::new().connect_http(rpc_url);
        Self {
            provider,
            collection,
        }
    }
}

#[async_trait]
impl CollectionReader for ChainClient {
    async fn balance_of(&self, owner: Address) -> Result<U256, ChainError> {
        Erc721Collection::new(&self.provider, self.collection)
            .balance_of(owner)
            .await
    }

    async fn block_number(&self) -> Result<u64, ChainError> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| ChainError::RpcError(e.to_string()))
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("RPC error: {0}")]
    RpcError(String),

    #[error("Contract error: {0}")]
    ContractError(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),
}
