// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! ERC-721 collection contract interactions.

use alloy::{
    primitives::{Address, U256},
    providers::Provider,
    sol,
};
use async_trait::async_trait;

use super::client::ChainError;

// Only the read side of the collection is needed server-side; redemption
// (`mintWithSignature`) is submitted by the user's own wallet.
sol! {
    #[sol(rpc)]
    interface IERC721 {
        function balanceOf(address owner) external view returns (uint256);
    }
}

/// Read access to the collection contract's ownership state.
#[async_trait]
pub trait CollectionReader: Send + Sync {
    /// Number of tokens `owner` holds in the collection.
    async fn balance_of(&self, owner: Address) -> Result<U256, ChainError>;

    /// Current head of the chain. Used as a connectivity probe.
    async fn block_number(&self) -> Result<u64, ChainError>;
}

/// ERC-721 contract wrapper.
pub struct Erc721Collection<P> {
    contract: IERC721::IERC721Instance<P>,
}

impl<P: Provider + Clone> Erc721Collection<P> {
    pub fn new(provider: &P, address: Address) -> Self {
        Self {
            contract: IERC721::new(address, provider.clone()),
        }
    }

    /// Get the number of tokens held by `owner`.
    pub async fn balance_of(&self, owner: Address) -> Result<U256, ChainError> {
        self.contract
            .balanceOf(owner)
            .call()
            .await
            .map_err(|e| ChainError::ContractError(e.to_string()))
    }
}

/// Whether an address holding `balance` tokens may still mint.
pub fn is_eligible(balance: U256) -> bool {
    balance.is_zero()
}
