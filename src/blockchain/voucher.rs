// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! EIP-712 mint voucher signing.
//!
//! The collection contract's `mintWithSignature(MintRequest, bytes)` recovers
//! the signer of a typed-data hash over [`MintRequest`] and only accepts it if
//! the signer holds the minter role. The server therefore never submits
//! transactions; it hands out signatures scoped to one recipient and one
//! metadata URI.

use alloy::{
    primitives::{Address, Signature, B256},
    signers::{local::PrivateKeySigner, SignerSync},
    sol,
    sol_types::{eip712_domain, Eip712Domain, SolStruct},
};

use super::client::ChainError;

sol! {
    #[derive(Debug, PartialEq, Eq)]
    struct MintRequest {
        address to;
        address royaltyRecipient;
        uint256 royaltyBps;
        address primarySaleRecipient;
        string uri;
        uint256 price;
        address currency;
        uint128 validityStartTimestamp;
        uint128 validityEndTimestamp;
        bytes32 uid;
    }
}

/// EIP-712 domain name used by the collection contract.
pub const DOMAIN_NAME: &str = "TokenERC721";
/// EIP-712 domain version used by the collection contract.
pub const DOMAIN_VERSION: &str = "1";

/// Signs mint requests for one collection on one chain.
#[derive(Clone)]
pub struct VoucherSigner {
    signer: PrivateKeySigner,
    domain: Eip712Domain,
}

impl VoucherSigner {
    pub fn new(signer: PrivateKeySigner, chain_id: u64, collection: Address) -> Self {
        let domain = eip712_domain! {
            name: DOMAIN_NAME,
            version: DOMAIN_VERSION,
            chain_id: chain_id,
            verifying_contract: collection,
        };
        Self { signer, domain }
    }

    /// Address the collection contract will recover from our signatures.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Typed-data hash of `request` under this signer's domain.
    pub fn signing_hash(&self, request: &MintRequest) -> B256 {
        request.eip712_signing_hash(&self.domain)
    }

    /// Sign `request`, returning the 65-byte `r || s || v` signature.
    pub fn sign(&self, request: &MintRequest) -> Result<Signature, ChainError> {
        let hash = self.signing_hash(request);
        self.signer
            .sign_hash_sync(&hash)
            .map_err(|e| ChainError::SigningFailed(e.to_string()))
    }
}

impl std::fmt::Debug for VoucherSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoucherSigner")
            .field("address", &self.signer.address())
            .field("chain_id", &self.domain.chain_id)
            .finish()
    }
}
