// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Voucher issuance.
//!
//! ## Steps
//!
//! 1. Validate the request (recipient must be a 20-byte hex address)
//! 2. Reserve the recipient in the [`VoucherLedger`]
//! 3. Refuse if the recipient already holds a token
//! 4. Require a session
//! 5. Read the caller's profile with the session's access token
//! 6. Assemble and upload the metadata
//! 7. Build and sign the `MintRequest`
//! 8. Commit the reservation for the voucher's validity window
//!
//! Any error before step 8 drops the reservation, which frees the address.
//! A holder always gets [`VoucherError::AlreadyMinted`], even while a voucher
//! it already redeemed is still inside its validity window.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use alloy::{
    hex,
    primitives::{keccak256, Address, U256},
};
use tracing::{info, warn};
use uuid::Uuid;

use super::ledger::{Refusal, VoucherLedger};
use super::metadata::NftMetadata;
use crate::auth::Session;
use crate::blockchain::{
    collection::is_eligible, ChainError, CollectionReader, MintRequest, VoucherSigner,
    NATIVE_TOKEN_ADDRESS,
};
use crate::content::{self, ContentError, ContentStore};
use crate::models::{MintVoucherRequest, SignedPayload, VoucherPayload};
use crate::profile::{ProfileError, ProfileSource};

const METADATA_FILE_NAME: &str = "metadata.json";

#[derive(Debug, thiserror::Error)]
pub enum VoucherError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Already minted")]
    AlreadyMinted,

    #[error("Voucher already issued")]
    Outstanding,

    #[error("Sign in required")]
    Unauthenticated,

    #[error("Too many outstanding vouchers")]
    LedgerFull,

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Content(#[from] ContentError),
}

/// Check a voucher request's shape and parse its recipient.
pub fn validate_request(request: &MintVoucherRequest) -> Result<Address, VoucherError> {
    let recipient = Address::from_str(&request.author_address).map_err(|_| {
        VoucherError::InvalidRequest(format!(
            "authorAddress is not a valid address: {}",
            request.author_address
        ))
    })?;

    if request.nft_name.trim().is_empty() {
        return Err(VoucherError::InvalidRequest("nftName must not be empty".to_string()));
    }
    if request.image_path.trim().is_empty() {
        return Err(VoucherError::InvalidRequest("imagePath must not be empty".to_string()));
    }

    Ok(recipient)
}

/// Issues signed mint vouchers.
pub struct VoucherService {
    collection: Arc<dyn CollectionReader>,
    profiles: Arc<dyn ProfileSource>,
    content: Arc<dyn ContentStore>,
    signer: VoucherSigner,
    ledger: VoucherLedger,
    ttl: Duration,
}

impl VoucherService {
    pub fn new(
        collection: Arc<dyn CollectionReader>,
        profiles: Arc<dyn ProfileSource>,
        content: Arc<dyn ContentStore>,
        signer: VoucherSigner,
        ttl: Duration,
    ) -> Self {
        Self {
            collection,
            profiles,
            content,
            signer,
            ledger: VoucherLedger::default(),
            ttl,
        }
    }

    /// The minter address vouchers are signed with.
    pub fn signer(&self) -> &VoucherSigner {
        &self.signer
    }

    pub fn ledger(&self) -> &VoucherLedger {
        &self.ledger
    }

    /// Issue a voucher for `request` on behalf of `session`.
    pub async fn issue(
        &self,
        request: &MintVoucherRequest,
        session: Option<&Session>,
    ) -> Result<SignedPayload, VoucherError> {
        let recipient = validate_request(request)?;

        let reservation = match self.ledger.reserve(recipient) {
            Ok(reservation) => reservation,
            Err(Refusal::Held) => {
                self.ensure_eligible(recipient).await?;
                warn!(recipient = %recipient, "Voucher request while one is outstanding");
                return Err(VoucherError::Outstanding);
            }
            Err(Refusal::Full) => {
                warn!(recipient = %recipient, "Voucher ledger is full");
                return Err(VoucherError::LedgerFull);
            }
        };

        self.ensure_eligible(recipient).await?;
        let session = session.ok_or(VoucherError::Unauthenticated)?;

        let profile = self.profiles.fetch_profile(&session.access_token).await?;
        let metadata = NftMetadata::assemble(&request.nft_name, &request.image_path, &profile);
        let uri = content::upload_json(self.content.as_ref(), METADATA_FILE_NAME, &metadata).await?;

        let start = chrono::Utc::now().timestamp().max(0) as u64;
        let end = start + self.ttl.as_secs();
        let uid = keccak256(Uuid::new_v4().as_bytes());

        let mint_request = MintRequest {
            to: recipient,
            royaltyRecipient: Address::ZERO,
            royaltyBps: U256::ZERO,
            primarySaleRecipient: Address::ZERO,
            uri: uri.clone(),
            price: U256::ZERO,
            currency: NATIVE_TOKEN_ADDRESS,
            validityStartTimestamp: u128::from(start),
            validityEndTimestamp: u128::from(end),
            uid,
        };
        let signature = self.signer.sign(&mint_request)?;

        reservation.commit(self.ttl);

        info!(
            recipient = %recipient,
            user_id = %session.user_id,
            uri = %uri,
            valid_until = end,
            "Issued mint voucher"
        );

        Ok(SignedPayload {
            payload: VoucherPayload {
                to: request.author_address.clone(),
                metadata,
                uri,
                price: mint_request.price.to_string(),
                currency_address: mint_request.currency.to_string(),
                mint_start_time: start,
                mint_end_time: end,
                uid: uid.to_string(),
                royalty_recipient: mint_request.royaltyRecipient.to_string(),
                royalty_bps: 0,
                primary_sale_recipient: mint_request.primarySaleRecipient.to_string(),
            },
            signature: hex::encode_prefixed(signature.as_bytes()),
        })
    }

    async fn ensure_eligible(&self, recipient: Address) -> Result<(), VoucherError> {
        let balance = self.collection.balance_of(recipient).await?;
        if !is_eligible(balance) {
            info!(recipient = %recipient, balance = %balance, "Recipient already holds a token");
            return Err(VoucherError::AlreadyMinted);
        }
        Ok(())
    }
}
