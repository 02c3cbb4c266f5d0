// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the REST API. All types derive `Serialize`,
//! `Deserialize`, and `ToSchema` for JSON handling and OpenAPI documentation.
//! Field names are camelCase on the wire, matching what the browser client
//! and the collection SDK expect.
//!
//! ## Model Categories
//!
//! - **Vouchers**: `POST /api/server` request and the signed payload
//! - **Images**: `POST /api/stability` and `POST /api/avatar`
//! - **Eligibility** and **Session** views

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::minting::NftMetadata;

// =============================================================================
// Voucher Models
// =============================================================================

/// Request for a mint voucher.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MintVoucherRequest {
    /// Wallet address the token will be minted to (0x-prefixed, 40 hex).
    pub author_address: String,
    /// Display name of the NFT.
    pub nft_name: String,
    /// URI of the artwork, usually `ipfs://...`.
    pub image_path: String,
}

/// The mint request exactly as signed, in the collection SDK's JSON shape.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VoucherPayload {
    /// Recipient, as sent in `authorAddress`.
    pub to: String,
    pub metadata: NftMetadata,
    /// URI of the uploaded metadata JSON.
    pub uri: String,
    /// Price in wei (decimal string).
    pub price: String,
    pub currency_address: String,
    /// Unix seconds.
    pub mint_start_time: u64,
    /// Unix seconds.
    pub mint_end_time: u64,
    /// 32-byte hex nonce.
    pub uid: String,
    pub royalty_recipient: String,
    pub royalty_bps: u64,
    pub primary_sale_recipient: String,
}

/// A voucher: the payload plus the minter's EIP-712 signature over it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct SignedPayload {
    pub payload: VoucherPayload,
    /// 65-byte `0x`-hex signature.
    pub signature: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SignedPayloadResponse {
    pub signed_payload: SignedPayload,
}

// =============================================================================
// Image Models
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct GenerateImageRequest {
    /// Text prompt for the image model.
    pub prompt: String,
}

/// A content-addressed URI.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UriResponse {
    pub uri: String,
}

// =============================================================================
// Eligibility / Session Models
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct EligibilityResponse {
    pub address: String,
    /// Tokens held in the collection (decimal string).
    pub balance: String,
    /// `true` when the address may still mint.
    pub eligible: bool,
}

/// What the browser may know about the session.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct SessionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUser>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct SessionUser {
    pub name: String,
    pub image: String,
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
