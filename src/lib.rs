// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Social NFT Minter - signature-based minting voucher service
//!
//! Users sign in with Twitter/X, connect a wallet, and mint one NFT per
//! wallet whose artwork is their profile picture or an AI-generated image.
//! The server never sends transactions: it issues EIP-712 signed vouchers
//! that the user's wallet redeems on the collection contract.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Twitter/X OAuth 2.0 sign-in and session tokens
//! - `blockchain` - Polygon collection reads and voucher signing
//! - `minting` - Voucher issuance, the voucher ledger, and the client mint flow
//! - `content` - Content-addressed storage (IPFS)
//! - `imaging` - Text-to-image generation (Stability AI)
//! - `profile` - Social profile lookup

pub mod api;
pub mod auth;
pub mod blockchain;
pub mod config;
pub mod content;
pub mod error;
pub mod imaging;
pub mod minting;
pub mod models;
pub mod profile;
pub mod state;

#[cfg(test)]
mod testing;
