// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain integration for the Polygon NFT collection.
//!
//! This module provides functionality for:
//! - Reading a holder's balance in the collection
//! - Signing mint vouchers (EIP-712 `MintRequest`) with the minter key
//! - Loading that key from hex or PEM

pub mod client;
pub mod collection;
pub mod signing;
pub mod types;
pub mod voucher;

pub use client::{ChainClient, ChainError};
pub use collection::CollectionReader;
pub use types::*;
pub use voucher::{MintRequest, VoucherSigner};
