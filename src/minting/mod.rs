// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signature-based minting.
//!
//! - `service` - voucher issuance behind `POST /api/server`
//! - `ledger` - per-address reservations that keep issuance one-at-a-time
//! - `metadata` - the NFT metadata document
//! - `flow` - the client's mint sequence as a state machine

pub mod flow;
pub mod ledger;
pub mod metadata;
pub mod service;

pub use flow::{Effect, FlowAlert, MintAction, MintFlow, MintStage, WalletAccount};
pub use ledger::VoucherLedger;
pub use metadata::{NftMetadata, NftProperties};
pub use service::{VoucherError, VoucherService};
