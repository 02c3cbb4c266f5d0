// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain types and constants.

use alloy::primitives::{address, Address};

/// EVM network configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Short selector name (`polygon`, `mumbai`)
    pub name: &'static str,
    /// Chain ID
    pub chain_id: u64,
    /// RPC endpoint URL
    pub rpc_url: &'static str,
    /// Block explorer URL
    pub explorer_url: &'static str,
}

/// Polygon PoS mainnet configuration.
pub const POLYGON_MAINNET: NetworkConfig = NetworkConfig {
    name: "polygon",
    chain_id: 137,
    rpc_url: "https://polygon-rpc.com",
    explorer_url: "https://polygonscan.com",
};

/// Polygon Mumbai testnet configuration.
pub const POLYGON_MUMBAI: NetworkConfig = NetworkConfig {
    name: "mumbai",
    chain_id: 80001,
    rpc_url: "https://rpc-mumbai.maticvigil.com",
    explorer_url: "https://mumbai.polygonscan.com",
};

/// Selector value that picks the testnet.
pub const NETWORK_MUMBAI: &str = "mumbai";

/// Resolve the target network from the chain selector.
///
/// Only `mumbai` selects the testnet; anything else (including no value)
/// means the production chain.
pub fn network_for_selector(raw: Option<&str>) -> NetworkConfig {
    let value = raw.unwrap_or_default().trim().to_ascii_lowercase();
    if value == NETWORK_MUMBAI {
        POLYGON_MUMBAI
    } else {
        POLYGON_MAINNET
    }
}

/// Sentinel address the collection contract treats as the chain's native token.
pub const NATIVE_TOKEN_ADDRESS: Address = address!("EeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE");
