// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signing key loading.
//!
//! The voucher signing key is configured either as a hex string (with or
//! without `0x`) or as a SEC1/PKCS#8 PEM block. PEM values copied into a
//! single-line environment variable may carry literal `\n` sequences; those
//! are normalised before parsing.

use alloy::signers::local::PrivateKeySigner;
use k256::SecretKey;

use super::client::ChainError;

/// Parse a private key from PEM format to hex string.
///
/// # Returns
/// * `Ok(String)` - Hex-encoded private key (64 characters, no 0x prefix)
/// * `Err(ChainError)` - If PEM parsing fails
pub fn pem_to_hex(pem_bytes: &[u8]) -> Result<String, ChainError> {
    let pem_str = std::str::from_utf8(pem_bytes)
        .map_err(|e| ChainError::InvalidPrivateKey(format!("Invalid UTF-8: {}", e)))?;

    let pem = pem::parse(pem_str)
        .map_err(|e| ChainError::InvalidPrivateKey(format!("Invalid PEM: {}", e)))?;

    let secret_key = SecretKey::from_sec1_der(pem.contents())
        .or_else(|_| parse_pkcs8_to_secret_key(pem.contents()))
        .map_err(|e| ChainError::InvalidPrivateKey(format!("Invalid key format: {}", e)))?;

    Ok(alloy::hex::encode(secret_key.to_bytes()))
}

fn parse_pkcs8_to_secret_key(der: &[u8]) -> Result<SecretKey, String> {
    use k256::pkcs8::DecodePrivateKey;
    SecretKey::from_pkcs8_der(der).map_err(|e| e.to_string())
}

/// Create a signer from a hex private key (with or without `0x`).
pub fn signer_from_hex(private_key_hex: &str) -> Result<PrivateKeySigner, ChainError> {
    let trimmed = private_key_hex.trim();
    let key_bytes = alloy::hex::decode(trimmed.strip_prefix("0x").unwrap_or(trimmed))
        .map_err(|e| ChainError::InvalidPrivateKey(e.to_string()))?;

    PrivateKeySigner::from_slice(&key_bytes)
        .map_err(|e| ChainError::InvalidPrivateKey(e.to_string()))
}

/// Create a signer from whatever key material the operator configured.
pub fn signer_from_key_material(raw: &str) -> Result<PrivateKeySigner, ChainError> {
    let raw = raw.trim();
    if raw.starts_with("-----BEGIN") {
        let normalised = raw.replace("\\n", "\n");
        let hex_key = pem_to_hex(normalised.as_bytes())?;
        signer_from_hex(&hex_key)
    } else {
        signer_from_hex(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_HEX: &str = "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    fn test_pem() -> String {
        use k256::pkcs8::{EncodePrivateKey, LineEnding};
        let bytes = alloy::hex::decode(TEST_HEX).unwrap();
        let secret = SecretKey::from_slice(&bytes).unwrap();
        secret.to_pkcs8_pem(LineEnding::LF).unwrap().to_string()
    }

    #[test]
    fn test_pem_to_hex() {
        let hex = pem_to_hex(test_pem().as_bytes()).expect("PEM parses");
        assert_eq!(hex, TEST_HEX);
    }

    #[test]
    fn hex_with_and_without_prefix_give_same_signer() {
        let bare = signer_from_key_material(TEST_HEX).unwrap();
        let prefixed = signer_from_key_material(&format!("0x{TEST_HEX}")).unwrap();
        assert_eq!(bare.address(), prefixed.address());
        assert_eq!(
            bare.address().to_checksum(None),
            "0x2c7536E3605D9C16a7a3D7b1898e529396a65c23"
        );
    }

    #[test]
    fn escaped_single_line_pem_is_accepted() {
        let pem = test_pem();
        let single_line = pem.trim().replace('\n', "\\n");
        let from_escaped = signer_from_key_material(&single_line).unwrap();
        let from_pem = signer_from_key_material(&pem).unwrap();
        assert_eq!(from_escaped.address(), from_pem.address());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(
            signer_from_key_material("not a key"),
            Err(ChainError::InvalidPrivateKey(_))
        ));
    }
}
