// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! PKCE (RFC 7636) and CSRF state generation.

use base64ct::{Base64UrlUnpadded, Encoding};
use ring::rand::{SecureRandom, SystemRandom};
use sha2::{Digest, Sha256};

use super::AuthError;

fn random_token<const N: usize>() -> Result<String, AuthError> {
    let mut bytes = [0u8; N];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| AuthError::InternalError("system RNG unavailable".to_string()))?;
    Ok(Base64UrlUnpadded::encode_string(&bytes))
}

/// Random code verifier: 48 bytes → 64 URL-safe characters.
pub fn generate_code_verifier() -> Result<String, AuthError> {
    random_token::<48>()
}

/// `BASE64URL(SHA256(verifier))`
pub fn generate_code_challenge(verifier: &str) -> String {
    Base64UrlUnpadded::encode_string(&Sha256::digest(verifier.as_bytes()))
}

/// Random state parameter: 16 bytes → 22 URL-safe characters.
pub fn generate_state() -> Result<String, AuthError> {
    random_token::<16>()
}
