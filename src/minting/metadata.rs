// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! NFT metadata assembled from the request and the caller's profile.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::profile::SocialProfile;

/// Token metadata, as stored behind the voucher's `uri`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct NftMetadata {
    pub name: String,
    /// URI of the artwork.
    pub image: String,
    /// The author's bio.
    pub description: String,
    pub properties: NftProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct NftProperties {
    /// Social handle of the author.
    pub username: String,
    /// Canonical profile URL of the author.
    pub link: String,
}

impl NftMetadata {
    pub fn assemble(name: &str, image: &str, profile: &SocialProfile) -> Self {
        Self {
            name: name.to_string(),
            image: image.to_string(),
            description: profile.description.clone(),
            properties: NftProperties {
                username: profile.username.clone(),
                link: profile.url.clone(),
            },
        }
    }
}
