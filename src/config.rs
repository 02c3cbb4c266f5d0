// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded once at startup into
//! an [`AppConfig`] that is handed to every handler through `AppState`.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `APP_URL` | Public URL of the web app (redirect target) | `http://localhost:3000` |
//! | `TWITTER_CLIENT_ID` | OAuth 2.0 client ID | Required |
//! | `TWITTER_CLIENT_SECRET` | OAuth 2.0 client secret | Required |
//! | `SESSION_SECRET` | HMAC secret for session tokens | Required |
//! | `MINTER_PRIVATE_KEY` | Voucher signing key (hex or PEM) | Required |
//! | `NFT_COLLECTION_ADDRESS` | ERC-721 collection contract | Required |
//! | `DESIRED_CHAIN` | `mumbai` or `polygon` | `polygon` |
//! | `RPC_URL` | JSON-RPC endpoint override | Chain default |
//! | `STABILITY_API_KEY` | Image generation API key | Optional (checked per request) |
//! | `IPFS_API_URL` | IPFS HTTP API used for uploads | `http://127.0.0.1:5001` |
//! | `VOUCHER_TTL_SECS` | Voucher validity window | `3600` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |
//!
//! Several variables also accept the names the web app's `.env.local` uses
//! (`NEXTAUTH_SECRET`, `PRIVATE_KEY`, `DREAMSTUDIO_API_KEY`,
//! `NEXT_PUBLIC_NFT_COLLECTION_ADDRESS`, `NEXT_PUBLIC_DESIRED_CHAIN`), so the
//! same file can configure both.

use std::{str::FromStr, time::Duration};

use alloy::{primitives::Address, signers::local::PrivateKeySigner};
use url::Url;

use crate::blockchain::{network_for_selector, signing::signer_from_key_material, NetworkConfig};

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const APP_URL_ENV: &str = "APP_URL";
pub const AUTH_CALLBACK_URL_ENV: &str = "AUTH_CALLBACK_URL";

pub const TWITTER_CLIENT_ID_ENV: &str = "TWITTER_CLIENT_ID";
pub const TWITTER_CLIENT_SECRET_ENV: &str = "TWITTER_CLIENT_SECRET";
pub const TWITTER_API_BASE_ENV: &str = "TWITTER_API_BASE";
pub const TWITTER_AUTH_URL_ENV: &str = "TWITTER_AUTH_URL";
pub const TWITTER_TOKEN_URL_ENV: &str = "TWITTER_TOKEN_URL";

/// Session token secret. `NEXTAUTH_SECRET` is accepted as a fallback.
pub const SESSION_SECRET_ENV: &[&str] = &["SESSION_SECRET", "NEXTAUTH_SECRET"];
pub const SESSION_TTL_ENV: &str = "SESSION_TTL_SECS";

/// Voucher signing key. Never logged.
pub const MINTER_PRIVATE_KEY_ENV: &[&str] = &["MINTER_PRIVATE_KEY", "PRIVATE_KEY"];
pub const NFT_COLLECTION_ADDRESS_ENV: &[&str] =
    &["NFT_COLLECTION_ADDRESS", "NEXT_PUBLIC_NFT_COLLECTION_ADDRESS"];
pub const DESIRED_CHAIN_ENV: &[&str] = &["DESIRED_CHAIN", "NEXT_PUBLIC_DESIRED_CHAIN"];
pub const RPC_URL_ENV: &str = "RPC_URL";
pub const VOUCHER_TTL_ENV: &str = "VOUCHER_TTL_SECS";

pub const STABILITY_API_KEY_ENV: &[&str] = &["STABILITY_API_KEY", "DREAMSTUDIO_API_KEY"];
pub const STABILITY_API_BASE_ENV: &str = "STABILITY_API_BASE";
pub const STABILITY_ENGINE_ENV: &str = "STABILITY_ENGINE";
pub const STABILITY_TIMEOUT_ENV: &str = "STABILITY_TIMEOUT_SECS";

pub const IPFS_API_URL_ENV: &str = "IPFS_API_URL";
pub const IPFS_GATEWAY_URL_ENV: &str = "IPFS_GATEWAY_URL";

pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_APP_URL: &str = "http://localhost:3000";
const DEFAULT_TWITTER_API_BASE: &str = "https://api.twitter.com";
const DEFAULT_TWITTER_AUTH_URL: &str = "https://twitter.com/i/oauth2/authorize";
const DEFAULT_TWITTER_TOKEN_URL: &str = "https://api.twitter.com/2/oauth2/token";
const DEFAULT_STABILITY_API_BASE: &str = "https://api.stability.ai";
const DEFAULT_STABILITY_ENGINE: &str = "stable-diffusion-v1-6";
const DEFAULT_STABILITY_TIMEOUT_SECS: u64 = 120;
const DEFAULT_IPFS_API_URL: &str = "http://127.0.0.1:5001";
const DEFAULT_IPFS_GATEWAY_URL: &str = "https://ipfs.io/ipfs/";
const DEFAULT_VOUCHER_TTL_SECS: u64 = 3600;
const DEFAULT_SESSION_TTL_SECS: u64 = 30 * 24 * 3600;

/// Errors raised while loading configuration. All of them are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {0}")]
    Missing(String),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: String, reason: String },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    /// `json` (any case) selects JSON; anything else is pretty.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// OAuth 2.0 client settings for the social provider.
#[derive(Debug, Clone)]
pub struct TwitterConfig {
    pub client_id: String,
    pub client_secret: String,
    pub api_base: Url,
    pub auth_url: Url,
    pub token_url: Url,
    pub redirect_uri: Url,
}

/// Image generation settings.
#[derive(Debug, Clone)]
pub struct StabilityConfig {
    /// Checked per request so the rest of the service can run without it.
    pub api_key: Option<String>,
    pub api_base: Url,
    pub engine: String,
    pub timeout: Duration,
}

/// Content-addressed storage settings.
#[derive(Debug, Clone)]
pub struct IpfsConfig {
    pub api_url: Url,
    pub gateway_url: Url,
}

#[derive(Debug, Clone)]
pub struct TlsPaths {
    pub cert_path: String,
    pub key_path: String,
}

/// Fully resolved application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub app_url: Url,
    pub twitter: TwitterConfig,
    pub session_secret: String,
    pub session_ttl: Duration,
    pub signer: PrivateKeySigner,
    pub collection_address: Address,
    pub network: NetworkConfig,
    pub rpc_url: Url,
    pub voucher_ttl: Duration,
    pub stability: StabilityConfig,
    pub ipfs: IpfsConfig,
    pub tls: Option<TlsPaths>,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// `.env.local` and `.env` are read first if present; values already set
    /// in the environment win.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary lookup function.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Lookup(lookup);

        // Signing credential first: nothing else matters without it.
        let key_material = env.required(MINTER_PRIVATE_KEY_ENV)?;
        let signer = signer_from_key_material(&key_material).map_err(|e| ConfigError::Invalid {
            name: MINTER_PRIVATE_KEY_ENV[0].to_string(),
            reason: e.to_string(),
        })?;

        let collection_raw = env.required(NFT_COLLECTION_ADDRESS_ENV)?;
        let collection_address =
            Address::from_str(&collection_raw).map_err(|e| ConfigError::Invalid {
                name: NFT_COLLECTION_ADDRESS_ENV[0].to_string(),
                reason: e.to_string(),
            })?;

        let network = network_for_selector(env.optional(DESIRED_CHAIN_ENV).as_deref());
        let rpc_url = match env.optional(&[RPC_URL_ENV]) {
            Some(raw) => parse_url(RPC_URL_ENV, &raw)?,
            None => parse_url(RPC_URL_ENV, network.rpc_url)?,
        };

        let app_url = env.url(APP_URL_ENV, DEFAULT_APP_URL)?;
        let redirect_uri = match env.optional(&[AUTH_CALLBACK_URL_ENV]) {
            Some(raw) => parse_url(AUTH_CALLBACK_URL_ENV, &raw)?,
            None => app_url
                .join("/api/auth/callback/twitter")
                .map_err(|e| ConfigError::Invalid {
                    name: APP_URL_ENV.to_string(),
                    reason: e.to_string(),
                })?,
        };

        let twitter = TwitterConfig {
            client_id: env.required(&[TWITTER_CLIENT_ID_ENV])?,
            client_secret: env.required(&[TWITTER_CLIENT_SECRET_ENV])?,
            api_base: env.url(TWITTER_API_BASE_ENV, DEFAULT_TWITTER_API_BASE)?,
            auth_url: env.url(TWITTER_AUTH_URL_ENV, DEFAULT_TWITTER_AUTH_URL)?,
            token_url: env.url(TWITTER_TOKEN_URL_ENV, DEFAULT_TWITTER_TOKEN_URL)?,
            redirect_uri,
        };

        let session_secret = env.required(SESSION_SECRET_ENV)?;

        let stability = StabilityConfig {
            api_key: env.optional(STABILITY_API_KEY_ENV),
            api_base: env.url(STABILITY_API_BASE_ENV, DEFAULT_STABILITY_API_BASE)?,
            engine: env
                .optional(&[STABILITY_ENGINE_ENV])
                .unwrap_or_else(|| DEFAULT_STABILITY_ENGINE.to_string()),
            timeout: Duration::from_secs(
                env.number(STABILITY_TIMEOUT_ENV, DEFAULT_STABILITY_TIMEOUT_SECS)?,
            ),
        };

        let ipfs = IpfsConfig {
            api_url: env.url(IPFS_API_URL_ENV, DEFAULT_IPFS_API_URL)?,
            gateway_url: env.url(IPFS_GATEWAY_URL_ENV, DEFAULT_IPFS_GATEWAY_URL)?,
        };

        let tls = match (
            env.optional(&[TLS_CERT_PATH_ENV]),
            env.optional(&[TLS_KEY_PATH_ENV]),
        ) {
            (Some(cert_path), Some(key_path)) => Some(TlsPaths {
                cert_path,
                key_path,
            }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing(TLS_KEY_PATH_ENV.to_string())),
            (None, Some(_)) => return Err(ConfigError::Missing(TLS_CERT_PATH_ENV.to_string())),
        };

        let log_format = LogFormat::parse(env.optional(&[LOG_FORMAT_ENV]).as_deref());

        Ok(Self {
            host: env
                .optional(&[HOST_ENV])
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: env.number(PORT_ENV, DEFAULT_PORT as u64)? as u16,
            app_url,
            twitter,
            session_secret,
            session_ttl: Duration::from_secs(env.number(SESSION_TTL_ENV, DEFAULT_SESSION_TTL_SECS)?),
            signer,
            collection_address,
            network,
            rpc_url,
            voucher_ttl: Duration::from_secs(env.number(VOUCHER_TTL_ENV, DEFAULT_VOUCHER_TTL_SECS)?),
            stability,
            ipfs,
            tls,
            log_format,
        })
    }

    /// Whether cookies should carry the `Secure` attribute.
    pub fn secure_cookies(&self) -> bool {
        self.app_url.scheme() == "https"
    }
}

struct Lookup<F>(F);

impl<F> Lookup<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, names: &[&str]) -> Option<String> {
        names.iter().find_map(|name| {
            (self.0)(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        })
    }

    fn required(&self, names: &[&str]) -> Result<String, ConfigError> {
        self.optional(names)
            .ok_or_else(|| ConfigError::Missing(names[0].to_string()))
    }

    fn url(&self, name: &str, default: &str) -> Result<Url, ConfigError> {
        let raw = self.optional(&[name]).unwrap_or_else(|| default.to_string());
        parse_url(name, &raw)
    }

    fn number(&self, name: &str, default: u64) -> Result<u64, ConfigError> {
        match self.optional(&[name]) {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: name.to_string(),
                reason: format!("expected a non-negative integer, got `{raw}`"),
            }),
            None => Ok(default),
        }
    }
}

fn parse_url(name: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::Invalid {
        name: name.to_string(),
        reason: e.to_string(),
    })
}
