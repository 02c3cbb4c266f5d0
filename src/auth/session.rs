// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session tokens.
//!
//! A session is a stateless HS256 JWT signed with `SESSION_SECRET`. It carries
//! what the rest of the service needs from sign-in: the display name, the
//! avatar URL, and the upstream access token used to read the profile again
//! at voucher time.

use std::time::Duration;

use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use super::AuthError;

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// The signed-in user, as carried by the session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Provider user ID
    pub user_id: String,
    pub display_name: String,
    pub avatar_url: String,
    /// Upstream OAuth access token. Never serialized into responses.
    pub access_token: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    sub: String,
    name: String,
    picture: String,
    access_token: String,
    iat: i64,
    exp: i64,
}

/// Issues and verifies session tokens.
pub struct SessionCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl SessionCodec {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = CLOCK_SKEW_LEEWAY;
        validation.validate_aud = false;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    /// Session lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `session`, valid from now.
    pub fn issue(&self, session: &Session) -> Result<String, AuthError> {
        self.issue_at(session, chrono::Utc::now().timestamp())
    }

    /// Issue a token for `session` as if the current Unix time were `now`.
    pub fn issue_at(&self, session: &Session, now: i64) -> Result<String, AuthError> {
        let claims = SessionClaims {
            sub: session.user_id.clone(),
            name: session.display_name.clone(),
            picture: session.avatar_url.clone(),
            access_token: session.access_token.clone(),
            iat: now,
            exp: now + self.ttl.as_secs() as i64,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::InternalError(format!("failed to sign session: {e}")))
    }

    /// Verify a token and recover the session it carries.
    pub fn verify(&self, token: &str) -> Result<Session, AuthError> {
        let data = decode::<SessionClaims>(token, &self.decoding, &self.validation).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::MalformedToken,
            },
        )?;

        let claims = data.claims;
        Ok(Session {
            user_id: claims.sub,
            display_name: claims.name,
            avatar_url: claims.picture,
            access_token: claims.access_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Session {
        Session {
            user_id: "42".to_string(),
            display_name: "Alice".to_string(),
            avatar_url: "https://pbs.twimg.com/alice.jpg".to_string(),
            access_token: "upstream-token".to_string(),
        }
    }

    #[test]
    fn round_trips_session() {
        let codec = SessionCodec::new("secret", Duration::from_secs(3600));
        let token = codec.issue(&alice()).unwrap();
        assert_eq!(codec.verify(&token).unwrap(), alice());
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let ours = SessionCodec::new("secret", Duration::from_secs(3600));
        let theirs = SessionCodec::new("other", Duration::from_secs(3600));
        let token = theirs.issue(&alice()).unwrap();
        assert!(matches!(ours.verify(&token), Err(AuthError::InvalidSignature)));
    }

    #[test]
    fn rejects_expired_token() {
        let codec = SessionCodec::new("secret", Duration::from_secs(3600));
        let long_ago = chrono::Utc::now().timestamp() - 2 * 3600;
        let token = codec.issue_at(&alice(), long_ago).unwrap();
        assert!(matches!(codec.verify(&token), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn rejects_garbage() {
        let codec = SessionCodec::new("secret", Duration::from_secs(3600));
        assert!(matches!(codec.verify("not.a.jwt"), Err(AuthError::MalformedToken)));
    }
}
