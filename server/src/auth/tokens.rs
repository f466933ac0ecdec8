use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use shared::types::{TokenClaims, User};

#[derive(Error, Debug)]
pub enum AuthError {
    /// Malformed, expired or mis-signed token.  Wraps the underlying
    /// jsonwebtoken failure; callers map this to 401.
    #[error("invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
}

/// Signing material for both token families.
///
/// Access and refresh tokens use separate secrets and separate expiry
/// windows; expiry is the only invalidation mechanism (no revocation
/// list, no rotation tracking).
pub struct TokenKeys {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_expiry_secs: u64,
    refresh_expiry_secs: u64,
}

impl TokenKeys {
    pub fn new(
        access_secret: &str,
        refresh_secret: &str,
        access_expiry_secs: u64,
        refresh_expiry_secs: u64,
    ) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(refresh_secret.as_bytes()),
            access_expiry_secs,
            refresh_expiry_secs,
        }
    }

    /// Sign an access token for `user`.
    ///
    /// The claims embed the full (already redacted) user record under
    /// `sub` — a compatibility contract with existing clients that read
    /// user fields off the decoded token.
    pub fn issue_access(&self, user: &User) -> Result<String, AuthError> {
        issue(user, &self.access_encoding, self.access_expiry_secs)
    }

    /// Sign a refresh token for `user`.
    pub fn issue_refresh(&self, user: &User) -> Result<String, AuthError> {
        issue(user, &self.refresh_encoding, self.refresh_expiry_secs)
    }

    pub fn verify_access(&self, token: &str) -> Result<TokenClaims, AuthError> {
        verify(token, &self.access_decoding)
    }

    pub fn verify_refresh(&self, token: &str) -> Result<TokenClaims, AuthError> {
        verify(token, &self.refresh_decoding)
    }
}

fn issue(user: &User, key: &EncodingKey, expiry_secs: u64) -> Result<String, AuthError> {
    let claims = TokenClaims {
        id: user.id.clone(),
        sub: user.clone(),
        exp: unix_now() + expiry_secs,
    };

    Ok(encode(&Header::default(), &claims, key)?)
}

fn verify(token: &str, key: &DecodingKey) -> Result<TokenClaims, AuthError> {
    let mut validation = Validation::default();
    // Expiry is the only invalidation mechanism, so enforce it exactly.
    validation.leeway = 0;

    let data = decode::<TokenClaims>(token, key, &validation)?;
    Ok(data.claims)
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
