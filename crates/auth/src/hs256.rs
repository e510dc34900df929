//! HMAC-SHA-256 credentials (JWT compact serialization).

use std::collections::HashSet;
use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::{Claims, CredentialError, CredentialIssuer, CredentialValidator, EXPIRATION};

/// Issues and verifies HS256-signed credentials with a shared secret.
///
/// The secret is immutable after construction; the value is safe to share
/// across request tasks behind an `Arc`.
#[derive(Clone)]
pub struct Hs256Credentials {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl Hs256Credentials {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let secret = secret.as_ref();

        // Signature and structure only; expiry is checked against the caller's clock.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.required_spec_claims = HashSet::from([EXPIRATION.to_string()]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }
}

impl core::fmt::Debug for Hs256Credentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hs256Credentials").field("secret", &"<redacted>").finish()
    }
}

impl CredentialIssuer for Hs256Credentials {
    fn mint_at(&self, mut claims: Claims, ttl: Duration, now: DateTime<Utc>) -> Result<String, CredentialError> {
        let issued_at = now.timestamp();
        let ttl_secs = i64::try_from(ttl.as_secs())
            .map_err(|_| CredentialError::Encoding("ttl out of range".to_string()))?;
        let expires_at = issued_at
            .checked_add(ttl_secs)
            .ok_or_else(|| CredentialError::Encoding("expiration out of range".to_string()))?;

        claims.stamp(issued_at, expires_at);

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| CredentialError::Encoding(e.to_string()))
    }
}

impl CredentialValidator for Hs256Credentials {
    fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, CredentialError> {
        let claims = decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                match e.kind() {
                    ErrorKind::InvalidSignature => tracing::debug!("credential signature mismatch"),
                    other => tracing::debug!(error = ?other, "malformed credential"),
                }
                CredentialError::InvalidSignature
            })?;

        let expires_at = claims.expires_at().ok_or(CredentialError::InvalidSignature)?;
        // The validity window is [iat, exp): a zero-ttl credential is born expired.
        if now.timestamp() >= expires_at {
            return Err(CredentialError::Expired);
        }

        Ok(claims)
    }
}
