use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::{Claims, CredentialError};

/// Mints signed, time-bounded credentials.
pub trait CredentialIssuer: Send + Sync {
    /// Mint a credential as of `now`.
    ///
    /// Stamps issued-at = `now` and expiration = issued-at + `ttl` (whole
    /// seconds), overwriting any reserved claims already in `claims`. Output
    /// is deterministic for identical claims, secret and instant.
    fn mint_at(&self, claims: Claims, ttl: Duration, now: DateTime<Utc>) -> Result<String, CredentialError>;

    fn mint(&self, claims: Claims, ttl: Duration) -> Result<String, CredentialError> {
        self.mint_at(claims, ttl, Utc::now())
    }
}
