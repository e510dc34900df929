use chrono::{DateTime, Utc};

use crate::{Claims, CredentialError};

/// Verifies inbound credentials.
///
/// Pure and stateless: no I/O and no revocation check.
pub trait CredentialValidator: Send + Sync {
    /// Verify signature first, then expiry as of `now`, and return the full
    /// embedded claim set.
    fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, CredentialError>;

    fn verify(&self, token: &str) -> Result<Claims, CredentialError> {
        self.verify_at(token, Utc::now())
    }
}
