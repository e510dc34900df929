use tasktrack_auth::{ClaimError, Claims};
use tasktrack_core::OwnerId;

/// Verified identity of the caller, attached by the authorization gate.
///
/// Only the gate constructs this after successful verification, so its
/// presence in a request's extensions means the request is authenticated.
/// Handlers receive it by type (`Extension<AuthContext>`).
#[derive(Debug, Clone, PartialEq)]
pub struct AuthContext {
    claims: Claims,
}

impl AuthContext {
    pub(crate) fn new(claims: Claims) -> Self {
        Self { claims }
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    /// The acting owner, read from the claim named `claim_name`.
    pub fn owner_id(&self, claim_name: &str) -> Result<OwnerId, ClaimError> {
        self.claims.owner_id(claim_name)
    }
}
