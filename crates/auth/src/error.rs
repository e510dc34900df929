use thiserror::Error;

/// Credential minting/verification failure.
///
/// `InvalidSignature` and `Expired` are kept apart for diagnostics only; the
/// request boundary collapses both into the same unauthenticated outcome.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("failed to encode credential: {0}")]
    Encoding(String),

    /// Signature mismatch or a token that is not a well-formed credential.
    #[error("invalid credential signature or structure")]
    InvalidSignature,

    #[error("credential has expired")]
    Expired,
}
