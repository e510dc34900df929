use thiserror::Error;

/// Resource store operation error.
///
/// `NotFound` is a normal outcome of a point lookup and is kept distinct from
/// backend failures. Nothing here is retried by the store itself.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("failed to encode record: {0}")]
    Encoding(String),

    #[error("failed to decode stored record: {0}")]
    Decoding(String),

    /// Backend transport failure or deadline exceeded.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A self-owned record was written under a different owner's namespace.
    #[error("record {id} cannot be stored under owner {owner}")]
    OwnerMismatch { owner: String, id: String },
}
