//! External OAuth identity provider.
//!
//! The login flow treats the provider as a black box: an authorization code
//! goes in, an access token and a user-info record come out.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod github;

pub use github::GithubClient;

/// User-info record returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdpUser {
    pub id: i64,
    pub login: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Error)]
pub enum IdentityError {
    /// Network failure or timeout talking to the provider.
    #[error("identity provider request failed: {0}")]
    Transport(String),

    /// The provider answered but refused the exchange (bad code, bad token).
    #[error("identity provider rejected the request: {0}")]
    Rejected(String),

    #[error("unexpected identity provider response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// URL the browser is sent to in order to start the OAuth dance.
    fn authorize_url(&self, callback_url: &str) -> String;

    /// Exchange an authorization code for an opaque access token.
    async fn exchange_code(&self, code: &str) -> Result<String, IdentityError>;

    /// Fetch the user-info record for `access_token`.
    async fn user_info(&self, access_token: &str) -> Result<IdpUser, IdentityError>;
}
