//! `tasktrack-auth`: stateless credential issuance and verification.
//!
//! This crate is intentionally decoupled from HTTP and storage. A credential
//! is a signed, self-contained claim set: possession of a structurally valid,
//! correctly signed and unexpired token is the whole proof. There is no
//! server-side session and no revocation list.

pub mod claims;
pub mod error;
pub mod hs256;
pub mod issuer;
pub mod validator;

pub use claims::{ClaimError, Claims, EXPIRATION, ISSUED_AT};
pub use error::CredentialError;
pub use hs256::Hs256Credentials;
pub use issuer::CredentialIssuer;
pub use validator::CredentialValidator;
