use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use tasktrack_core::OwnerId;

use crate::CredentialError;

/// Reserved claim: issued-at, integer seconds since the Unix epoch.
pub const ISSUED_AT: &str = "iat";

/// Reserved claim: expiration, integer seconds since the Unix epoch.
pub const EXPIRATION: &str = "exp";

/// Claim set embedded in a credential.
///
/// An unordered mapping from claim names to JSON values. Backed by a
/// `BTreeMap` so that serialization is byte-stable for identical inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(BTreeMap<String, Value>);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClaimError {
    #[error("claim `{0}` is missing")]
    Missing(String),

    #[error("claim `{0}` does not hold an owner identifier")]
    InvalidOwner(String),
}

impl Claims {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim set with a single owner-identifier claim.
    pub fn for_owner(claim_name: impl Into<String>, owner_id: &OwnerId) -> Self {
        let mut claims = Self::new();
        claims.0.insert(claim_name.into(), Value::String(owner_id.to_string()));
        claims
    }

    /// Insert any serializable value under `name`, replacing an existing one.
    pub fn insert<T: Serialize>(&mut self, name: impl Into<String>, value: T) -> Result<(), CredentialError> {
        let value = serde_json::to_value(value).map_err(|e| CredentialError::Encoding(e.to_string()))?;
        self.0.insert(name.into(), value);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn issued_at(&self) -> Option<i64> {
        self.get(ISSUED_AT).and_then(Value::as_i64)
    }

    pub fn expires_at(&self) -> Option<i64> {
        self.get(EXPIRATION).and_then(Value::as_i64)
    }

    /// Resolve the acting owner from the claim named `claim_name`.
    ///
    /// Accepts a non-empty string or an integer.
    pub fn owner_id(&self, claim_name: &str) -> Result<OwnerId, ClaimError> {
        let value = self
            .get(claim_name)
            .ok_or_else(|| ClaimError::Missing(claim_name.to_string()))?;

        match value {
            Value::String(s) => OwnerId::new(s.as_str()).map_err(|_| ClaimError::InvalidOwner(claim_name.to_string())),
            Value::Number(n) => n
                .as_i64()
                .map(OwnerId::from)
                .ok_or_else(|| ClaimError::InvalidOwner(claim_name.to_string())),
            _ => Err(ClaimError::InvalidOwner(claim_name.to_string())),
        }
    }

    pub(crate) fn stamp(&mut self, issued_at: i64, expires_at: i64) {
        self.0.insert(ISSUED_AT.to_string(), Value::from(issued_at));
        self.0.insert(EXPIRATION.to_string(), Value::from(expires_at));
    }
}

impl FromIterator<(String, Value)> for Claims {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
