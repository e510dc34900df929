//! Storage key schema.
//!
//! Keys have the textual form `<kind>:<owner>:<entity>` (owned entities) or
//! `<kind>:<owner>` (entities that own themselves). Owner and entity
//! components are percent-encoded, so they never contain the `:` separator.
//!
//! Load-bearing invariant: `entity_prefix(kind, owner)` is a strict prefix of
//! every `entity_key(kind, owner, _)` and of no key for another owner or kind.
//! Prefix scans rely on it for owner isolation.

use std::borrow::Cow;

use tasktrack_core::OwnerId;

const SEPARATOR: char = ':';

/// Kind of entity stored under a key namespace.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Task,
    User,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Task => "task",
            EntityKind::User => "user",
        }
    }
}

impl core::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point key of one entity owned by `owner`.
pub fn entity_key(kind: EntityKind, owner: &OwnerId, entity_id: &str) -> String {
    format!(
        "{}{SEPARATOR}{}{SEPARATOR}{}",
        kind.as_str(),
        encode_component(owner.as_str()),
        encode_component(entity_id)
    )
}

/// Scan prefix covering exactly the entities of `kind` owned by `owner`.
///
/// Ends with the separator, so owner `4` never matches keys of owner `42`.
pub fn entity_prefix(kind: EntityKind, owner: &OwnerId) -> String {
    format!("{}{SEPARATOR}{}{SEPARATOR}", kind.as_str(), encode_component(owner.as_str()))
}

/// Point key of an entity keyed by its owner alone (`user:<ownerID>`).
pub fn owner_key(kind: EntityKind, owner: &OwnerId) -> String {
    format!("{}{SEPARATOR}{}", kind.as_str(), encode_component(owner.as_str()))
}

fn encode_component(raw: &str) -> Cow<'_, str> {
    urlencoding::encode(raw)
}
