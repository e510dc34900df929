use serde::Serialize;
use serde::de::DeserializeOwned;

use tasktrack_core::{Entity, OwnerId, Task, User};

use crate::keys::{self, EntityKind};

/// How records of a kind are laid out in the key space.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum KeyScope {
    /// Many records per owner: `<kind>:<owner>:<id>`, enumerable by prefix scan.
    PerOwner,
    /// One record per owner, keyed by the owner itself: `<kind>:<owner>`.
    /// The record's id must equal the owner id.
    SelfOwned,
}

/// Capability a type needs to be persisted through a `ResourceStore`.
pub trait Resource: Entity + Serialize + DeserializeOwned + Send + Sync + 'static {
    const KIND: EntityKind;
    const SCOPE: KeyScope;

    /// Identifier used as the entity component of the storage key.
    fn resource_id(&self) -> String {
        self.id().to_string()
    }
}

impl Resource for Task {
    const KIND: EntityKind = EntityKind::Task;
    const SCOPE: KeyScope = KeyScope::PerOwner;
}

impl Resource for User {
    const KIND: EntityKind = EntityKind::User;
    const SCOPE: KeyScope = KeyScope::SelfOwned;
}

/// Storage key of record `id` in `owner`'s namespace, or `None` when the
/// pair cannot exist (a self-owned record asked for under another owner).
pub(crate) fn key_for<R: Resource>(owner: &OwnerId, id: &str) -> Option<String> {
    match R::SCOPE {
        KeyScope::PerOwner => Some(keys::entity_key(R::KIND, owner, id)),
        KeyScope::SelfOwned if owner.as_str() == id => Some(keys::owner_key(R::KIND, owner)),
        KeyScope::SelfOwned => None,
    }
}
