//! Entity trait: a record with a stable identity.

/// A record identified by a strongly-typed id.
///
/// The id's `Display` form is what storage uses as the record's key
/// component.
pub trait Entity {
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
