//! Ownership-scoped resource storage over a key-value backend.
//!
//! One generic [`ResourceStore`] serves every entity kind; the kind-specific
//! parts (key namespace, id, serde) come from the [`Resource`] capability.

pub mod error;
pub mod resource;
pub mod resource_store;

pub use error::StoreError;
pub use resource::{KeyScope, Resource};
pub use resource_store::ResourceStore;

use tasktrack_core::{Task, User};

pub type TaskStore = ResourceStore<Task>;
pub type UserStore = ResourceStore<User>;
