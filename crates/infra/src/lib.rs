//! Infrastructure layer: key-value persistence, identity provider, config.

pub mod config;
pub mod identity;
pub mod keys;
pub mod kv;
pub mod store;

pub use config::{AppConfig, ConfigError};
pub use identity::{GithubClient, IdentityError, IdentityProvider, IdpUser};
pub use keys::EntityKind;
pub use kv::{InMemoryKv, KeyValue, KvBackend, KvError};
#[cfg(feature = "redis")]
pub use kv::RedisKv;
pub use store::{KeyScope, Resource, ResourceStore, StoreError, TaskStore, UserStore};
