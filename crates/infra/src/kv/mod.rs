//! Key-value backend abstraction.
//!
//! The backend is a process-wide shared client, safe for concurrent use by
//! many in-flight requests. Every write is a single-key unconditional put;
//! concurrent writers to the same key race with last-write-wins.

use async_trait::async_trait;
use thiserror::Error;

pub mod in_memory;
#[cfg(feature = "redis")]
pub mod redis;

pub use in_memory::InMemoryKv;
#[cfg(feature = "redis")]
pub use self::redis::RedisKv;

pub type KvResult<T> = Result<T, KvError>;

/// A key and its raw value, as returned by prefix scans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: Vec<u8>,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Backend transport failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KvError {
    #[error("kv backend unavailable: {0}")]
    Unavailable(String),
}

impl KvError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}

#[async_trait]
pub trait KvBackend: Send + Sync {
    /// Point lookup. `Ok(None)` when the key is absent.
    async fn get(&self, key: &str) -> KvResult<Option<Vec<u8>>>;

    /// Unconditional overwrite.
    async fn put(&self, key: &str, value: Vec<u8>) -> KvResult<()>;

    /// Unconditional delete; absent keys are not an error.
    async fn delete(&self, key: &str) -> KvResult<()>;

    /// All entries whose key starts with `prefix`, in backend order.
    async fn scan_prefix(&self, prefix: &str) -> KvResult<Vec<KeyValue>>;
}
