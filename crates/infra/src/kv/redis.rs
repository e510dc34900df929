//! Redis-backed key-value store (optional).
//!
//! Uses a multiplexed, auto-reconnecting connection manager shared by all
//! request tasks. Prefix scans walk `SCAN MATCH` (which may repeat keys) and
//! then fetch the values with a single `MGET`.

use std::collections::BTreeSet;

use async_trait::async_trait;
use ::redis::AsyncCommands;
use ::redis::aio::ConnectionManager;

use super::{KeyValue, KvBackend, KvError, KvResult};

#[derive(Clone)]
pub struct RedisKv {
    conn: ConnectionManager,
    endpoint: String,
}

impl core::fmt::Debug for RedisKv {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RedisKv").field("endpoint", &self.endpoint).finish()
    }
}

impl RedisKv {
    /// Connect to the first reachable endpoint of `endpoints`.
    pub async fn connect(endpoints: &[String]) -> KvResult<Self> {
        let mut last_err = None;

        for endpoint in endpoints {
            match Self::connect_one(endpoint).await {
                Ok(kv) => {
                    tracing::info!(endpoint = %endpoint, "connected to kv endpoint");
                    return Ok(kv);
                }
                Err(e) => {
                    tracing::warn!(endpoint = %endpoint, error = %e, "kv endpoint unreachable");
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| KvError::unavailable("no kv endpoints configured")))
    }

    async fn connect_one(endpoint: &str) -> KvResult<Self> {
        let client = ::redis::Client::open(endpoint).map_err(map_redis_error)?;
        let conn = ConnectionManager::new(client).await.map_err(map_redis_error)?;
        Ok(Self {
            conn,
            endpoint: endpoint.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn map_redis_error(e: ::redis::RedisError) -> KvError {
    KvError::unavailable(e.to_string())
}

/// Escape Redis glob metacharacters so `prefix` matches literally.
fn escape_glob(prefix: &str) -> String {
    let mut out = String::with_capacity(prefix.len());
    for c in prefix.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\' | '^') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[async_trait]
impl KvBackend for RedisKv {
    async fn get(&self, key: &str) -> KvResult<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        conn.get(key).await.map_err(map_redis_error)
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> KvResult<()> {
        let mut conn = self.conn.clone();
        conn.set(key, value).await.map_err(map_redis_error)
    }

    async fn delete(&self, key: &str) -> KvResult<()> {
        let mut conn = self.conn.clone();
        let _removed: i64 = conn.del(key).await.map_err(map_redis_error)?;
        Ok(())
    }

    async fn scan_prefix(&self, prefix: &str) -> KvResult<Vec<KeyValue>> {
        let mut conn = self.conn.clone();
        let pattern = format!("{}*", escape_glob(prefix));

        let mut keys = BTreeSet::new();
        {
            let mut iter = conn
                .scan_match::<_, String>(&pattern)
                .await
                .map_err(map_redis_error)?;
            while let Some(key) = iter.next_item().await {
                keys.insert(key);
            }
        }

        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<String> = keys.into_iter().collect();
        let values: Vec<Option<Vec<u8>>> = conn.mget(&keys).await.map_err(map_redis_error)?;

        Ok(present_entries(keys, values))
    }
}

/// Pair scanned keys with their MGET values. A key deleted between SCAN and
/// MGET comes back as nil and is skipped.
fn present_entries(keys: Vec<String>, values: Vec<Option<Vec<u8>>>) -> Vec<KeyValue> {
    keys.into_iter()
        .zip(values)
        .filter_map(|(key, value)| value.map(|v| KeyValue::new(key, v)))
        .collect()
}
