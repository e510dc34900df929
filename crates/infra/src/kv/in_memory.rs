use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::RwLock;

use async_trait::async_trait;

use super::{KeyValue, KvBackend, KvError, KvResult};

/// In-memory ordered key-value store for tests/dev.
///
/// Prefix scans are ordered range reads over the key space.
#[derive(Debug, Default)]
pub struct InMemoryKv {
    inner: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl InMemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> KvError {
    KvError::unavailable("in-memory store lock poisoned")
}

#[async_trait]
impl KvBackend for InMemoryKv {
    async fn get(&self, key: &str) -> KvResult<Option<Vec<u8>>> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> KvResult<()> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        map.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> KvResult<()> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        map.remove(key);
        Ok(())
    }

    async fn scan_prefix(&self, prefix: &str) -> KvResult<Vec<KeyValue>> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| KeyValue::new(k.clone(), v.clone()))
            .collect())
    }
}
