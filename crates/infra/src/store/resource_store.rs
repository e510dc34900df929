use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use tracing::instrument;

use tasktrack_core::OwnerId;

use super::resource::{KeyScope, Resource, key_for};
use super::StoreError;
use crate::keys;
use crate::kv::{KvBackend, KvResult};

/// Default deadline for a single backend call.
pub const DEFAULT_OP_TIMEOUT: Duration = Duration::from_secs(5);

/// CRUD over a key-value backend, scoped to an owner's key namespace.
///
/// Every operation is a single backend call under a deadline; dropping the
/// returned future (e.g. on client disconnect) drops the in-flight call.
pub struct ResourceStore<R> {
    backend: Arc<dyn KvBackend>,
    op_timeout: Duration,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for ResourceStore<R> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            op_timeout: self.op_timeout,
            _resource: PhantomData,
        }
    }
}

impl<R> core::fmt::Debug for ResourceStore<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ResourceStore")
            .field("op_timeout", &self.op_timeout)
            .finish_non_exhaustive()
    }
}

impl<R: Resource> ResourceStore<R> {
    pub fn new(backend: Arc<dyn KvBackend>) -> Self {
        Self::with_timeout(backend, DEFAULT_OP_TIMEOUT)
    }

    pub fn with_timeout(backend: Arc<dyn KvBackend>, op_timeout: Duration) -> Self {
        Self {
            backend,
            op_timeout,
            _resource: PhantomData,
        }
    }

    /// Serialize `record` and write it under its key. Unconditional overwrite.
    #[instrument(skip(self, record), fields(kind = %R::KIND, owner_id = %owner), err)]
    pub async fn upsert(&self, owner: &OwnerId, record: &R) -> Result<(), StoreError> {
        let id = record.resource_id();
        let key = key_for::<R>(owner, &id).ok_or_else(|| StoreError::OwnerMismatch {
            owner: owner.to_string(),
            id: id.clone(),
        })?;

        let bytes = serde_json::to_vec(record).map_err(|e| StoreError::Encoding(e.to_string()))?;
        self.deadline("upsert", self.backend.put(&key, bytes)).await?;

        tracing::debug!(key = %key, "record stored");
        Ok(())
    }

    /// Point lookup of record `id` in `owner`'s namespace.
    #[instrument(skip(self), fields(kind = %R::KIND, owner_id = %owner))]
    pub async fn read(&self, owner: &OwnerId, id: &str) -> Result<R, StoreError> {
        let key = key_for::<R>(owner, id).ok_or(StoreError::NotFound)?;

        let bytes = self
            .deadline("read", self.backend.get(&key))
            .await?
            .ok_or(StoreError::NotFound)?;

        decode(&bytes)
    }

    /// Every record of this kind owned by `owner`, in backend order.
    ///
    /// Returns an empty vector when the owner has none.
    #[instrument(skip(self), fields(kind = %R::KIND, owner_id = %owner), err)]
    pub async fn read_all(&self, owner: &OwnerId) -> Result<Vec<R>, StoreError> {
        match R::SCOPE {
            KeyScope::PerOwner => {
                let prefix = keys::entity_prefix(R::KIND, owner);
                let entries = self.deadline("read_all", self.backend.scan_prefix(&prefix)).await?;
                entries.iter().map(|kv| decode(&kv.value)).collect()
            }
            KeyScope::SelfOwned => match self.read(owner, owner.as_str()).await {
                Ok(record) => Ok(vec![record]),
                Err(StoreError::NotFound) => Ok(Vec::new()),
                Err(e) => Err(e),
            },
        }
    }

    /// Remove record `id`. Deleting an absent record is not an error.
    #[instrument(skip(self), fields(kind = %R::KIND, owner_id = %owner), err)]
    pub async fn delete(&self, owner: &OwnerId, id: &str) -> Result<(), StoreError> {
        let Some(key) = key_for::<R>(owner, id) else {
            return Ok(());
        };
        self.deadline("delete", self.backend.delete(&key)).await
    }

    async fn deadline<T>(&self, op: &'static str, call: impl Future<Output = KvResult<T>>) -> Result<T, StoreError> {
        match tokio::time::timeout(self.op_timeout, call).await {
            Ok(result) => result.map_err(|e| StoreError::Unavailable(e.to_string())),
            Err(_elapsed) => Err(StoreError::Unavailable(format!(
                "{op} exceeded deadline of {:?}",
                self.op_timeout
            ))),
        }
    }
}

fn decode<R: Resource>(bytes: &[u8]) -> Result<R, StoreError> {
    serde_json::from_slice(bytes).map_err(|e| StoreError::Decoding(e.to_string()))
}
