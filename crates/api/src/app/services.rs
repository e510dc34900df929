use std::{sync::Arc, time::Duration};

use tasktrack_auth::CredentialIssuer;
use tasktrack_infra::{AppConfig, IdentityProvider, InMemoryKv, KvBackend, TaskStore, UserStore};

/// Shared, immutable service wiring handed to every handler.
pub struct AppServices {
    pub tasks: TaskStore,
    pub users: UserStore,
    pub issuer: Arc<dyn CredentialIssuer>,
    pub identity: Arc<dyn IdentityProvider>,
    /// Claim carrying the acting owner's id.
    pub owner_claim: String,
    pub credential_ttl: Duration,
    pub callback_url: String,
}

impl AppServices {
    pub fn new(
        config: &AppConfig,
        backend: Arc<dyn KvBackend>,
        issuer: Arc<dyn CredentialIssuer>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            tasks: TaskStore::with_timeout(backend.clone(), config.kv_timeout),
            users: UserStore::with_timeout(backend, config.kv_timeout),
            issuer,
            identity,
            owner_claim: config.owner_claim.clone(),
            credential_ttl: config.jwt_ttl,
            callback_url: config.github_callback_url(),
        }
    }
}

/// Pick the KV backend: Redis when endpoints are configured (and compiled in),
/// in-memory otherwise.
#[cfg(feature = "redis")]
pub async fn connect_backend(config: &AppConfig) -> anyhow::Result<Arc<dyn KvBackend>> {
    if config.kv_endpoints.is_empty() {
        tracing::info!("no KV endpoints configured; using in-memory store");
        return Ok(Arc::new(InMemoryKv::new()));
    }

    let kv = tasktrack_infra::RedisKv::connect(&config.kv_endpoints).await?;
    Ok(Arc::new(kv))
}

#[cfg(not(feature = "redis"))]
pub async fn connect_backend(config: &AppConfig) -> anyhow::Result<Arc<dyn KvBackend>> {
    if !config.kv_endpoints.is_empty() {
        tracing::warn!(
            endpoints = ?config.kv_endpoints,
            "KV endpoints configured but redis support is not compiled in; using in-memory store"
        );
    } else {
        tracing::info!("no KV endpoints configured; using in-memory store");
    }
    Ok(Arc::new(InMemoryKv::new()))
}
