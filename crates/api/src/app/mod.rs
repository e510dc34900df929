//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store, credential and identity-provider wiring
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response bodies
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use tasktrack_auth::Hs256Credentials;
use tasktrack_infra::{AppConfig, IdentityProvider, KvBackend};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
///
/// One HS256 key pair serves both as the issuer for login and as the
/// validator behind the authorization gate.
pub fn build_app(config: &AppConfig, backend: Arc<dyn KvBackend>, identity: Arc<dyn IdentityProvider>) -> Router {
    let credentials = Arc::new(Hs256Credentials::new(config.jwt_secret.as_bytes()));
    let auth_state = middleware::AuthState {
        validator: credentials.clone(),
    };

    let services = Arc::new(services::AppServices::new(config, backend, credentials, identity));

    // Protected routes: the gate runs before any handler.
    let protected = routes::router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    Router::new()
        .merge(routes::public_router())
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::log_requests))
                .layer(Extension(services)),
        )
}
