use axum::{Router, routing::get};

pub mod login;
pub mod system;
pub mod tasks;

/// Router for all authenticated (owner-scoped) endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/task", tasks::router())
}

/// Router for endpoints reachable without a credential.
pub fn public_router() -> Router {
    Router::new()
        .route("/", get(system::home))
        .route("/health", get(system::health))
        .route("/login/github", get(login::start))
        .route("/login/github/callback", get(login::callback))
}
