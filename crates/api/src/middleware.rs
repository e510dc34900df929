use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use tasktrack_auth::CredentialValidator;

use crate::app::errors::ApiError;
use crate::context::AuthContext;

const BEARER: &str = "bearer ";

#[derive(Clone)]
pub struct AuthState {
    pub validator: Arc<dyn CredentialValidator>,
}

/// Authorization gate for every protected route.
///
/// Requests without a verifiable bearer credential are answered with 401
/// before any handler or store is touched. On success the verified claims
/// are attached to the request as an [`AuthContext`].
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let Some(token) = extract_bearer(req.headers()) else {
        tracing::debug!("missing or malformed authorization header");
        return ApiError::Unauthenticated.into_response();
    };

    let claims = match state.validator.verify(token) {
        Ok(claims) => claims,
        Err(err) => {
            // Detail stays in the log; the caller only learns "unauthenticated".
            tracing::debug!(error = %err, "credential rejected");
            return ApiError::Unauthenticated.into_response();
        }
    };

    req.extensions_mut().insert(AuthContext::new(claims));
    next.run(req).await
}

/// `Authorization: Bearer <token>`, scheme matched case-insensitively.
fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?.to_str().ok()?;

    let (scheme, rest) = header.split_at_checked(BEARER.len())?;
    if !scheme.eq_ignore_ascii_case(BEARER) {
        return None;
    }

    let token = rest.trim();
    if token.is_empty() {
        return None;
    }

    Some(token)
}

/// One structured line per request.
pub async fn log_requests(req: Request<axum::body::Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let res = next.run(req).await;

    tracing::info!(
        %method,
        %path,
        status = res.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    res
}
