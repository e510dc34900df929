use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use tasktrack_auth::{ClaimError, CredentialError};
use tasktrack_core::DomainError;
use tasktrack_infra::{IdentityError, StoreError};

/// Everything a handler can fail with, mapped onto a status and a JSON body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unauthenticated")]
    Unauthenticated,

    #[error("not found")]
    NotFound,

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Credential(#[from] CredentialError),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<ClaimError> for ApiError {
    fn from(err: ClaimError) -> Self {
        tracing::debug!(error = %err, "verified credential carries no usable owner");
        ApiError::Unauthenticated
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthenticated => json_error(StatusCode::UNAUTHORIZED, "unauthenticated", "unauthenticated"),
            ApiError::NotFound | ApiError::Store(StoreError::NotFound) => {
                json_error(StatusCode::NOT_FOUND, "not_found", "not found")
            }
            ApiError::BadRequest(msg) => json_error(StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::Store(StoreError::Unavailable(msg)) => {
                tracing::error!(error = %msg, "store unavailable");
                json_error(StatusCode::SERVICE_UNAVAILABLE, "store_unavailable", "store unavailable")
            }
            ApiError::Store(err) => {
                tracing::error!(error = %err, "store error");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", "internal error")
            }
            ApiError::Identity(err) => {
                tracing::warn!(error = %err, "identity provider failure");
                json_error(StatusCode::BAD_GATEWAY, "identity_provider_error", "login failed")
            }
            ApiError::Credential(err) => {
                tracing::error!(error = %err, "failed to issue credential");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "credential_error", "internal error")
            }
        }
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_errors_to_statuses() {
        let cases = [
            (ApiError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (ApiError::NotFound, StatusCode::NOT_FOUND),
            (ApiError::Store(StoreError::NotFound), StatusCode::NOT_FOUND),
            (ApiError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::Store(StoreError::Unavailable("down".into())), StatusCode::SERVICE_UNAVAILABLE),
            (ApiError::Store(StoreError::Decoding("bad".into())), StatusCode::INTERNAL_SERVER_ERROR),
            (ApiError::Identity(IdentityError::Rejected("no".into())), StatusCode::BAD_GATEWAY),
            (ApiError::Credential(CredentialError::Encoding("x".into())), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn missing_owner_claim_is_unauthenticated() {
        let err: ApiError = ClaimError::Missing("userID".into()).into();
        assert!(matches!(err, ApiError::Unauthenticated));
    }
}
