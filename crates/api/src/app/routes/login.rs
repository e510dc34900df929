//! Login through the external identity provider.
//!
//! `start` sends the browser to the provider; the provider redirects back to
//! `callback` with an authorization code, which is exchanged for the user's
//! identity and turned into a bearer credential for this service.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Query},
    response::Redirect,
};
use chrono::Utc;

use tasktrack_auth::Claims;
use tasktrack_core::{OwnerId, User};
use tasktrack_infra::{IdpUser, StoreError};

use crate::app::dto::{CallbackQuery, LoginResponse};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub async fn start(Extension(services): Extension<Arc<AppServices>>) -> Redirect {
    Redirect::to(&services.identity.authorize_url(&services.callback_url))
}

pub async fn callback(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<CallbackQuery>,
) -> Result<Json<LoginResponse>, ApiError> {
    let code = query
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::BadRequest("missing authorization code".to_string()))?;

    let access_token = services.identity.exchange_code(&code).await?;
    let idp_user = services.identity.user_info(&access_token).await?;
    let owner = OwnerId::from(idp_user.id);

    ensure_user(&services, &owner, idp_user).await?;

    let claims = Claims::for_owner(services.owner_claim.as_str(), &owner);
    let token = services.issuer.mint(claims, services.credential_ttl)?;

    tracing::info!(owner = %owner, "login succeeded");
    Ok(Json(LoginResponse {
        id: owner.to_string(),
        token,
    }))
}

/// Create the user record on first login; existing records are left as is.
async fn ensure_user(services: &AppServices, owner: &OwnerId, idp_user: IdpUser) -> Result<(), ApiError> {
    match services.users.read(owner, owner.as_str()).await {
        Ok(_) => Ok(()),
        Err(StoreError::NotFound) => {
            let user = User {
                id: idp_user.id,
                handle: idp_user.login,
                name: idp_user.name,
                email: idp_user.email,
                created_at: Utc::now(),
            };
            services.users.upsert(owner, &user).await?;
            tracing::info!(owner = %owner, "user created");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
