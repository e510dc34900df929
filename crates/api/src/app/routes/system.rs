use std::sync::Arc;

use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::Html,
};

use crate::app::dto::WhoAmIResponse;
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::context::AuthContext;

const HOME_PAGE: &str = r#"<!DOCTYPE html>
<html>
  <head><title>tasktrack</title></head>
  <body>
    <h1>tasktrack</h1>
    <p><a href="/login/github">Log in with GitHub</a></p>
  </body>
</html>
"#;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn home() -> Html<&'static str> {
    Html(HOME_PAGE)
}

pub async fn whoami(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<WhoAmIResponse>, ApiError> {
    let owner = ctx.owner_id(&services.owner_claim)?;

    Ok(Json(WhoAmIResponse {
        owner_id: owner.to_string(),
        claims: ctx.claims().clone(),
    }))
}
