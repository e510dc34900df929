use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::{Deserialize, Serialize};

use super::{IdentityError, IdentityProvider, IdpUser};

const USER_AGENT: &str = concat!("tasktrack/", env!("CARGO_PKG_VERSION"));

/// GitHub OAuth app client.
///
/// The access token is passed per call and never stored on the client, so a
/// single instance is shared by all concurrent logins.
#[derive(Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    oauth_url: String,
    api_url: String,
    client_id: String,
    client_secret: String,
}

impl core::fmt::Debug for GithubClient {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GithubClient")
            .field("oauth_url", &self.oauth_url)
            .field("api_url", &self.api_url)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
struct AccessTokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    code: &'a str,
}

#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GithubUser {
    id: i64,
    login: String,
    name: Option<String>,
    email: Option<String>,
}

impl GithubClient {
    pub fn new(
        oauth_url: impl Into<String>,
        api_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, IdentityError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| IdentityError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            oauth_url: oauth_url.into().trim_end_matches('/').to_string(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        })
    }
}

fn transport(e: reqwest::Error) -> IdentityError {
    IdentityError::Transport(e.to_string())
}

#[async_trait]
impl IdentityProvider for GithubClient {
    fn authorize_url(&self, callback_url: &str) -> String {
        format!(
            "{}/authorize?client_id={}&redirect_uri={}",
            self.oauth_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(callback_url)
        )
    }

    async fn exchange_code(&self, code: &str) -> Result<String, IdentityError> {
        let res = self
            .http
            .post(format!("{}/access_token", self.oauth_url))
            .header(ACCEPT, "application/json")
            .json(&AccessTokenRequest {
                client_id: &self.client_id,
                client_secret: &self.client_secret,
                code,
            })
            .send()
            .await
            .map_err(transport)?;

        let status = res.status();
        if !status.is_success() {
            return Err(IdentityError::Rejected(format!("access token endpoint returned {status}")));
        }

        let body: AccessTokenResponse = res
            .json()
            .await
            .map_err(|e| IdentityError::InvalidResponse(e.to_string()))?;

        match body.access_token {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(IdentityError::Rejected(
                body.error_description
                    .or(body.error)
                    .unwrap_or_else(|| "no access token in response".to_string()),
            )),
        }
    }

    async fn user_info(&self, access_token: &str) -> Result<IdpUser, IdentityError> {
        let res = self
            .http
            .get(format!("{}/user", self.api_url))
            .header(AUTHORIZATION, format!("token {access_token}"))
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(transport)?;

        let status = res.status();
        if !status.is_success() {
            return Err(IdentityError::Rejected(format!("user endpoint returned {status}")));
        }

        let user: GithubUser = res
            .json()
            .await
            .map_err(|e| IdentityError::InvalidResponse(e.to_string()))?;

        Ok(IdpUser {
            id: user.id,
            login: user.login,
            name: user.name.unwrap_or_default(),
            email: user.email.unwrap_or_default(),
        })
    }
}
