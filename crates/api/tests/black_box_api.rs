use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::{Value, json};

use tasktrack_infra::{AppConfig, IdentityError, IdentityProvider, IdpUser, InMemoryKv, KvBackend};

const JWT_SECRET: &str = "test-secret";

/// Identity provider double: accepts code "good-code" for a fixed user.
struct FakeIdp {
    user: IdpUser,
}

#[async_trait]
impl IdentityProvider for FakeIdp {
    fn authorize_url(&self, callback_url: &str) -> String {
        format!("https://idp.test/authorize?redirect_uri={callback_url}")
    }

    async fn exchange_code(&self, code: &str) -> Result<String, IdentityError> {
        if code == "good-code" {
            Ok("access-token".to_string())
        } else {
            Err(IdentityError::Rejected("bad code".to_string()))
        }
    }

    async fn user_info(&self, access_token: &str) -> Result<IdpUser, IdentityError> {
        assert_eq!(access_token, "access-token");
        Ok(self.user.clone())
    }
}

struct TestServer {
    base_url: String,
    backend: Arc<InMemoryKv>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        let config = AppConfig {
            jwt_secret: JWT_SECRET.to_string(),
            ..AppConfig::default()
        };
        let backend = Arc::new(InMemoryKv::new());
        let identity = Arc::new(FakeIdp {
            user: IdpUser {
                id: 583231,
                login: "octocat".into(),
                name: "The Octocat".into(),
                email: "octocat@example.com".into(),
            },
        });

        // Same router as prod, bound to an ephemeral port.
        let app = tasktrack_api::app::build_app(&config, backend.clone(), identity);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            backend,
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint(claims: Value) -> String {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("failed to encode jwt")
}

fn token_for(owner: &str) -> String {
    let now = Utc::now().timestamp();
    mint(json!({ "userID": owner, "iat": now, "exp": now + 600 }))
}

fn no_redirects() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

async fn create_task(client: &reqwest::Client, srv: &TestServer, token: &str, name: &str) -> String {
    let res = client
        .post(srv.url("/task/create"))
        .bearer_auth(token)
        .json(&json!({ "name": name, "description": "from test" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::ACCEPTED);

    let body: Value = res.json().await.unwrap();
    body["taskId"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_and_home_are_public() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client.get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client.get(srv.url("/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.text().await.unwrap().contains("/login/github"));
}

#[tokio::test]
async fn auth_required_for_protected_endpoints() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for path in ["/whoami", "/task/get/all"] {
        let res = client.get(srv.url(path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{path}");
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["error"], "unauthenticated");
    }

    let res = client
        .get(srv.url("/whoami"))
        .header("authorization", "Bearer ")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Unauthenticated writes never reach the store.
    let res = client
        .post(srv.url("/task/create"))
        .json(&json!({ "name": "sneaky" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(srv.backend.is_empty());
}

#[tokio::test]
async fn bearer_scheme_is_case_insensitive() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(srv.url("/whoami"))
        .header("authorization", format!("bearer {}", token_for("42")))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["ownerId"], "42");
    assert_eq!(body["claims"]["userID"], "42");
}

#[tokio::test]
async fn expired_and_foreign_tokens_are_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let now = Utc::now().timestamp();

    let expired = mint(json!({ "userID": "42", "iat": now - 120, "exp": now - 60 }));
    let res = client.get(srv.url("/whoami")).bearer_auth(expired).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let foreign = jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &json!({ "userID": "42", "iat": now, "exp": now + 600 }),
        &EncodingKey::from_secret(b"some-other-secret"),
    )
    .unwrap();
    let res = client.get(srv.url("/whoami")).bearer_auth(foreign).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_without_owner_claim_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let now = Utc::now().timestamp();

    let token = mint(json!({ "sub": "someone", "iat": now, "exp": now + 600 }));
    let res = client.get(srv.url("/task/get/all")).bearer_auth(token).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn task_lifecycle_create_read_update_delete() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = token_for("42");

    let res = client.get(srv.url("/task/get/all")).bearer_auth(&token).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await.unwrap(), json!([]));

    let id = create_task(&client, &srv, &token, "write tests").await;

    // Stored under the caller's namespace.
    let stored = srv.backend.get(&format!("task:42:{id}")).await.unwrap();
    assert!(stored.is_some());

    let res = client
        .get(srv.url(&format!("/task/get/{id}")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let task: Value = res.json().await.unwrap();
    assert_eq!(task["id"], id.as_str());
    assert_eq!(task["name"], "write tests");
    assert_eq!(task["description"], "from test");
    assert_eq!(task["isCompleted"], false);

    let res = client
        .put(srv.url(&format!("/task/update/{id}")))
        .bearer_auth(&token)
        .json(&json!({ "name": "write more tests", "isCompleted": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client.get(srv.url("/task/get/all")).bearer_auth(&token).send().await.unwrap();
    let all: Value = res.json().await.unwrap();
    let all = all.as_array().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0]["name"], "write more tests");
    assert_eq!(all[0]["isCompleted"], true);

    for _ in 0..2 {
        let res = client
            .delete(srv.url(&format!("/task/delete/{id}")))
            .bearer_auth(&token)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    let res = client
        .get(srv.url(&format!("/task/get/{id}")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn owners_cannot_see_each_others_tasks() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let id = create_task(&client, &srv, &token_for("4"), "private").await;
    create_task(&client, &srv, &token_for("42"), "also private").await;

    let other = token_for("42");
    let res = client
        .get(srv.url(&format!("/task/get/{id}")))
        .bearer_auth(&other)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client.get(srv.url("/task/get/all")).bearer_auth(&other).send().await.unwrap();
    let all: Value = res.json().await.unwrap();
    let all = all.as_array().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0]["name"], "also private");

    // Deleting someone else's task is a no-op for them.
    let res = client
        .delete(srv.url(&format!("/task/delete/{id}")))
        .bearer_auth(&other)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(srv.backend.get(&format!("task:4:{id}")).await.unwrap().is_some());
}

#[tokio::test]
async fn malformed_task_ids_and_bodies_are_reported() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = token_for("42");

    let res = client.get(srv.url("/task/get/not-a-uuid")).bearer_auth(&token).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .put(srv.url("/task/update/not-a-uuid"))
        .bearer_auth(&token)
        .json(&json!({ "name": "x", "isCompleted": false }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .post(srv.url("/task/create"))
        .bearer_auth(&token)
        .json(&json!({ "name": "   " }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_redirects_to_identity_provider() {
    let srv = TestServer::spawn().await;

    let res = no_redirects().get(srv.url("/login/github")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);

    let location = res.headers()["location"].to_str().unwrap();
    assert!(location.starts_with("https://idp.test/authorize"));
    assert!(location.contains("/login/github/callback"));
}

#[tokio::test]
async fn login_callback_creates_user_and_issues_usable_token() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(srv.url("/login/github/callback?code=good-code"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["id"], "583231");
    let token = body["token"].as_str().unwrap().to_string();

    let user = srv.backend.get("user:583231").await.unwrap().expect("user stored");
    let user: Value = serde_json::from_slice(&user).unwrap();
    assert_eq!(user["handle"], "octocat");

    // A second login keeps the original record.
    let res = client
        .get(srv.url("/login/github/callback?code=good-code"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let again: Value = serde_json::from_slice(&srv.backend.get("user:583231").await.unwrap().unwrap()).unwrap();
    assert_eq!(again["createdAt"], user["createdAt"]);

    let res = client.get(srv.url("/whoami")).bearer_auth(&token).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let me: Value = res.json().await.unwrap();
    assert_eq!(me["ownerId"], "583231");
    assert!(me["claims"]["exp"].is_i64());
}

#[tokio::test]
async fn login_callback_failures() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client.get(srv.url("/login/github/callback")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .get(srv.url("/login/github/callback?code=stale"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    assert!(srv.backend.is_empty());
}
