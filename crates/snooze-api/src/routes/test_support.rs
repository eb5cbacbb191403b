//! Router harness for handler tests

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use serde_json::Value;
use snooze_auth::{AUTH_HEADER, generate_token, hash_password};
use snooze_db::{Database, NewStory, NewUser, Story};
use tempfile::TempDir;
use tower::ServiceExt;

use crate::routes::create_router;
use crate::state::AppState;

pub struct TestApp {
    pub router: Router,
    pub db: Database,
    _dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let url = format!("sqlite:{}?mode=rwc", dir.path().join("api.db").display());
        let db = Database::new(&url).await.unwrap();
        let router = create_router(AppState::new(db.clone()), None);
        Self {
            router,
            db,
            _dir: dir,
        }
    }

    /// Insert a user whose password is "password" and return their token
    pub async fn create_user(&self, username: &str, is_staff: bool) -> String {
        self.db
            .insert_user(NewUser {
                username: username.to_string(),
                password_hash: hash_password("password").unwrap(),
                first_name: "userFirst".to_string(),
                last_name: "userLast".to_string(),
                is_staff,
            })
            .await
            .unwrap();
        generate_token(username)
    }

    pub async fn create_story(&self, id: &str, username: &str) -> Story {
        self.db
            .insert_story(NewStory {
                id: id.to_string(),
                username: username.to_string(),
                author: "test_author".to_string(),
                title: "test_title".to_string(),
                url: "http://test.com".to_string(),
            })
            .await
            .unwrap()
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTH_HEADER, token);
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.send(builder.body(body).unwrap()).await
    }

    /// POST a body verbatim, for payloads that are not valid JSON
    pub async fn post_raw(&self, uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(
        &self,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, body).await
    }

    pub async fn patch(
        &self,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        self.request(Method::PATCH, uri, token, body).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, token, None).await
    }
}
