#![allow(dead_code)]

use anyhow::Context;
use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use splinterstice::{config::Config, db, AppState};
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> anyhow::Result<Value> {
        serde_json::from_str(&self.body).with_context(|| format!("not json: {}", self.body))
    }

    pub fn location(&self) -> Option<&str> {
        self.headers.get(header::LOCATION)?.to_str().ok()
    }

    /// The `name=value` part of the session cookie, if one was set.
    pub fn cookie(&self) -> Option<String> {
        let raw = self.headers.get(header::SET_COOKIE)?.to_str().ok()?;
        raw.split(';').next().map(str::to_owned)
    }
}

impl TestApp {
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config {
            database_url: "sqlite::memory:".to_owned(),
            max_connections: 1,
            ..Config::default()
        };
        let pool = db::connect(&config).await?;
        db::migrate(&pool).await?;

        let state = AppState::new(pool, &config);
        let router = splinterstice::router(state.clone(), &config);
        Ok(Self { router, state })
    }

    pub async fn send(&self, request: Request<Body>) -> anyhow::Result<TestResponse> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;

        Ok(TestResponse {
            status,
            headers,
            body: String::from_utf8(bytes.to_vec())?,
        })
    }

    pub async fn get(&self, path: &str, cookie: Option<&str>) -> anyhow::Result<TestResponse> {
        let mut request = Request::builder().method(Method::GET).uri(path);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.send(request.body(Body::empty())?).await
    }

    pub async fn post_json(
        &self,
        path: &str,
        cookie: Option<&str>,
        body: Value,
    ) -> anyhow::Result<TestResponse> {
        let mut request = Request::builder()
            .method(Method::POST)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.send(request.body(Body::from(body.to_string()))?).await
    }

    pub async fn post_form(
        &self,
        path: &str,
        cookie: Option<&str>,
        body: &str,
    ) -> anyhow::Result<TestResponse> {
        let mut request = Request::builder()
            .method(Method::POST)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.send(request.body(Body::from(body.to_owned()))?).await
    }

    /// Registers `username` and returns the session cookie.
    pub async fn register(&self, username: &str) -> anyhow::Result<String> {
        let response = self
            .post_form("/register", None, &format!("username={username}"))
            .await?;
        anyhow::ensure!(
            response.status == StatusCode::SEE_OTHER,
            "register {username} failed with {}: {}",
            response.status,
            response.body
        );
        response.cookie().context("no session cookie after register")
    }

    pub async fn count(&self, table: &str) -> anyhow::Result<i64> {
        let count = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(self.state.repo.pool())
            .await?;
        Ok(count)
    }
}
