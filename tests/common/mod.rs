#![allow(dead_code)]

use std::path::PathBuf;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tower::ServiceExt;
use trivia_api::{
    db::run_migrations,
    server::app::{build_router, AppState},
    transfer::import_data,
};

pub const SEEDED_QUESTIONS: i64 = 19;

pub fn seed_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

/// A fresh in-memory database with the schema applied. A single connection
/// keeps every query on the same memory database.
pub async fn empty_pool() -> anyhow::Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

pub async fn seeded_pool() -> anyhow::Result<SqlitePool> {
    let pool = empty_pool().await?;
    import_data(&pool, &seed_dir()).await?;
    Ok(pool)
}

pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
}

pub async fn setup_test_app() -> anyhow::Result<TestApp> {
    let pool = seeded_pool().await?;
    Ok(TestApp {
        router: build_router(AppState::new(pool.clone())),
        pool,
    })
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> anyhow::Result<(StatusCode, Value)> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok((status, body))
    }

    pub async fn get(&self, uri: &str) -> anyhow::Result<(StatusCode, Value)> {
        self.send(Request::get(uri).body(Body::empty())?).await
    }

    pub async fn delete(&self, uri: &str) -> anyhow::Result<(StatusCode, Value)> {
        self.send(Request::delete(uri).body(Body::empty())?).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> anyhow::Result<(StatusCode, Value)> {
        self.send(json_request(Method::POST, uri, body)?).await
    }
}

pub fn json_request(method: Method, uri: &str, body: Value) -> anyhow::Result<Request<Body>> {
    Ok(Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body)?))?)
}

pub fn assert_error(status: StatusCode, body: &Value, expected: StatusCode, message: &str) {
    assert_eq!(status, expected, "unexpected status, body: {body}");
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], expected.as_u16());
    assert_eq!(body["message"], message);
}

pub fn question_ids(body: &Value) -> Vec<i64> {
    body["questions"]
        .as_array()
        .map(|qs| qs.iter().filter_map(|q| q["id"].as_i64()).collect())
        .unwrap_or_default()
}
