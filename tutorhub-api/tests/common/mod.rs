//! Common test utilities for API integration tests
//!
//! Each context gets a fresh in-memory SQLite database with migrations
//! applied and drives the router in-process with `tower::ServiceExt::oneshot`.
//! Tokens are minted with `create_token`; their subjects do not need to
//! exist because handlers only read the role from the token.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;
use tutorhub_api::app::{build_router, AppState};
use tutorhub_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig, PasswordConfig};
use tutorhub_shared::auth::jwt::{create_token, Claims};
use tutorhub_shared::db::migrations::run_migrations;
use tutorhub_shared::db::pool::{self, create_pool};
use tutorhub_shared::models::user::Role;
use uuid::Uuid;

pub const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

pub struct TestContext {
    pub db: SqlitePool,
    pub app: Router,
    pub config: Config,
}

impl TestContext {
    pub async fn new() -> Self {
        let db = create_pool(pool::DatabaseConfig::in_memory())
            .await
            .expect("Failed to create in-memory pool");
        run_migrations(&db).await.expect("Failed to run migrations");

        let config = test_config();
        let app = build_router(AppState::new(db.clone(), config.clone()));

        Self { db, app, config }
    }

    /// Bearer token for a caller with `role`
    pub fn token(&self, role: Role) -> String {
        let claims = Claims::new(Uuid::new_v4(), role);
        create_token(&claims, &self.config.jwt.secret).expect("Failed to create token")
    }

    /// Sends a request and returns the status and JSON body (`Null` when empty)
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Response body is not JSON")
        };

        (status, json)
    }

    /// Sends a request as an admin
    pub async fn admin(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let token = self.token(Role::Admin);
        self.send(method, uri, Some(&token), body).await
    }

    /// Creates a business through the API and returns its JSON
    pub async fn create_business(&self, name: &str, email: &str) -> Value {
        let (status, body) = self
            .admin(
                Method::POST,
                "/v1/businesses",
                Some(serde_json::json!({
                    "owner_name": "Owner",
                    "name": name,
                    "email": email,
                    "phone": "555-0100",
                    "location": "Springfield",
                    "password": "s3cret-password",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "unexpected body: {}", body);
        body
    }

    /// Creates a user through the API and returns its JSON
    pub async fn create_user(&self, email: &str, role: &str) -> Value {
        let (status, body) = self
            .admin(
                Method::POST,
                "/v1/users",
                Some(serde_json::json!({
                    "name": "Test User",
                    "email": email,
                    "password": "s3cret-password",
                    "role": role,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "unexpected body: {}", body);
        body
    }
}

pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: SECRET.to_string(),
        },
        password: PasswordConfig {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        },
    }
}

/// Reads a UUID field from a JSON body
pub fn id_of(body: &Value, field: &str) -> Uuid {
    body[field]
        .as_str()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or_else(|| panic!("missing uuid field '{}' in {}", field, body))
}
