/// Common test utilities for integration tests
///
/// Builds the full router over the in-memory stores with cheap Argon2
/// parameters and offers request helpers for driving it in-process.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use std::sync::Arc;
use taskmgr_api::app::{build_router, AppState};
use taskmgr_api::config::{ApiConfig, Config, JwtConfig, PasswordSettings, StoreBackend};
use taskmgr_shared::store::memory::{MemoryTaskStore, MemoryUserStore};
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

/// Test context containing the router under test
pub struct TestContext {
    pub app: Router,
    pub config: Config,
}

impl TestContext {
    /// Creates a context with fresh, empty stores
    pub fn new() -> anyhow::Result<Self> {
        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
            },
            store: StoreBackend::Memory,
            database: None,
            jwt: JwtConfig {
                secret: TEST_SECRET.to_string(),
                ttl_seconds: None,
            },
            password: PasswordSettings {
                memory_kib: 8,
                iterations: 1,
                parallelism: 1,
            },
        };

        let state = AppState::from_stores(
            Arc::new(MemoryUserStore::new()),
            Arc::new(MemoryTaskStore::new()),
            config.clone(),
        )?;

        Ok(Self {
            app: build_router(state),
            config,
        })
    }

    /// Sends a request and returns the status with the parsed JSON body
    ///
    /// An empty body is returned as `Value::Null`.
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).to_string())
            })
        };

        (status, json)
    }

    /// Registers an account and asserts success
    pub async fn register(&self, email: &str, password: &str, role: &str) -> Value {
        let (status, body) = self
            .send(
                "POST",
                "/register",
                None,
                Some(serde_json::json!({ "email": email, "password": password, "role": role })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
        body
    }

    /// Logs in and returns the token
    pub async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .send(
                "POST",
                "/login",
                None,
                Some(serde_json::json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["token"].as_str().unwrap().to_string()
    }

    /// Registers then logs in, returning the token
    pub async fn signup(&self, email: &str, role: &str) -> String {
        self.register(email, "pw-123456", role).await;
        self.login(email, "pw-123456").await
    }
}
