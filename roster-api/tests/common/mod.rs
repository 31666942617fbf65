//! Common test utilities for integration tests
//!
//! This module provides shared infrastructure for integration tests:
//! - An in-process router backed by `MemoryStore`
//! - A running side-effect worker with a short completion delay
//! - JSON request helpers
//! - Polling for background side-effects

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use chrono::{DateTime, Utc};
use roster_api::app::{build_router, AppState};
use roster_api::config::{ApiConfig, Config, StoreBackend, StoreConfig, WorkerSettings};
use roster_shared::db::pool::DatabaseConfig;
use roster_shared::models::user::{User, UserRole};
use roster_shared::store::{MemoryStore, Stores};
use roster_worker::queue::{side_effect_channel, WorkerConfig};
use serde_json::Value;
use std::time::Duration;
use tower::ServiceExt;
use uuid::Uuid;

/// Completion delay used by the test worker
pub const COMPLETION_DELAY: Duration = Duration::from_millis(50);

/// Test context containing all necessary resources
pub struct TestContext {
    pub app: axum::Router,
    pub stores: Stores,
}

impl TestContext {
    /// Creates a context over an empty store
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new())
    }

    /// Creates a context over a store pre-populated with users
    pub fn with_users(users: Vec<User>) -> Self {
        Self::with_store(MemoryStore::with_users(users))
    }

    fn with_store(store: MemoryStore) -> Self {
        let stores = Stores::new(store);

        let (side_effects, worker) = side_effect_channel(
            stores.tasks.clone(),
            WorkerConfig {
                completion_delay: COMPLETION_DELAY,
            },
        );
        // Stops once the router, and with it the queue handle, is dropped
        tokio::spawn(worker.run());

        let state = AppState::new(stores.clone(), side_effects, test_config());
        let app = build_router(state);

        TestContext { app, stores }
    }

    /// Sends a request and returns the status with the parsed JSON body
    ///
    /// An empty response body parses as `Value::Null`.
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
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
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }
}

fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
        },
        store: StoreConfig {
            backend: StoreBackend::Memory,
            database: DatabaseConfig::default(),
        },
        worker: WorkerSettings {
            completion_delay: COMPLETION_DELAY,
        },
    }
}

/// Builds a stored user record for seeding analytics scenarios
pub fn seeded_user(
    name: &str,
    department: Option<&str>,
    role: UserRole,
    age: Option<i32>,
    salary: Option<f64>,
    created_at: DateTime<Utc>,
) -> User {
    User {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        age,
        role,
        salary,
        department: department.map(str::to_string),
        created_at,
        is_active: true,
    }
}

/// Helper to wait for condition with timeout
pub async fn wait_for<F, Fut>(condition: F, timeout: Duration) -> anyhow::Result<()>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let start = std::time::Instant::now();

    loop {
        if condition().await {
            return Ok(());
        }

        if start.elapsed() > timeout {
            anyhow::bail!("Condition not met within {:?}", timeout);
        }

        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
