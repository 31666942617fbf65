/// Document store abstraction
///
/// Handlers and the background worker never talk to a database directly.
/// They go through three object-safe async traits:
///
/// - [`UserStore`]: insert/find/list/replace/delete over the `users` collection
/// - [`TaskStore`]: the same over `tasks`, plus the done flag and the stamps
///   written by background side-effects
/// - [`StoreHealth`]: connectivity probe for the health endpoint
///
/// # Backends
///
/// - [`PgStore`]: PostgreSQL through a pooled sqlx connection
/// - [`MemoryStore`]: in-process collections with the same semantics
///
/// # Contract
///
/// - Lookups return `Option`, deletes and stamps return `bool`; absence is
///   never an error.
/// - A write that collides with the unique email index fails with
///   [`StoreError::DuplicateKey`](crate::error::StoreError::DuplicateKey).
/// - Listings come back in insertion order.
///
/// # Example
///
/// ```
/// use roster_shared::store::{MemoryStore, Stores};
///
/// let stores = Stores::new(MemoryStore::new());
/// assert_eq!(stores.health.backend(), "memory");
/// ```

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::error::StoreResult;
use crate::models::task::{CreateTask, Task, TaskFilter, UpdateTask};
use crate::models::user::{CreateUser, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Operations on the `users` collection
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert_user(&self, data: CreateUser) -> StoreResult<User>;

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Snapshot of the whole collection in insertion order
    async fn list_users(&self) -> StoreResult<Vec<User>>;

    /// Replaces every mutable field; None if no user matched
    async fn replace_user(&self, id: Uuid, data: CreateUser) -> StoreResult<Option<User>>;

    async fn delete_user(&self, id: Uuid) -> StoreResult<bool>;
}

/// Operations on the `tasks` collection
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn insert_task(&self, data: CreateTask) -> StoreResult<Task>;

    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>>;

    async fn list_tasks(&self, filter: TaskFilter) -> StoreResult<Vec<Task>>;

    async fn replace_task(&self, id: Uuid, data: CreateTask) -> StoreResult<Option<Task>>;

    async fn patch_task(&self, id: Uuid, data: UpdateTask) -> StoreResult<Option<Task>>;

    async fn mark_task_done(&self, id: Uuid) -> StoreResult<Option<Task>>;

    async fn set_status_log(&self, id: Uuid, message: &str) -> StoreResult<bool>;

    /// Stamps `completed_at` and `status_log`, only while the task is done
    async fn stamp_completed(
        &self,
        id: Uuid,
        completed_at: DateTime<Utc>,
        message: &str,
    ) -> StoreResult<bool>;

    async fn delete_task(&self, id: Uuid) -> StoreResult<bool>;
}

/// Store connectivity probe
#[async_trait]
pub trait StoreHealth: Send + Sync {
    /// Short backend name ("postgres", "memory")
    fn backend(&self) -> &'static str;

    async fn ping(&self) -> StoreResult<()>;
}

/// Handles to one backend, viewed through each trait
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub tasks: Arc<dyn TaskStore>,
    pub health: Arc<dyn StoreHealth>,
}

impl Stores {
    /// Wraps a backend implementing every store trait
    pub fn new<S>(store: S) -> Self
    where
        S: UserStore + TaskStore + StoreHealth + 'static,
    {
        let store = Arc::new(store);
        Self {
            users: store.clone(),
            tasks: store.clone(),
            health: store,
        }
    }
}
