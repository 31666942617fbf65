/// PostgreSQL store backend
///
/// Thin adapter from the store traits to the model operations in
/// [`crate::models`]; every sqlx error is mapped through
/// `From<sqlx::Error> for StoreError`.

use crate::db::pool;
use crate::error::StoreResult;
use crate::models::task::{CreateTask, Task, TaskFilter, UpdateTask};
use crate::models::user::{CreateUser, User};
use crate::store::{StoreHealth, TaskStore, UserStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Store backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying pool, for shutdown
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, data: CreateUser) -> StoreResult<User> {
        Ok(User::create(&self.pool, data).await?)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(User::find_by_id(&self.pool, id).await?)
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(User::list(&self.pool).await?)
    }

    async fn replace_user(&self, id: Uuid, data: CreateUser) -> StoreResult<Option<User>> {
        Ok(User::replace(&self.pool, id, data).await?)
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<bool> {
        Ok(User::delete(&self.pool, id).await?)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn insert_task(&self, data: CreateTask) -> StoreResult<Task> {
        Ok(Task::create(&self.pool, data).await?)
    }

    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>> {
        Ok(Task::find_by_id(&self.pool, id).await?)
    }

    async fn list_tasks(&self, filter: TaskFilter) -> StoreResult<Vec<Task>> {
        Ok(Task::list(&self.pool, filter).await?)
    }

    async fn replace_task(&self, id: Uuid, data: CreateTask) -> StoreResult<Option<Task>> {
        Ok(Task::replace(&self.pool, id, data).await?)
    }

    async fn patch_task(&self, id: Uuid, data: UpdateTask) -> StoreResult<Option<Task>> {
        Ok(Task::patch(&self.pool, id, data).await?)
    }

    async fn mark_task_done(&self, id: Uuid) -> StoreResult<Option<Task>> {
        Ok(Task::mark_done(&self.pool, id).await?)
    }

    async fn set_status_log(&self, id: Uuid, message: &str) -> StoreResult<bool> {
        Ok(Task::set_status_log(&self.pool, id, message).await?)
    }

    async fn stamp_completed(
        &self,
        id: Uuid,
        completed_at: DateTime<Utc>,
        message: &str,
    ) -> StoreResult<bool> {
        Ok(Task::stamp_completed(&self.pool, id, completed_at, message).await?)
    }

    async fn delete_task(&self, id: Uuid) -> StoreResult<bool> {
        Ok(Task::delete(&self.pool, id).await?)
    }
}

#[async_trait]
impl StoreHealth for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(pool::health_check(&self.pool).await?)
    }
}
