/// Task model and database operations
///
/// This module provides the Task record of the task manager and the
/// PostgreSQL operations behind the `postgres` store backend.
///
/// # Lifecycle
///
/// ```text
/// insert ──> (background) status_log = "Task created at ..."
/// replace / patch
/// complete ──> done = true ──> (background, delayed) completed_at = now
/// delete
/// ```
///
/// `completed_at` and `status_log` are only ever written by the background
/// side-effects; replace and patch leave them untouched.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     seq BIGSERIAL NOT NULL,
///     task TEXT NOT NULL,
///     done BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     completed_at TIMESTAMPTZ,
///     status_log TEXT
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;
use validator::Validate;

use super::reject_nul_chars;

const TASK_COLUMNS: &str = "id, task, done, created_at, completed_at, status_log";

/// Task record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Store-assigned identifier
    pub id: Uuid,

    /// Task description
    pub task: String,

    pub done: bool,

    pub created_at: DateTime<Utc>,

    /// Set by the completion side-effect after the task is marked done
    pub completed_at: Option<DateTime<Utc>>,

    /// Last message written by a side-effect
    pub status_log: Option<String>,
}

/// Input for creating a task, also used for full replacement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CreateTask {
    #[validate(
        length(min = 1, message = "Task description cannot be empty"),
        custom(function = reject_nul_chars)
    )]
    pub task: String,

    #[serde(default)]
    pub done: bool,
}

/// Partial update for a task
///
/// All fields are optional. Only non-None fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct UpdateTask {
    #[validate(
        length(min = 1, message = "Task description cannot be empty"),
        custom(function = reject_nul_chars)
    )]
    pub task: Option<String>,

    pub done: Option<bool>,
}

impl UpdateTask {
    /// Returns true if the patch carries no field
    pub fn is_empty(&self) -> bool {
        self.task.is_none() && self.done.is_none()
    }
}

/// Filter for listing tasks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Only tasks with this `done` flag
    pub done: Option<bool>,

    /// Maximum number of tasks to return
    pub limit: Option<i64>,
}

impl TaskFilter {
    /// Returns true if the task passes the `done` filter
    pub fn matches(&self, task: &Task) -> bool {
        self.done.map_or(true, |done| task.done == done)
    }
}

impl Task {
    /// Inserts a new task
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks (task, done)
            VALUES ($1, $2)
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(data.task)
        .bind(data.done)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists tasks in insertion order, applying the filter
    pub async fn list(pool: &PgPool, filter: TaskFilter) -> Result<Vec<Self>, sqlx::Error> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {TASK_COLUMNS} FROM tasks"));

        if let Some(done) = filter.done {
            query.push(" WHERE done = ").push_bind(done);
        }

        query.push(" ORDER BY seq ASC");

        if let Some(limit) = filter.limit {
            query.push(" LIMIT ").push_bind(limit);
        }

        let tasks = query.build_query_as::<Task>().fetch_all(pool).await?;

        Ok(tasks)
    }

    /// Replaces the description and done flag of a task
    ///
    /// # Returns
    ///
    /// The updated task, or None if no task has this ID
    pub async fn replace(
        pool: &PgPool,
        id: Uuid,
        data: CreateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            UPDATE tasks
            SET task = $2, done = $3
            WHERE id = $1
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(data.task)
        .bind(data.done)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Applies a partial update
    ///
    /// An empty patch still matches, so the unchanged task is returned.
    ///
    /// # Returns
    ///
    /// The updated task, or None if no task has this ID
    pub async fn patch(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            UPDATE tasks
            SET task = COALESCE($2, task), done = COALESCE($3, done)
            WHERE id = $1
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(data.task)
        .bind(data.done)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Sets the done flag
    ///
    /// # Returns
    ///
    /// The updated task, or None if no task has this ID
    pub async fn mark_done(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks SET done = TRUE WHERE id = $1 RETURNING {TASK_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Writes the status log message
    ///
    /// # Returns
    ///
    /// True if a task was stamped
    pub async fn set_status_log(
        pool: &PgPool,
        id: Uuid,
        message: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE tasks SET status_log = $2 WHERE id = $1")
            .bind(id)
            .bind(message)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Writes the completion timestamp and status log of a done task
    ///
    /// # Returns
    ///
    /// True if the task exists and is still done
    pub async fn stamp_completed(
        pool: &PgPool,
        id: Uuid,
        completed_at: DateTime<Utc>,
        message: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET completed_at = $2, status_log = $3
            WHERE id = $1 AND done = TRUE
            "#,
        )
        .bind(id)
        .bind(completed_at)
        .bind(message)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes a task
    ///
    /// # Returns
    ///
    /// True if a task was deleted, false if none had this ID
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
