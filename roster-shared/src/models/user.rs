/// User model and database operations
///
/// This module provides the User record, its input payload and the
/// PostgreSQL operations behind the `postgres` store backend.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE user_role AS ENUM ('admin', 'user', 'guest');
///
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     seq BIGSERIAL NOT NULL,
///     name VARCHAR(255) NOT NULL,
///     email VARCHAR(320) NOT NULL,
///     age INTEGER,
///     role user_role NOT NULL DEFAULT 'user',
///     salary DOUBLE PRECISION,
///     department VARCHAR(255),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     is_active BOOLEAN NOT NULL DEFAULT TRUE
/// );
///
/// CREATE UNIQUE INDEX users_email_key ON users (email);
/// ```
///
/// `seq` only records insertion order; it is never exposed.
///
/// # Example
///
/// ```no_run
/// use roster_shared::models::user::{CreateUser, User, UserRole};
/// use roster_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     name: "John Doe".to_string(),
///     email: "john@example.com".to_string(),
///     age: Some(30),
///     role: UserRole::Admin,
///     salary: Some(85_000.0),
///     department: Some("Engineering".to_string()),
///     is_active: true,
/// }).await?;
///
/// println!("Created user: {}", user.id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;
use uuid::Uuid;
use validator::Validate;

use super::reject_nul_chars;

const USER_COLUMNS: &str =
    "id, name, email, age, role, salary, department, created_at, is_active";

/// User role
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    sqlx::Type,
)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    #[default]
    User,
    Guest,
}

impl UserRole {
    /// Converts role to its stored string form
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::User => "user",
            UserRole::Guest => "guest",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Store-assigned identifier
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Email address, unique across all users
    pub email: String,

    pub age: Option<i32>,

    pub role: UserRole,

    pub salary: Option<f64>,

    pub department: Option<String>,

    /// Set once at insertion and never changed by updates
    pub created_at: DateTime<Utc>,

    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Input for creating a user, also used for full replacement
///
/// `role` defaults to `user` and `is_active` to `true` when omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(
        length(min = 1, max = 255, message = "Name must be 1-255 characters"),
        custom(function = reject_nul_chars)
    )]
    pub name: String,

    #[validate(email(message = "Invalid email format"), custom(function = reject_nul_chars))]
    pub email: String,

    #[validate(range(min = 0, max = 150, message = "Age must be between 0 and 150"))]
    pub age: Option<i32>,

    #[serde(default)]
    pub role: UserRole,

    #[validate(range(min = 0.0, message = "Salary cannot be negative"))]
    pub salary: Option<f64>,

    #[validate(
        length(max = 255, message = "Department must be at most 255 characters"),
        custom(function = reject_nul_chars)
    )]
    pub department: Option<String>,

    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl User {
    /// Inserts a new user
    ///
    /// # Errors
    ///
    /// Fails with a unique violation on `users_email_key` if the email is
    /// already registered.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, email, age, role, salary, department, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(data.name)
        .bind(data.email)
        .bind(data.age)
        .bind(data.role)
        .bind(data.salary)
        .bind(data.department)
        .bind(data.is_active)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Lists every user in insertion order
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY seq ASC"
        ))
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Replaces every mutable field of a user
    ///
    /// `created_at` is preserved.
    ///
    /// # Returns
    ///
    /// The updated user, or None if no user has this ID
    pub async fn replace(
        pool: &PgPool,
        id: Uuid,
        data: CreateUser,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET name = $2, email = $3, age = $4, role = $5,
                salary = $6, department = $7, is_active = $8
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(data.name)
        .bind(data.email)
        .bind(data.age)
        .bind(data.role)
        .bind(data.salary)
        .bind(data.department)
        .bind(data.is_active)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Deletes a user
    ///
    /// # Returns
    ///
    /// True if a user was deleted, false if none had this ID
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
