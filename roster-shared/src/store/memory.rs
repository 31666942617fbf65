/// In-memory store backend
///
/// Keeps both collections in insertion-ordered vectors behind one
/// `tokio::sync::RwLock`. Each operation holds the lock for its whole
/// read-modify-write, so single-record updates are atomic like they are in
/// PostgreSQL. The unique email index is enforced on insert and replace.
///
/// # Example
///
/// ```
/// use roster_shared::models::task::CreateTask;
/// use roster_shared::store::{MemoryStore, TaskStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::new();
/// let task = store.insert_task(CreateTask { task: "Buy milk".into(), done: false }).await?;
/// assert!(store.find_task(task.id).await?.is_some());
/// # Ok(())
/// # }
/// ```

use crate::error::{StoreError, StoreResult};
use crate::models::task::{CreateTask, Task, TaskFilter, UpdateTask};
use crate::models::user::{CreateUser, User};
use crate::store::{StoreHealth, TaskStore, UserStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

const EMAIL_INDEX: &str = "users_email_key";

#[derive(Debug, Default)]
struct Collections {
    users: Vec<User>,
    tasks: Vec<Task>,
}

impl Collections {
    fn email_taken(&self, email: &str, except: Option<Uuid>) -> bool {
        self.users
            .iter()
            .any(|u| u.email == email && Some(u.id) != except)
    }

    fn task_mut(&mut self, id: Uuid) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }
}

/// Store keeping every record in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with users, keeping their IDs and timestamps
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            inner: RwLock::new(Collections {
                users,
                tasks: Vec::new(),
            }),
        }
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, data: CreateUser) -> StoreResult<User> {
        let mut inner = self.inner.write().await;

        if inner.email_taken(&data.email, None) {
            return Err(StoreError::DuplicateKey(EMAIL_INDEX.to_string()));
        }

        let user = User {
            id: Uuid::new_v4(),
            name: data.name,
            email: data.email,
            age: data.age,
            role: data.role,
            salary: data.salary,
            department: data.department,
            created_at: Utc::now(),
            is_active: data.is_active,
        };
        inner.users.push(user.clone());

        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.inner.read().await.users.clone())
    }

    async fn replace_user(&self, id: Uuid, data: CreateUser) -> StoreResult<Option<User>> {
        let mut inner = self.inner.write().await;

        if !inner.users.iter().any(|u| u.id == id) {
            return Ok(None);
        }
        if inner.email_taken(&data.email, Some(id)) {
            return Err(StoreError::DuplicateKey(EMAIL_INDEX.to_string()));
        }

        let Some(user) = inner.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        user.name = data.name;
        user.email = data.email;
        user.age = data.age;
        user.role = data.role;
        user.salary = data.salary;
        user.department = data.department;
        user.is_active = data.is_active;

        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.users.len();
        inner.users.retain(|u| u.id != id);
        Ok(inner.users.len() < before)
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn insert_task(&self, data: CreateTask) -> StoreResult<Task> {
        let task = Task {
            id: Uuid::new_v4(),
            task: data.task,
            done: data.done,
            created_at: Utc::now(),
            completed_at: None,
            status_log: None,
        };
        self.inner.write().await.tasks.push(task.clone());

        Ok(task)
    }

    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>> {
        let inner = self.inner.read().await;
        Ok(inner.tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn list_tasks(&self, filter: TaskFilter) -> StoreResult<Vec<Task>> {
        let inner = self.inner.read().await;
        let limit = filter
            .limit
            .map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(0));

        Ok(inner
            .tasks
            .iter()
            .filter(|t| filter.matches(t))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn replace_task(&self, id: Uuid, data: CreateTask) -> StoreResult<Option<Task>> {
        let mut inner = self.inner.write().await;

        Ok(inner.task_mut(id).map(|task| {
            task.task = data.task;
            task.done = data.done;
            task.clone()
        }))
    }

    async fn patch_task(&self, id: Uuid, data: UpdateTask) -> StoreResult<Option<Task>> {
        let mut inner = self.inner.write().await;

        Ok(inner.task_mut(id).map(|task| {
            if let Some(description) = data.task {
                task.task = description;
            }
            if let Some(done) = data.done {
                task.done = done;
            }
            task.clone()
        }))
    }

    async fn mark_task_done(&self, id: Uuid) -> StoreResult<Option<Task>> {
        let mut inner = self.inner.write().await;

        Ok(inner.task_mut(id).map(|task| {
            task.done = true;
            task.clone()
        }))
    }

    async fn set_status_log(&self, id: Uuid, message: &str) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;

        Ok(match inner.task_mut(id) {
            Some(task) => {
                task.status_log = Some(message.to_string());
                true
            }
            None => false,
        })
    }

    async fn stamp_completed(
        &self,
        id: Uuid,
        completed_at: DateTime<Utc>,
        message: &str,
    ) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;

        Ok(match inner.task_mut(id) {
            Some(task) if task.done => {
                task.completed_at = Some(completed_at);
                task.status_log = Some(message.to_string());
                true
            }
            _ => false,
        })
    }

    async fn delete_task(&self, id: Uuid) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.tasks.len();
        inner.tasks.retain(|t| t.id != id);
        Ok(inner.tasks.len() < before)
    }
}

#[async_trait]
impl StoreHealth for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
