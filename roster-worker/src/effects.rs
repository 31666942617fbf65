/// Background side-effects on tasks
///
/// A side-effect is a described unit of work: a target task and the stamp to
/// write on it. Handlers build one after their store write succeeded and hand
/// it to the [`SideEffectQueue`](crate::queue::SideEffectQueue).
///
/// # Effects
///
/// ```text
/// StampCreated   ──> status_log = "Task created at <rfc3339>"
/// StampCompleted ──> sleep(completion_delay)
///                ──> completed_at = now, status_log = "Task completed at <rfc3339>"
///                    (only while the task is still done)
/// ```

use chrono::Utc;
use roster_shared::error::StoreError;
use roster_shared::store::TaskStore;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Side-effect error
///
/// Never returned to an HTTP caller; the worker only logs it.
#[derive(Debug, Error)]
pub enum EffectError {
    /// The task was deleted before the effect ran
    #[error("Task not found: {0}")]
    TaskNotFound(Uuid),

    /// The task was reopened before the completion stamp ran
    #[error("Task {0} is no longer done")]
    NoLongerDone(Uuid),

    /// Store failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Deferred unit of work on one task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideEffect {
    /// Log the creation of a freshly inserted task
    StampCreated { task_id: Uuid },

    /// Record the completion time of a task marked done
    StampCompleted { task_id: Uuid },
}

impl SideEffect {
    pub fn task_id(&self) -> Uuid {
        match self {
            SideEffect::StampCreated { task_id } | SideEffect::StampCompleted { task_id } => {
                *task_id
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SideEffect::StampCreated { .. } => "stamp_created",
            SideEffect::StampCompleted { .. } => "stamp_completed",
        }
    }
}

impl fmt::Display for SideEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.task_id())
    }
}

/// Runs one side-effect against the store
///
/// `completion_delay` is slept before the completion stamp only.
///
/// # Errors
///
/// Returns [`EffectError::TaskNotFound`] if the task is gone,
/// [`EffectError::NoLongerDone`] if it was reopened meanwhile, or the store
/// error.
pub async fn apply(
    store: &dyn TaskStore,
    effect: SideEffect,
    completion_delay: Duration,
) -> Result<(), EffectError> {
    match effect {
        SideEffect::StampCreated { task_id } => {
            let message = format!("Task created at {}", Utc::now().to_rfc3339());
            if !store.set_status_log(task_id, &message).await? {
                return Err(EffectError::TaskNotFound(task_id));
            }
        }
        SideEffect::StampCompleted { task_id } => {
            tokio::time::sleep(completion_delay).await;

            let completed_at = Utc::now();
            let message = format!("Task completed at {}", completed_at.to_rfc3339());
            if !store.stamp_completed(task_id, completed_at, &message).await? {
                return match store.find_task(task_id).await? {
                    Some(_) => Err(EffectError::NoLongerDone(task_id)),
                    None => Err(EffectError::TaskNotFound(task_id)),
                };
            }
        }
    }

    Ok(())
}
