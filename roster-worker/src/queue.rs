/// Side-effect queue and detached worker
///
/// Handlers hold a cloneable [`SideEffectQueue`] and enqueue effects after
/// their store write succeeded. A single [`SideEffectWorker`] drains the
/// channel and spawns one Tokio task per effect, so a delayed completion
/// stamp never holds up the effects queued behind it.
///
/// # Architecture
///
/// ```text
/// handler ──enqueue──> mpsc ──> SideEffectWorker::run
///                                 └─> tokio::spawn(apply(effect))
///                                       └─> failure: tracing::warn!/error!
/// ```
///
/// # Guarantees
///
/// - Enqueueing never blocks and never fails the request.
/// - Effects of one write run after that write; effects of different writes
///   have no ordering between them.
/// - Once spawned, an effect runs to completion; shutdown only stops the
///   worker from taking new effects.
///
/// # Example
///
/// ```no_run
/// use roster_shared::store::{MemoryStore, Stores};
/// use roster_worker::effects::SideEffect;
/// use roster_worker::queue::{side_effect_channel, WorkerConfig};
/// use uuid::Uuid;
///
/// # async fn example() {
/// let stores = Stores::new(MemoryStore::new());
/// let (queue, worker) = side_effect_channel(stores.tasks.clone(), WorkerConfig::default());
/// let shutdown = worker.shutdown_token();
/// let handle = tokio::spawn(worker.run());
///
/// queue.enqueue(SideEffect::StampCreated { task_id: Uuid::new_v4() });
///
/// shutdown.cancel();
/// handle.await.unwrap();
/// # }
/// ```

use crate::effects::{apply, EffectError, SideEffect};
use roster_shared::store::TaskStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Worker configuration
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Delay before the completion stamp is written
    pub completion_delay: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        WorkerConfig {
            completion_delay: Duration::from_secs(2),
        }
    }
}

/// Handle used by request handlers to schedule side-effects
#[derive(Debug, Clone)]
pub struct SideEffectQueue {
    sender: mpsc::UnboundedSender<SideEffect>,
}

impl SideEffectQueue {
    /// Schedules an effect without waiting for it
    ///
    /// If the worker has stopped, the effect is dropped and logged.
    pub fn enqueue(&self, effect: SideEffect) {
        tracing::debug!(effect = %effect, "Enqueueing side-effect");

        if let Err(e) = self.sender.send(effect) {
            tracing::error!(effect = %e.0, "Side-effect worker stopped, effect dropped");
        }
    }
}

/// Detached worker applying queued side-effects
pub struct SideEffectWorker {
    receiver: mpsc::UnboundedReceiver<SideEffect>,
    store: Arc<dyn TaskStore>,
    config: WorkerConfig,
    shutdown_token: CancellationToken,
}

/// Creates a connected queue handle and worker
pub fn side_effect_channel(
    store: Arc<dyn TaskStore>,
    config: WorkerConfig,
) -> (SideEffectQueue, SideEffectWorker) {
    let (sender, receiver) = mpsc::unbounded_channel();

    (
        SideEffectQueue { sender },
        SideEffectWorker {
            receiver,
            store,
            config,
            shutdown_token: CancellationToken::new(),
        },
    )
}

impl SideEffectWorker {
    /// Gets shutdown token
    ///
    /// Cancelling it stops the worker loop.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown_token.clone()
    }

    /// Runs the worker loop until shutdown or until every queue handle is dropped
    pub async fn run(mut self) {
        tracing::info!(
            completion_delay_ms = self.config.completion_delay.as_millis() as u64,
            "Side-effect worker starting"
        );

        loop {
            tokio::select! {
                biased;

                _ = self.shutdown_token.cancelled() => {
                    tracing::info!("Shutdown requested, side-effect worker stopping");
                    break;
                }
                effect = self.receiver.recv() => match effect {
                    Some(effect) => self.dispatch(effect),
                    None => {
                        tracing::info!("All queue handles dropped, side-effect worker stopping");
                        break;
                    }
                },
            }
        }
    }

    fn dispatch(&self, effect: SideEffect) {
        let store = self.store.clone();
        let completion_delay = self.config.completion_delay;

        tokio::spawn(async move {
            match apply(store.as_ref(), effect, completion_delay).await {
                Ok(()) => tracing::info!(effect = %effect, "Side-effect applied"),
                Err(e @ (EffectError::TaskNotFound(_) | EffectError::NoLongerDone(_))) => {
                    tracing::warn!(effect = %effect, error = %e, "Side-effect skipped")
                }
                Err(e) => tracing::error!(effect = %effect, error = %e, "Side-effect failed"),
            }
        });
    }
}
