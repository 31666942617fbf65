//! # Roster Worker Library
//!
//! Fire-and-forget side-effects that run after a task write has been
//! acknowledged and the HTTP response has been produced.
//!
//! ## Modules
//!
//! - `effects`: The side-effects and how each one is applied to the store
//! - `queue`: Queue handle for handlers and the detached worker draining it
//!
//! ## Example
//!
//! ```no_run
//! use roster_shared::store::{MemoryStore, Stores};
//! use roster_worker::queue::{side_effect_channel, WorkerConfig};
//!
//! # async fn example() {
//! let stores = Stores::new(MemoryStore::new());
//! let (queue, worker) = side_effect_channel(stores.tasks.clone(), WorkerConfig::default());
//! tokio::spawn(worker.run());
//! # drop(queue);
//! # }
//! ```

pub mod effects;
pub mod queue;
