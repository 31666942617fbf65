//! # Roster Shared Library
//!
//! This crate contains the entity schema, store abstraction and analytics
//! pipelines used by the Roster API server and its background worker.
//!
//! ## Module Organization
//!
//! - `models`: User and Task records, their input payloads and validation rules
//! - `store`: Store traits with PostgreSQL and in-memory backends
//! - `db`: PostgreSQL connection pool and embedded migrations
//! - `analytics`: Aggregation pipelines over the user collection
//! - `error`: Store error taxonomy

pub mod analytics;
pub mod db;
pub mod error;
pub mod models;
pub mod store;

/// Current version of the Roster shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
