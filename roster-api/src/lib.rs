//! # Roster API Server Library
//!
//! This library provides the HTTP surface of the Roster service: user and
//! task CRUD, analytics views over the user collection and the wiring to
//! the background side-effect worker.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Validated JSON bodies and path identifiers
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
