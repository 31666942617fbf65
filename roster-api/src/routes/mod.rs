/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Service info and store health check
/// - `users`: User management (create, list, get, replace, delete)
/// - `analytics`: Aggregation views over the user collection
/// - `tasks`: Task manager (CRUD, partial patch, complete)

pub mod analytics;
pub mod health;
pub mod tasks;
pub mod users;
