//! HTTP handlers for resource CRUD and authentication.

pub mod auth;
pub mod resource;
pub use auth::{login, me};
pub use resource::{create, delete, get, list, present, update};
