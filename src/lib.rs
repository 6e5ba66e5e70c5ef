//! Concord: a typed REST backend for a chat/community platform.

pub mod auth;
pub mod error;
pub mod extractors;
pub mod gates;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod notify;
pub mod response;
pub mod routes;
pub mod service;
pub mod settings;
pub mod sql;
pub mod state;
pub mod store;

pub use auth::{Claims, Role, TokenService};
pub use error::{AppError, ConfigError};
pub use migration::apply_migrations;
pub use model::{Registry, Resource};
pub use response::{success_many, success_one, success_one_ok};
pub use routes::{app, resource_routes, Access, Policy};
pub use service::ResourceController;
pub use settings::{Settings, StorageBackend};
pub use state::AppState;
pub use store::{ensure_database_exists, MemoryStore, PgStore, Store};
