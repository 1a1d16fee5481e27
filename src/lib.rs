//! Pet store API: REST backend for pet stores, their employees and customers.

pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod repo;
pub mod response;
pub mod routes;
pub mod schema;
pub mod service;
pub mod state;

pub use config::{AppConfig, DeletePolicy, StorageKind};
pub use error::{AppError, ConfigError};
pub use repo::{MemoryRepository, PgRepository, Repository};
pub use routes::{app, common_routes_with_ready, pet_store_routes};
pub use schema::{ensure_database_exists, ensure_schema};
pub use service::PetStoreService;
pub use state::AppState;
