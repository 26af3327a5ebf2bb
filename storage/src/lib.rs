//! Storage crate: runtime info (JSON key-value file) and the chat database.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – RuntimeInfo, WaEntry
//! - [`runtime_info`] – RuntimeInfoStore (JSON file guarded by a lock file)
//! - [`file_lock`] – FileLock (exclusive lock file)
//! - [`wa_repo`] – WaRepository (SQLite)
//! - [`sqlite_pool`] – SqlitePoolManager

mod error;
mod file_lock;
mod models;
mod runtime_info;
mod sqlite_pool;
mod wa_repo;

pub use error::StorageError;
pub use file_lock::FileLock;
pub use models::{RuntimeInfo, WaEntry};
pub use runtime_info::RuntimeInfoStore;
pub use sqlite_pool::SqlitePoolManager;
pub use wa_repo::WaRepository;
