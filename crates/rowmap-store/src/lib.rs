//! rowmap store - SQLite row store
//!
//! Provides:
//! - Connection management and pragma configuration
//! - `SqliteStore`, the `RowStore` implementation over rusqlite
//! - Mapping of rusqlite failures into the structured error facility

pub mod db;
pub mod errors;
pub mod sqlite_store;

// Re-export key types
pub use errors::Result;
pub use sqlite_store::SqliteStore;
