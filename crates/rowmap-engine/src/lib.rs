//! rowmap engine - CRUD orchestration
//!
//! [`Orm`] coordinates the mapping registry, the row mapper, the entity
//! cache and a row store to read and write entities without hand-written
//! SQL.
//!
//! ## Logging Ownership
//!
//! The engine owns lifecycle logging for every public operation:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! Lower layers (store, core) use only `tracing::debug!()` for internal details.

pub mod orm;

pub use orm::Orm;
