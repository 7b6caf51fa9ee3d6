//! rowmap core: entity mapping, row mapping and the entity cache
//!
//! This crate holds everything the orchestrator needs that does not touch a
//! database:
//! - Declarative entity metadata ([`Entity`], [`MappingBuilder`]) resolved
//!   once per type by the [`MappingRegistry`]
//! - The row mapper converting rows to entities and entities to parameters
//! - The TTL [`EntityCache`]
//! - The [`RowStore`] interface implemented by storage backends
//! - Statement and CREATE TABLE generation
//! - Error facility, logging facility and configuration

pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod logging_facility;
pub mod mapper;
pub mod model;
pub mod registry;
pub mod schema;
pub mod statement;
pub mod store;

// Re-export commonly used types
pub use cache::{CacheKey, EntityCache, DEFAULT_TTL};
pub use config::{CacheConfig, LoggingConfig, OrmConfig, StoreConfig};
pub use entity::{Entity, MappingBuilder};
pub use errors::{ExError, ExErrorKind, OrmError, Result, StoreResult};
pub use mapper::{FieldDiagnostic, Mapped};
pub use model::{ColumnMapping, ColumnValue, RelationMapping, Row, TypeMapping, Value};
pub use registry::MappingRegistry;
pub use store::{Parameter, QueryOutcome, RelatedRows, RowStore};
