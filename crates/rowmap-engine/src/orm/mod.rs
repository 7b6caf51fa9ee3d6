//! The CRUD orchestrator
//!
//! One `Orm` owns one row store. The mapping registry and the entity cache
//! are shared handles, so several orchestrators can observe the same cache.

use std::sync::Arc;

use rowmap_core::mapper::FieldDiagnostic;
use rowmap_core::{
    Entity, EntityCache, MappingRegistry, OrmConfig, RelatedRows, Result, Row, RowStore,
    TypeMapping,
};
use rowmap_store::SqliteStore;

mod read;
mod write;

/// CRUD orchestrator over a row store
pub struct Orm<S: RowStore> {
    store: S,
    registry: Arc<MappingRegistry>,
    cache: Arc<EntityCache>,
}

impl<S: RowStore> Orm<S> {
    /// Orchestrator with the process-wide registry and a private cache
    pub fn new(store: S) -> Self {
        Self::with_cache(store, Arc::new(EntityCache::new()))
    }

    /// Orchestrator sharing a caller-owned cache
    pub fn with_cache(store: S, cache: Arc<EntityCache>) -> Self {
        Self::with_parts(store, MappingRegistry::shared(), cache)
    }

    pub fn with_parts(store: S, registry: Arc<MappingRegistry>, cache: Arc<EntityCache>) -> Self {
        Self {
            store,
            registry,
            cache,
        }
    }

    /// Orchestrator whose private cache follows `config.cache`
    pub fn from_config(store: S, config: &OrmConfig) -> Self {
        Self::with_cache(store, Arc::new(EntityCache::from_config(&config.cache)))
    }

    pub fn cache(&self) -> &Arc<EntityCache> {
        &self.cache
    }

    pub fn registry(&self) -> &Arc<MappingRegistry> {
        &self.registry
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give the store back, e.g. to close it explicitly
    pub fn into_store(self) -> S {
        self.store
    }

    /// Resolved mapping of `T`
    ///
    /// # Errors
    ///
    /// `OrmError::Mapping` when the declarations of `T` are invalid.
    pub fn mapping<T: Entity>(&self) -> Result<Arc<TypeMapping<T>>> {
        self.registry.resolve::<T>()
    }

    fn report(&self, op: &'static str, diagnostics: &[FieldDiagnostic]) {
        for diagnostic in diagnostics {
            tracing::warn!(
                op = op,
                entity_type = diagnostic.entity_type,
                property = diagnostic.property,
                column = %diagnostic.column,
                error = %diagnostic.error,
                "field kept its default value"
            );
        }
    }
}

impl Orm<SqliteStore> {
    /// Open the SQLite database described by `config.store`
    ///
    /// # Errors
    ///
    /// Returns a store error when the database cannot be opened or configured.
    pub fn open(config: &OrmConfig) -> Result<Self> {
        let store = SqliteStore::from_config(&config.store)?;
        Ok(Self::from_config(store, config))
    }
}

impl<S: RowStore> RelatedRows for Orm<S> {
    fn registry(&self) -> &MappingRegistry {
        &self.registry
    }

    fn fetch_rows(&self, sql: &str) -> Result<Vec<Row>> {
        Ok(self.store.execute(sql)?.into_rows())
    }
}

impl<S: RowStore> std::fmt::Debug for Orm<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orm")
            .field("registry", &self.registry)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
