//! Metadata registry
//!
//! Resolves the [`TypeMapping`] of an entity type once and memoizes it by
//! `TypeId`. Failed resolutions are not memoized, so a broken declaration
//! reports its error on every attempt.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use crate::entity::Entity;
use crate::errors::Result;
use crate::model::TypeMapping;

type Slot = Arc<dyn Any + Send + Sync>;

static SHARED: OnceLock<Arc<MappingRegistry>> = OnceLock::new();

/// Per-type mapping memo
#[derive(Default)]
pub struct MappingRegistry {
    mappings: RwLock<HashMap<TypeId, Slot>>,
}

impl MappingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry
    pub fn shared() -> Arc<MappingRegistry> {
        Arc::clone(SHARED.get_or_init(|| Arc::new(MappingRegistry::new())))
    }

    /// Mapping of `T`, built from `T::mapping()` on first use
    ///
    /// # Errors
    ///
    /// `OrmError::Mapping` when the declarations of `T` are invalid.
    pub fn resolve<T: Entity>(&self) -> Result<Arc<TypeMapping<T>>> {
        let type_id = TypeId::of::<T>();

        if let Some(found) = self.lookup::<T>(&type_id) {
            return Ok(found);
        }

        let built = Arc::new(T::mapping().build()?);
        tracing::debug!(
            entity_type = built.type_name(),
            table = built.table_name(),
            columns = built.columns().len(),
            relations = built.relations().len(),
            "resolved type mapping"
        );

        let mut mappings = self.mappings.write().unwrap_or_else(PoisonError::into_inner);
        // A concurrent resolver may have won the race; keep its instance
        let slot = mappings
            .entry(type_id)
            .or_insert_with(|| Arc::clone(&built) as Slot);
        Ok(Arc::clone(slot).downcast::<TypeMapping<T>>().unwrap_or(built))
    }

    fn lookup<T: Entity>(&self, type_id: &TypeId) -> Option<Arc<TypeMapping<T>>> {
        let mappings = self.mappings.read().unwrap_or_else(PoisonError::into_inner);
        mappings
            .get(type_id)
            .and_then(|slot| Arc::clone(slot).downcast::<TypeMapping<T>>().ok())
    }

    pub fn contains<T: Entity>(&self) -> bool {
        let mappings = self.mappings.read().unwrap_or_else(PoisonError::into_inner);
        mappings.contains_key(&TypeId::of::<T>())
    }

    /// Number of memoized mappings
    pub fn len(&self) -> usize {
        self.mappings.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for MappingRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappingRegistry")
            .field("mappings", &self.len())
            .finish()
    }
}
