//! Read path: cache-first key lookup, single-row and bulk queries

use std::any::type_name;
use std::time::Instant;

use rowmap_core::store::{QueryOutcome, RowStore};
use rowmap_core::{log_op_end, log_op_error, log_op_start};
use rowmap_core::{mapper, statement, Entity, OrmError, Result, Row, Value};

use super::Orm;

/// Result of a key lookup, with where it was served from
struct Lookup<T> {
    entity: Option<T>,
    cache_hit: bool,
}

impl<S: RowStore> Orm<S> {
    /// Entity with primary key `id`
    ///
    /// Served from the cache when present; a hit neither touches the store
    /// nor re-runs relation hydration, so collections reflect the moment the
    /// entity was cached. On a miss the row is loaded, every relation is
    /// hydrated and the result is cached.
    ///
    /// # Errors
    ///
    /// Mapping, schema-mismatch and store errors. `TooManyRows` when the key
    /// matches several rows.
    pub fn query_by_key<T: Entity>(&self, id: i64) -> Result<Option<T>> {
        log_op_start!("query_by_key", entity_type = type_name::<T>(), entity_id = id);
        let start = Instant::now();

        let lookup = self.query_by_key_impl::<T>(id).map_err(|e| {
            log_op_error!(
                "query_by_key",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                entity_type = type_name::<T>()
            );
            e
        })?;

        log_op_end!(
            "query_by_key",
            duration_ms = start.elapsed().as_millis() as u64,
            entity_type = type_name::<T>(),
            cache_hit = lookup.cache_hit,
            rows = usize::from(lookup.entity.is_some())
        );

        Ok(lookup.entity)
    }

    fn query_by_key_impl<T: Entity>(&self, id: i64) -> Result<Lookup<T>> {
        let mapping = self.registry.resolve::<T>()?;

        if let Some(cached) = self.cache.get::<T>(mapping.table_name(), id) {
            tracing::debug!(table = mapping.table_name(), entity_id = id, "cache hit");
            return Ok(Lookup {
                entity: Some(cached),
                cache_hit: true,
            });
        }

        let key = Value::Integer(id);
        let sql = statement::select_by_key(&mapping, &key);
        let Some(row) = single_row(self.store.execute(&sql)?)? else {
            return Ok(Lookup {
                entity: None,
                cache_hit: false,
            });
        };

        let mapped = mapper::to_object(&row, &mapping)?;
        self.report("query_by_key", &mapped.diagnostics);
        let mut entity = mapped.entity;

        for relation in mapping.relations() {
            let hydration = relation.hydrate(&mut entity, self, &key)?;
            tracing::debug!(
                property = relation.property_name(),
                rows = hydration.rows,
                "relation hydrated"
            );
            self.report("query_by_key", &hydration.diagnostics);
        }

        self.cache.set(mapping.table_name(), id, entity.clone());

        Ok(Lookup {
            entity: Some(entity),
            cache_hit: false,
        })
    }

    /// Run `sql` expecting at most one row
    ///
    /// A found entity is written to the cache under its primary-key value,
    /// unless that value is NULL or could not be coerced. Relations are not
    /// hydrated.
    ///
    /// # Errors
    ///
    /// `TooManyRows` when the query returns more than one row, plus mapping,
    /// schema-mismatch and store errors.
    pub fn query_one<T: Entity>(&self, sql: &str) -> Result<Option<T>> {
        log_op_start!("query_one", entity_type = type_name::<T>());
        let start = Instant::now();

        let entity = self.query_one_impl::<T>(sql).map_err(|e| {
            log_op_error!(
                "query_one",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                entity_type = type_name::<T>()
            );
            e
        })?;

        log_op_end!(
            "query_one",
            duration_ms = start.elapsed().as_millis() as u64,
            entity_type = type_name::<T>(),
            rows = usize::from(entity.is_some())
        );

        Ok(entity)
    }

    fn query_one_impl<T: Entity>(&self, sql: &str) -> Result<Option<T>> {
        let mapping = self.registry.resolve::<T>()?;
        let Some(row) = single_row(self.store.execute(sql)?)? else {
            return Ok(None);
        };

        let mapped = mapper::to_object(&row, &mapping)?;
        self.report("query_one", &mapped.diagnostics);

        let key_property = mapping.primary_key().property_name();
        let key_defaulted = mapped.diagnostics.iter().any(|d| d.property == key_property);
        let id = mapping.primary_key_value(&mapped.entity);
        if id.is_null() {
            tracing::debug!(table = mapping.table_name(), "no key value, not cached");
        } else if key_defaulted {
            tracing::debug!(table = mapping.table_name(), "key value not coerced, not cached");
        } else {
            self.cache.set(mapping.table_name(), id, mapped.entity.clone());
        }

        Ok(Some(mapped.entity))
    }

    /// Run `sql` and map every row
    ///
    /// Never reads or writes the cache and does not hydrate relations.
    ///
    /// # Errors
    ///
    /// Mapping, schema-mismatch and store errors.
    pub fn query_many<T: Entity>(&self, sql: &str) -> Result<Vec<T>> {
        log_op_start!("query_many", entity_type = type_name::<T>());
        let start = Instant::now();

        let entities = self.query_many_impl::<T>(sql).map_err(|e| {
            log_op_error!(
                "query_many",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                entity_type = type_name::<T>()
            );
            e
        })?;

        log_op_end!(
            "query_many",
            duration_ms = start.elapsed().as_millis() as u64,
            entity_type = type_name::<T>(),
            rows = entities.len()
        );

        Ok(entities)
    }

    fn query_many_impl<T: Entity>(&self, sql: &str) -> Result<Vec<T>> {
        let mapping = self.registry.resolve::<T>()?;
        let rows = self.store.execute(sql)?.into_rows();
        let mapped = mapper::map_rows(&rows, &mapping)?;
        self.report("query_many", &mapped.diagnostics);
        Ok(mapped.entity)
    }

    /// Every `T` in `table` whose `foreign_key` column equals `id`
    ///
    /// # Errors
    ///
    /// Same as [`Orm::query_many`].
    pub fn query_many_related<T: Entity>(
        &self,
        table: &str,
        foreign_key: &str,
        id: i64,
    ) -> Result<Vec<T>> {
        let sql = statement::select_by_column(table, foreign_key, &Value::Integer(id));
        self.query_many(&sql)
    }
}

/// The only row of `outcome`, `None` when empty
fn single_row(outcome: QueryOutcome) -> Result<Option<Row>> {
    match outcome {
        QueryOutcome::NoRows => Ok(None),
        QueryOutcome::OneRow(row) => Ok(Some(row)),
        QueryOutcome::ManyRows(rows) => Err(OrmError::TooManyRows { count: rows.len() }),
    }
}
