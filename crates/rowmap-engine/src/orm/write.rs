//! Write path: insert, update, delete and table creation
//!
//! Update and delete invalidate the cached entity only when exactly one row
//! was affected. Insert leaves the cache alone.

use std::any::type_name;
use std::time::Instant;

use rowmap_core::store::{Parameter, RowStore};
use rowmap_core::{log_op_end, log_op_error, log_op_start};
use rowmap_core::{mapper, schema, statement, Entity, Result};

use super::Orm;

impl<S: RowStore> Orm<S> {
    /// Insert `entity` and return the identifier the store generated
    ///
    /// The primary-key property of `entity` is ignored.
    ///
    /// # Errors
    ///
    /// Mapping and store errors.
    pub fn insert<T: Entity>(&self, entity: &T) -> Result<i64> {
        log_op_start!("insert", entity_type = type_name::<T>());
        let start = Instant::now();

        let id = self.insert_impl(entity).map_err(|e| {
            log_op_error!(
                "insert",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                entity_type = type_name::<T>()
            );
            e
        })?;

        log_op_end!(
            "insert",
            duration_ms = start.elapsed().as_millis() as u64,
            entity_type = type_name::<T>(),
            entity_id = id
        );

        Ok(id)
    }

    fn insert_impl<T: Entity>(&self, entity: &T) -> Result<i64> {
        let mapping = self.registry.resolve::<T>()?;
        let sql = statement::insert(&mapping);
        let params = mapper::to_parameters(entity, &mapping, false);
        self.store.execute_non_query(&sql, &params)?;
        Ok(self.store.last_inserted_id()?)
    }

    /// Write every non-key column of `entity` to the row with its primary key
    ///
    /// Returns `true` and drops the cached copy when exactly one row changed.
    ///
    /// # Errors
    ///
    /// Mapping and store errors.
    pub fn update<T: Entity>(&self, entity: &T) -> Result<bool> {
        log_op_start!("update", entity_type = type_name::<T>());
        let start = Instant::now();

        let updated = self.update_impl(entity).map_err(|e| {
            log_op_error!(
                "update",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                entity_type = type_name::<T>()
            );
            e
        })?;

        log_op_end!(
            "update",
            duration_ms = start.elapsed().as_millis() as u64,
            entity_type = type_name::<T>(),
            rows_affected = usize::from(updated)
        );

        Ok(updated)
    }

    fn update_impl<T: Entity>(&self, entity: &T) -> Result<bool> {
        let mapping = self.registry.resolve::<T>()?;
        let id = mapping.primary_key_value(entity);
        let Some(sql) = statement::update(&mapping, &id) else {
            tracing::debug!(table = mapping.table_name(), "no columns to update");
            return Ok(false);
        };

        let params = mapper::to_parameters(entity, &mapping, false);
        let affected = self.store.execute_non_query(&sql, &params)?;
        if affected != 1 {
            tracing::debug!(table = mapping.table_name(), affected, "update left cache untouched");
            return Ok(false);
        }

        self.cache.delete(mapping.table_name(), id);
        Ok(true)
    }

    /// Delete the row with primary key `id`
    ///
    /// Returns `true` and drops the cached copy when exactly one row was
    /// removed.
    ///
    /// # Errors
    ///
    /// Mapping and store errors.
    pub fn delete<T: Entity>(&self, id: i64) -> Result<bool> {
        log_op_start!("delete", entity_type = type_name::<T>(), entity_id = id);
        let start = Instant::now();

        let deleted = self.delete_impl::<T>(id).map_err(|e| {
            log_op_error!(
                "delete",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                entity_type = type_name::<T>()
            );
            e
        })?;

        log_op_end!(
            "delete",
            duration_ms = start.elapsed().as_millis() as u64,
            entity_type = type_name::<T>(),
            rows_affected = usize::from(deleted)
        );

        Ok(deleted)
    }

    fn delete_impl<T: Entity>(&self, id: i64) -> Result<bool> {
        let mapping = self.registry.resolve::<T>()?;
        let sql = statement::delete(&mapping);
        let params = [Parameter::new(mapping.primary_key().column_name(), id)];
        let affected = self.store.execute_non_query(&sql, &params)?;
        if affected != 1 {
            tracing::debug!(table = mapping.table_name(), affected, "delete left cache untouched");
            return Ok(false);
        }

        self.cache.delete(mapping.table_name(), id);
        Ok(true)
    }

    /// Create the table of `T`
    ///
    /// Returns `false` when the store rejects the statement, for example
    /// because the table already exists.
    ///
    /// # Errors
    ///
    /// `OrmError::Mapping` for invalid declarations and
    /// `OrmError::UnsupportedType` when a column type has no store type.
    pub fn generate_table<T: Entity>(&self) -> Result<bool> {
        log_op_start!("generate_table", entity_type = type_name::<T>());
        let start = Instant::now();

        let created = self.generate_table_impl::<T>().map_err(|e| {
            log_op_error!(
                "generate_table",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                entity_type = type_name::<T>()
            );
            e
        })?;

        log_op_end!(
            "generate_table",
            duration_ms = start.elapsed().as_millis() as u64,
            entity_type = type_name::<T>(),
            created = created
        );

        Ok(created)
    }

    fn generate_table_impl<T: Entity>(&self) -> Result<bool> {
        let mapping = self.registry.resolve::<T>()?;
        let sql = schema::create_table_sql(&mapping)?;
        match self.store.execute_non_query(&sql, &[]) {
            Ok(_) => Ok(true),
            Err(err) => {
                tracing::warn!(
                    table = mapping.table_name(),
                    err.code = err.code(),
                    error = %err,
                    "create table failed"
                );
                Ok(false)
            }
        }
    }
}
