//! Row mapper: rows to entities and entities to statement parameters
//!
//! The read path fails hard only when the row lacks a mapped column. Values
//! that do not coerce to their property type are recovered per field and
//! reported back as [`FieldDiagnostic`]s; the property keeps its default.

use std::sync::Arc;

use crate::errors::{OrmError, Result};
use crate::model::{CoercionError, Row, TypeMapping, Value};
use crate::store::Parameter;

/// A field that kept its default because the stored value did not coerce
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDiagnostic {
    pub entity_type: &'static str,
    pub property: &'static str,
    pub column: String,
    pub error: CoercionError,
}

impl FieldDiagnostic {
    pub fn into_error(self) -> OrmError {
        OrmError::FieldCoercion {
            property: self.property.to_string(),
            column: self.column,
            reason: self.error.to_string(),
        }
    }
}

/// A mapped value together with the diagnostics recorded while mapping it
#[derive(Debug, Clone)]
pub struct Mapped<T> {
    pub entity: T,
    pub diagnostics: Vec<FieldDiagnostic>,
}

impl<T> Mapped<T> {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn into_inner(self) -> T {
        self.entity
    }
}

/// Populate a new `T` from `row`
///
/// Relation collections are left at their default; the orchestrator
/// hydrates them separately.
///
/// # Errors
///
/// `OrmError::SchemaMismatch` when a mapped column is absent from the row.
pub fn to_object<T: Default>(row: &Row, mapping: &TypeMapping<T>) -> Result<Mapped<T>> {
    let mut entity = T::default();
    let mut diagnostics = Vec::new();

    for column in mapping.columns() {
        let value = row.get(column.column_name()).ok_or_else(|| OrmError::SchemaMismatch {
            table: mapping.table_name().to_string(),
            property: column.property_name().to_string(),
            column: column.column_name().to_string(),
        })?;

        if let Err(error) = column.assign(&mut entity, value) {
            tracing::debug!(
                property = column.property_name(),
                column = column.column_name(),
                error = %error,
                "field coercion failed, keeping default"
            );
            diagnostics.push(FieldDiagnostic {
                entity_type: mapping.type_name(),
                property: column.property_name(),
                column: column.column_name().to_string(),
                error,
            });
        }
    }

    Ok(Mapped {
        entity,
        diagnostics,
    })
}

/// Map every row, collecting the diagnostics of all of them
///
/// # Errors
///
/// Stops at the first row missing a mapped column.
pub fn map_rows<T: Default>(rows: &[Row], mapping: &TypeMapping<T>) -> Result<Mapped<Vec<T>>> {
    let mut entities = Vec::with_capacity(rows.len());
    let mut diagnostics = Vec::new();
    for row in rows {
        let mapped = to_object(row, mapping)?;
        entities.push(mapped.entity);
        diagnostics.extend(mapped.diagnostics);
    }
    Ok(Mapped {
        entity: entities,
        diagnostics,
    })
}

/// Named parameters for every mapped column in declaration order
pub fn to_parameters<T>(
    entity: &T,
    mapping: &TypeMapping<T>,
    include_primary_key: bool,
) -> Vec<Parameter> {
    mapping
        .columns()
        .iter()
        .filter(|c| include_primary_key || !c.is_primary_key())
        .map(|c| Parameter {
            column: c.column_name().to_string(),
            value: c.read(entity),
        })
        .collect()
}

/// Full row for `entity`, primary key included
pub fn to_row<T>(entity: &T, mapping: &TypeMapping<T>) -> Row {
    let columns: Arc<[String]> = mapping
        .columns()
        .iter()
        .map(|c| c.column_name().to_string())
        .collect::<Vec<_>>()
        .into();
    let values: Vec<Value> = mapping.columns().iter().map(|c| c.read(entity)).collect();
    Row::new(columns, values)
}
