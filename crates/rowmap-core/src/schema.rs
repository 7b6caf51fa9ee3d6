//! CREATE TABLE emission from a type mapping

use crate::errors::{OrmError, Result};
use crate::model::TypeMapping;
use crate::statement::quote_identifier;

const PRIMARY_KEY_DEFINITION: &str = "INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL";

/// Build the CREATE TABLE statement for `mapping`
///
/// The primary key comes first as an auto-increment integer, followed by the
/// other columns in declaration order. Identifiers are double-quoted.
///
/// # Errors
///
/// `OrmError::UnsupportedType` when a non-key property type has no store
/// column type.
pub fn create_table_sql<T>(mapping: &TypeMapping<T>) -> Result<String> {
    let mut definitions = Vec::with_capacity(mapping.columns().len());
    definitions.push(format!(
        "{} {}",
        quote_identifier(mapping.primary_key().column_name()),
        PRIMARY_KEY_DEFINITION
    ));

    for column in mapping.value_columns() {
        let store_type = column
            .stored_type()
            .ok_or_else(|| OrmError::UnsupportedType {
                type_name: mapping.type_name().to_string(),
                property: column.property_name().to_string(),
                declared: column.declared_type().name().to_string(),
            })?;
        definitions.push(format!(
            "{} {}",
            quote_identifier(column.column_name()),
            store_type.as_sql()
        ));
    }

    Ok(format!(
        "CREATE TABLE {} ({});",
        quote_identifier(mapping.table_name()),
        definitions.join(", ")
    ))
}
