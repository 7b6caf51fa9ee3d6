//! Resolved per-type metadata: table, columns, primary key, relations

use std::fmt;
use std::sync::Arc;

use super::convert::{CoercionError, DeclaredType, StoreType};
use super::value::Value;
use crate::errors::Result;
use crate::statement;
use crate::store::RelatedRows;

pub(crate) type Getter<T> = Arc<dyn Fn(&T) -> Value + Send + Sync>;
pub(crate) type Setter<T> = Arc<dyn Fn(&mut T, &Value) -> std::result::Result<(), CoercionError> + Send + Sync>;
pub(crate) type Loader<T> = Arc<dyn Fn(&mut T, &dyn RelatedRows, &str) -> Result<Hydration> + Send + Sync>;

/// Binds one property to one stored column
pub struct ColumnMapping<T> {
    pub(crate) property_name: &'static str,
    pub(crate) column_name: String,
    pub(crate) is_primary_key: bool,
    pub(crate) declared_type: DeclaredType,
    pub(crate) getter: Getter<T>,
    pub(crate) setter: Setter<T>,
}

impl<T> ColumnMapping<T> {
    pub fn property_name(&self) -> &'static str {
        self.property_name
    }

    pub fn column_name(&self) -> &str {
        &self.column_name
    }

    pub fn is_primary_key(&self) -> bool {
        self.is_primary_key
    }

    pub fn declared_type(&self) -> DeclaredType {
        self.declared_type
    }

    /// Store column type, `None` when the property type has no store equivalent
    pub fn stored_type(&self) -> Option<StoreType> {
        self.declared_type.store_type()
    }

    /// Read the property off an entity as a stored value
    pub fn read(&self, entity: &T) -> Value {
        (self.getter)(entity)
    }

    /// Coerce `value` into the property; on failure the entity is untouched
    pub fn assign(&self, entity: &mut T, value: &Value) -> std::result::Result<(), CoercionError> {
        (self.setter)(entity, value)
    }
}

impl<T> fmt::Debug for ColumnMapping<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnMapping")
            .field("property_name", &self.property_name)
            .field("column_name", &self.column_name)
            .field("is_primary_key", &self.is_primary_key)
            .field("declared_type", &self.declared_type)
            .finish()
    }
}

/// Outcome of hydrating one relation collection
#[derive(Debug, Default)]
pub struct Hydration {
    pub rows: usize,
    pub diagnostics: Vec<crate::mapper::FieldDiagnostic>,
}

/// Binds one collection property to rows of a related table
pub struct RelationMapping<T> {
    pub(crate) property_name: &'static str,
    pub(crate) related_table: String,
    pub(crate) foreign_key: String,
    pub(crate) element_type: &'static str,
    pub(crate) loader: Loader<T>,
}

impl<T> RelationMapping<T> {
    pub fn property_name(&self) -> &'static str {
        self.property_name
    }

    pub fn related_table(&self) -> &str {
        &self.related_table
    }

    pub fn foreign_key(&self) -> &str {
        &self.foreign_key
    }

    /// Type name of the collection's element
    pub fn element_type(&self) -> &'static str {
        self.element_type
    }

    /// SELECT statement fetching the related rows of `owner_id`
    pub fn select_sql(&self, owner_id: &Value) -> String {
        statement::select_by_column(&self.related_table, &self.foreign_key, owner_id)
    }

    /// Load every related row of `owner_id` and assign the collection on `entity`
    pub fn hydrate(
        &self,
        entity: &mut T,
        source: &dyn RelatedRows,
        owner_id: &Value,
    ) -> Result<Hydration> {
        let sql = self.select_sql(owner_id);
        tracing::debug!(
            property = self.property_name,
            related_table = %self.related_table,
            sql = %sql,
            "hydrating relation"
        );
        (self.loader)(entity, source, &sql)
    }
}

impl<T> fmt::Debug for RelationMapping<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelationMapping")
            .field("property_name", &self.property_name)
            .field("related_table", &self.related_table)
            .field("foreign_key", &self.foreign_key)
            .field("element_type", &self.element_type)
            .finish()
    }
}

/// Complete, validated metadata for one entity type
///
/// Built once by [`MappingBuilder::build`](crate::entity::MappingBuilder::build)
/// and never mutated afterwards.
pub struct TypeMapping<T> {
    pub(crate) type_name: &'static str,
    pub(crate) table_name: String,
    pub(crate) columns: Vec<ColumnMapping<T>>,
    pub(crate) primary_key: usize,
    pub(crate) relations: Vec<RelationMapping<T>>,
}

impl<T> TypeMapping<T> {
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Columns in declaration order, primary key included
    pub fn columns(&self) -> &[ColumnMapping<T>] {
        &self.columns
    }

    pub fn primary_key(&self) -> &ColumnMapping<T> {
        &self.columns[self.primary_key]
    }

    pub fn relations(&self) -> &[RelationMapping<T>] {
        &self.relations
    }

    pub fn column(&self, column_name: &str) -> Option<&ColumnMapping<T>> {
        self.columns
            .iter()
            .find(|c| c.column_name.eq_ignore_ascii_case(column_name))
    }

    /// Columns other than the primary key, in declaration order
    pub fn value_columns(&self) -> impl Iterator<Item = &ColumnMapping<T>> {
        self.columns.iter().filter(|c| !c.is_primary_key)
    }

    /// Primary-key value carried by `entity`
    pub fn primary_key_value(&self, entity: &T) -> Value {
        self.primary_key().read(entity)
    }
}

impl<T> fmt::Debug for TypeMapping<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeMapping")
            .field("type_name", &self.type_name)
            .field("table_name", &self.table_name)
            .field("columns", &self.columns)
            .field("primary_key", &self.primary_key().column_name)
            .field("relations", &self.relations)
            .finish()
    }
}
