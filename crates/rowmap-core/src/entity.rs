//! Declarative mapping surface for entity types
//!
//! An entity describes its table, columns and relations once, in code:
//!
//! ```
//! use rowmap_core::{Entity, MappingBuilder};
//!
//! #[derive(Debug, Clone, Default, PartialEq)]
//! struct Post {
//!     id: i64,
//!     user_id: i64,
//!     title: String,
//! }
//!
//! impl Entity for Post {
//!     fn mapping() -> MappingBuilder<Self> {
//!         MappingBuilder::for_table("posts")
//!             .primary_key("id", "id", |p: &Post| p.id, |p, v| p.id = v)
//!             .column("user_id", "user_id", |p: &Post| p.user_id, |p, v| p.user_id = v)
//!             .column("title", "title", |p: &Post| p.title.clone(), |p, v| p.title = v)
//!     }
//! }
//!
//! #[derive(Debug, Clone, Default, PartialEq)]
//! struct User {
//!     id: i64,
//!     name: String,
//!     posts: Vec<Post>,
//! }
//!
//! impl Entity for User {
//!     fn mapping() -> MappingBuilder<Self> {
//!         MappingBuilder::for_table("users")
//!             .primary_key("id", "id", |u: &User| u.id, |u, v| u.id = v)
//!             .column("name", "name", |u: &User| u.name.clone(), |u, v| u.name = v)
//!             .relation::<Post, _>("posts", "posts", "user_id", |u, posts| u.posts = posts)
//!     }
//! }
//!
//! let mapping = User::mapping().build().unwrap();
//! assert_eq!(mapping.table_name(), "users");
//! assert_eq!(mapping.primary_key().column_name(), "id");
//! assert_eq!(mapping.relations()[0].related_table(), "posts");
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use crate::errors::{OrmError, Result};
use crate::mapper;
use crate::model::{
    CoercionError, ColumnMapping, ColumnValue, Hydration, RelationMapping, TypeMapping, Value,
};
use crate::store::RelatedRows;

/// A plain data type persisted in one table
///
/// `Default` supplies the empty instance the row mapper populates; `Clone`
/// lets the entity cache hand out copies.
pub trait Entity: Clone + Default + Send + Sync + 'static {
    /// Describe the table, columns and relations of this type
    fn mapping() -> MappingBuilder<Self>;
}

/// Collects the declarations of one entity type
pub struct MappingBuilder<T> {
    table: Option<String>,
    columns: Vec<ColumnMapping<T>>,
    relations: Vec<RelationMapping<T>>,
}

impl<T: Entity> Default for MappingBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> MappingBuilder<T> {
    /// Builder without a table name; `build` fails until one is set
    pub fn new() -> Self {
        Self {
            table: None,
            columns: Vec::new(),
            relations: Vec::new(),
        }
    }

    pub fn for_table(table: impl Into<String>) -> Self {
        Self::new().table(table)
    }

    /// Set the table name
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Declare a column, with an explicit primary-key flag
    pub fn mapped_column<F, G, S>(
        mut self,
        property: &'static str,
        column: impl Into<String>,
        is_primary_key: bool,
        get: G,
        set: S,
    ) -> Self
    where
        F: ColumnValue + 'static,
        G: Fn(&T) -> F + Send + Sync + 'static,
        S: Fn(&mut T, F) + Send + Sync + 'static,
    {
        self.columns.push(ColumnMapping {
            property_name: property,
            column_name: column.into(),
            is_primary_key,
            declared_type: F::DECLARED,
            getter: Arc::new(move |entity: &T| get(entity).to_value()),
            setter: Arc::new(
                move |entity: &mut T, value: &Value| -> std::result::Result<(), CoercionError> {
                    let converted = F::from_value(value)?;
                    set(entity, converted);
                    Ok(())
                },
            ),
        });
        self
    }

    /// Declare a non-key column
    pub fn column<F, G, S>(
        self,
        property: &'static str,
        column: impl Into<String>,
        get: G,
        set: S,
    ) -> Self
    where
        F: ColumnValue + 'static,
        G: Fn(&T) -> F + Send + Sync + 'static,
        S: Fn(&mut T, F) + Send + Sync + 'static,
    {
        self.mapped_column(property, column, false, get, set)
    }

    /// Declare the primary-key column
    pub fn primary_key<F, G, S>(
        self,
        property: &'static str,
        column: impl Into<String>,
        get: G,
        set: S,
    ) -> Self
    where
        F: ColumnValue + 'static,
        G: Fn(&T) -> F + Send + Sync + 'static,
        S: Fn(&mut T, F) + Send + Sync + 'static,
    {
        self.mapped_column(property, column, true, get, set)
    }

    /// Declare a collection of `R` loaded from `related_table` where
    /// `foreign_key` equals this entity's primary key
    pub fn relation<R, S>(
        mut self,
        property: &'static str,
        related_table: impl Into<String>,
        foreign_key: impl Into<String>,
        set: S,
    ) -> Self
    where
        R: Entity,
        S: Fn(&mut T, Vec<R>) + Send + Sync + 'static,
    {
        self.relations.push(RelationMapping {
            property_name: property,
            related_table: related_table.into(),
            foreign_key: foreign_key.into(),
            element_type: std::any::type_name::<R>(),
            loader: Arc::new(
                move |entity: &mut T, source: &dyn RelatedRows, sql: &str| -> Result<Hydration> {
                    let mapping = source.registry().resolve::<R>()?;
                    let rows = source.fetch_rows(sql)?;
                    let mapped = mapper::map_rows(&rows, &mapping)?;
                    let hydration = Hydration {
                        rows: mapped.entity.len(),
                        diagnostics: mapped.diagnostics,
                    };
                    set(entity, mapped.entity);
                    Ok(hydration)
                },
            ),
        });
        self
    }

    /// Validate the declarations into a [`TypeMapping`]
    ///
    /// # Errors
    ///
    /// `OrmError::Mapping` when no table name is set, when zero or several
    /// columns are flagged primary key, or when a column name repeats.
    pub fn build(self) -> Result<TypeMapping<T>> {
        let table_name = match self.table {
            Some(name) if !name.trim().is_empty() => name,
            _ => return Err(OrmError::mapping::<T>("no table name declared")),
        };

        let keys: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_primary_key)
            .map(|(idx, _)| idx)
            .collect();
        let primary_key = match keys.as_slice() {
            [single] => *single,
            [] => return Err(OrmError::mapping::<T>("no primary key column declared")),
            many => {
                let names: Vec<&str> = many
                    .iter()
                    .map(|idx| self.columns[*idx].column_name.as_str())
                    .collect();
                return Err(OrmError::mapping::<T>(format!(
                    "multiple primary key columns declared: {}",
                    names.join(", ")
                )));
            }
        };

        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.column_name.to_ascii_lowercase()) {
                return Err(OrmError::mapping::<T>(format!(
                    "column {} declared more than once",
                    column.column_name
                )));
            }
        }

        Ok(TypeMapping {
            type_name: std::any::type_name::<T>(),
            table_name,
            columns: self.columns,
            primary_key,
            relations: self.relations,
        })
    }
}
