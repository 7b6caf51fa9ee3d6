//! SQL statement text for the CRUD operations
//!
//! Identifiers are double-quoted, matching the CREATE TABLE text. Values
//! bound at execution time use `@column` placeholders; key values in WHERE
//! clauses are inlined as literals.

use crate::model::{TypeMapping, Value};

/// Double-quote an identifier, doubling any embedded quote
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// `SELECT * FROM "table" WHERE "column" = literal`
pub fn select_by_column(table: &str, column: &str, value: &Value) -> String {
    format!(
        "SELECT * FROM {} WHERE {} = {}",
        quote_identifier(table),
        quote_identifier(column),
        value.to_sql_literal()
    )
}

/// `SELECT * FROM table WHERE pk = id`
pub fn select_by_key<T>(mapping: &TypeMapping<T>, id: &Value) -> String {
    select_by_column(mapping.table_name(), mapping.primary_key().column_name(), id)
}

/// INSERT over every non-key column
pub fn insert<T>(mapping: &TypeMapping<T>) -> String {
    let table = quote_identifier(mapping.table_name());
    let names: Vec<&str> = mapping.value_columns().map(|c| c.column_name()).collect();
    if names.is_empty() {
        return format!("INSERT INTO {} DEFAULT VALUES", table);
    }
    let columns: Vec<String> = names.iter().map(|c| quote_identifier(c)).collect();
    let placeholders: Vec<String> = names.iter().map(|c| format!("@{}", c)).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        columns.join(", "),
        placeholders.join(", ")
    )
}

/// UPDATE of every non-key column, `None` when there is nothing to set
pub fn update<T>(mapping: &TypeMapping<T>, id: &Value) -> Option<String> {
    let assignments: Vec<String> = mapping
        .value_columns()
        .map(|c| format!("{} = @{}", quote_identifier(c.column_name()), c.column_name()))
        .collect();
    if assignments.is_empty() {
        return None;
    }
    Some(format!(
        "UPDATE {} SET {} WHERE {} = {}",
        quote_identifier(mapping.table_name()),
        assignments.join(", "),
        quote_identifier(mapping.primary_key().column_name()),
        id.to_sql_literal()
    ))
}

/// DELETE by primary key, bound through the `@pk` parameter
pub fn delete<T>(mapping: &TypeMapping<T>) -> String {
    let pk = mapping.primary_key().column_name();
    format!(
        "DELETE FROM {} WHERE {} = @{}",
        quote_identifier(mapping.table_name()),
        quote_identifier(pk),
        pk
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Entity, MappingBuilder};

    #[derive(Debug, Clone, Default)]
    struct Person {
        id: i64,
        name: String,
        age: i32,
    }

    impl Entity for Person {
        fn mapping() -> MappingBuilder<Self> {
            MappingBuilder::for_table("people")
                .primary_key("id", "id", |p: &Person| p.id, |p, v| p.id = v)
                .column("name", "name", |p: &Person| p.name.clone(), |p, v| p.name = v)
                .column("age", "age", |p: &Person| p.age, |p, v| p.age = v)
        }
    }

    #[derive(Debug, Clone, Default)]
    struct Marker {
        id: i64,
    }

    impl Entity for Marker {
        fn mapping() -> MappingBuilder<Self> {
            MappingBuilder::for_table("markers").primary_key("id", "id", |m: &Marker| m.id, |m, v| m.id = v)
        }
    }

    #[test]
    fn test_select_inlines_literal() {
        assert_eq!(
            select_by_column("posts", "user_id", &Value::Integer(5)),
            r#"SELECT * FROM "posts" WHERE "user_id" = 5"#
        );
        assert_eq!(
            select_by_column("tags", "label", &Value::from("it's")),
            r#"SELECT * FROM "tags" WHERE "label" = 'it''s'"#
        );
    }

    #[test]
    fn test_insert_skips_primary_key() {
        let mapping = Person::mapping().build().unwrap();
        assert_eq!(
            insert(&mapping),
            r#"INSERT INTO "people" ("name", "age") VALUES (@name, @age)"#
        );
    }

    #[test]
    fn test_update_and_delete() {
        let mapping = Person::mapping().build().unwrap();
        assert_eq!(
            update(&mapping, &Value::Integer(3)).as_deref(),
            Some(r#"UPDATE "people" SET "name" = @name, "age" = @age WHERE "id" = 3"#)
        );
        assert_eq!(delete(&mapping), r#"DELETE FROM "people" WHERE "id" = @id"#);
        assert_eq!(
            select_by_key(&mapping, &Value::Integer(3)),
            r#"SELECT * FROM "people" WHERE "id" = 3"#
        );
    }

    #[test]
    fn test_key_only_entity() {
        let mapping = Marker::mapping().build().unwrap();
        assert_eq!(insert(&mapping), r#"INSERT INTO "markers" DEFAULT VALUES"#);
        assert!(update(&mapping, &Value::Integer(1)).is_none());
    }

    #[test]
    fn test_quote_identifier_escapes_quotes() {
        assert_eq!(quote_identifier("order"), r#""order""#);
        assert_eq!(quote_identifier(r#"odd"name"#), r#""odd""name""#);
    }
}
