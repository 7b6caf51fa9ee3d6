#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Each test uses its own entity type and filters captured events by it,
//! since the capture buffer is shared by every test in this binary.

use std::sync::Arc;

use rowmap_core::logging_facility::test_capture::{init_test_capture, CapturedEvent};
use rowmap_core::{Entity, EntityCache, MappingBuilder, MappingRegistry};
use rowmap_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_CACHE_HIT, FIELD_ENTITY_TYPE,
};
use rowmap_engine::Orm;
use rowmap_store::SqliteStore;

macro_rules! entity {
    ($name:ident, $table:literal) => {
        #[derive(Debug, Clone, Default)]
        struct $name {
            id: i64,
            label: String,
        }

        impl Entity for $name {
            fn mapping() -> MappingBuilder<Self> {
                MappingBuilder::for_table($table)
                    .primary_key("id", "id", |e: &$name| e.id, |e, v| e.id = v)
                    .column("label", "label", |e: &$name| e.label.clone(), |e, v| e.label = v)
            }
        }
    };
}

entity!(LoggedCacheItem, "logged_cache_items");
entity!(LoggedTooMany, "logged_too_many");
entity!(LoggedBadField, "logged_bad_field");
entity!(LoggedWrite, "logged_writes");

fn orm_for<T: Entity>() -> Orm<SqliteStore> {
    let orm = Orm::with_parts(
        SqliteStore::open_in_memory().unwrap(),
        Arc::new(MappingRegistry::new()),
        Arc::new(EntityCache::new()),
    );
    assert!(orm.generate_table::<T>().unwrap());
    orm
}

fn events_for<T>(events: Vec<CapturedEvent>, op: &str) -> Vec<CapturedEvent> {
    let type_name = std::any::type_name::<T>();
    events
        .into_iter()
        .filter(|e| e.op.as_deref() == Some(op))
        .filter(|e| e.field(FIELD_ENTITY_TYPE) == Some(type_name))
        .collect()
}

#[test]
fn test_query_by_key_reports_cache_hit() {
    let capture = init_test_capture();
    let orm = orm_for::<LoggedCacheItem>();
    let id = orm
        .insert(&LoggedCacheItem {
            id: 0,
            label: "x".to_string(),
        })
        .unwrap();

    orm.query_by_key::<LoggedCacheItem>(id).unwrap();
    orm.query_by_key::<LoggedCacheItem>(id).unwrap();

    let events = events_for::<LoggedCacheItem>(capture.events(), "query_by_key");
    let starts = events
        .iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_START))
        .count();
    let hits: Vec<Option<&str>> = events
        .iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END))
        .map(|e| e.field(FIELD_CACHE_HIT))
        .collect();

    assert_eq!(starts, 2);
    assert_eq!(hits, vec![Some("false"), Some("true")]);
}

#[test]
fn test_failed_query_emits_end_error_with_code() {
    let capture = init_test_capture();
    let orm = orm_for::<LoggedTooMany>();
    for label in ["a", "b"] {
        orm.insert(&LoggedTooMany {
            id: 0,
            label: label.to_string(),
        })
        .unwrap();
    }

    orm.query_one::<LoggedTooMany>("SELECT * FROM logged_too_many")
        .unwrap_err();

    let events = events_for::<LoggedTooMany>(capture.events(), "query_one");
    let errors: Vec<_> = events
        .iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field("err.code"), Some("ERR_TOO_MANY_ROWS"));
    assert!(events.iter().all(|e| e.event.as_deref() != Some(EVENT_END)));
}

#[test]
fn test_coercion_diagnostic_logged_at_warn() {
    let capture = init_test_capture();
    let orm = orm_for::<LoggedBadField>();
    orm.store()
        .connection()
        .execute_batch("INSERT INTO logged_bad_field (label) VALUES (X'00ff');")
        .unwrap();

    let item = orm.query_by_key::<LoggedBadField>(1).unwrap().unwrap();
    assert_eq!(item.label, "");

    let warnings: Vec<_> = events_for::<LoggedBadField>(capture.events(), "query_by_key")
        .into_iter()
        .filter(|e| e.level == tracing::Level::WARN)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].field("property"), Some("label"));
}

#[test]
fn test_write_operations_emit_one_start_and_end_each() {
    let capture = init_test_capture();
    let orm = orm_for::<LoggedWrite>();
    let mut item = LoggedWrite {
        id: 0,
        label: "w".to_string(),
    };
    item.id = orm.insert(&item).unwrap();
    item.label = "w2".to_string();
    orm.update(&item).unwrap();
    orm.delete::<LoggedWrite>(item.id).unwrap();

    let events = capture.events();
    for op in ["insert", "update", "delete", "generate_table"] {
        let op_events = events_for::<LoggedWrite>(events.clone(), op);
        let starts = op_events
            .iter()
            .filter(|e| e.event.as_deref() == Some(EVENT_START))
            .count();
        let ends = op_events
            .iter()
            .filter(|e| e.event.as_deref() == Some(EVENT_END))
            .count();
        assert_eq!((starts, ends), (1, 1), "op {}", op);
    }
}
