#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use chrono::{DateTime, TimeZone, Utc};
use common::{user_row, User};
use proptest::prelude::*;
use rowmap_core::mapper::{map_rows, to_object, to_parameters, to_row};
use rowmap_core::{Entity, MappingBuilder, MappingRegistry, OrmError, Row, Value};

#[derive(Debug, Clone, Default, PartialEq)]
struct Reading {
    id: i64,
    sensor: String,
    value: f64,
    level: u8,
    flagged: bool,
    grade: char,
    taken_at: DateTime<Utc>,
    comment: Option<String>,
}

impl Entity for Reading {
    fn mapping() -> MappingBuilder<Self> {
        MappingBuilder::for_table("readings")
            .primary_key("id", "id", |r: &Reading| r.id, |r, v| r.id = v)
            .column("sensor", "sensor", |r: &Reading| r.sensor.clone(), |r, v| r.sensor = v)
            .column("value", "value", |r: &Reading| r.value, |r, v| r.value = v)
            .column("level", "level", |r: &Reading| r.level, |r, v| r.level = v)
            .column("flagged", "flagged", |r: &Reading| r.flagged, |r, v| r.flagged = v)
            .column("grade", "grade", |r: &Reading| r.grade, |r, v| r.grade = v)
            .column("taken_at", "taken_at", |r: &Reading| r.taken_at, |r, v| r.taken_at = v)
            .column("comment", "comment", |r: &Reading| r.comment.clone(), |r, v| r.comment = v)
    }
}

#[test]
fn test_user_row_maps_and_leaves_relation_empty() {
    let registry = MappingRegistry::new();
    let mapping = registry.resolve::<User>().unwrap();

    let mapped = to_object(&user_row(1, "Ann", 30), &mapping).unwrap();

    assert!(mapped.is_clean());
    assert_eq!(mapped.entity.name, "Ann");
    assert_eq!(mapped.entity.age, 30);
    assert!(mapped.entity.posts.is_empty());
}

#[test]
fn test_column_names_match_case_insensitively() {
    let registry = MappingRegistry::new();
    let mapping = registry.resolve::<User>().unwrap();
    let row = Row::from_pairs([
        ("ID", Value::Integer(2)),
        ("Name", Value::from("Bo")),
        ("AGE", Value::Integer(41)),
    ]);

    let user = to_object(&row, &mapping).unwrap().into_inner();
    assert_eq!(user.id, 2);
    assert_eq!(user.age, 41);
}

#[test]
fn test_extra_columns_are_ignored() {
    let registry = MappingRegistry::new();
    let mapping = registry.resolve::<User>().unwrap();
    let row = Row::from_pairs([
        ("id", Value::Integer(3)),
        ("name", Value::from("Cy")),
        ("age", Value::Integer(7)),
        ("nickname", Value::from("c")),
    ]);

    assert!(to_object(&row, &mapping).unwrap().is_clean());
}

#[test]
fn test_missing_column_is_schema_mismatch() {
    let registry = MappingRegistry::new();
    let mapping = registry.resolve::<User>().unwrap();
    let row = Row::from_pairs([("id", Value::Integer(3)), ("name", Value::from("Cy"))]);

    match to_object(&row, &mapping).unwrap_err() {
        OrmError::SchemaMismatch {
            table,
            property,
            column,
        } => {
            assert_eq!(table, "users");
            assert_eq!(property, "age");
            assert_eq!(column, "age");
        }
        other => panic!("expected SchemaMismatch, got {:?}", other),
    }
}

#[test]
fn test_each_bad_field_gets_one_diagnostic() {
    // Given a row with two fields that cannot coerce
    let registry = MappingRegistry::new();
    let mapping = registry.resolve::<Reading>().unwrap();
    let row = Row::from_pairs([
        ("id", Value::Integer(1)),
        ("sensor", Value::from("t1")),
        ("value", Value::from("n/a")),
        ("level", Value::Integer(999)),
        ("flagged", Value::Integer(0)),
        ("grade", Value::from("A")),
        ("taken_at", Value::from("2024-01-02 03:04:05")),
        ("comment", Value::Null),
    ]);

    // When mapped
    let mapped = to_object(&row, &mapping).unwrap();

    // Then both fields keep defaults and are reported in declaration order
    let properties: Vec<&str> = mapped.diagnostics.iter().map(|d| d.property).collect();
    assert_eq!(properties, vec!["value", "level"]);
    assert_eq!(mapped.entity.value, 0.0);
    assert_eq!(mapped.entity.level, 0);
    assert_eq!(mapped.entity.sensor, "t1");
    assert_eq!(
        mapped.entity.taken_at,
        Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
    );
}

#[test]
fn test_map_rows_collects_diagnostics() {
    let registry = MappingRegistry::new();
    let mapping = registry.resolve::<User>().unwrap();
    let bad = Row::from_pairs([
        ("id", Value::Integer(2)),
        ("name", Value::from("Bo")),
        ("age", Value::from("old")),
    ]);

    let mapped = map_rows(&[user_row(1, "Ann", 30), bad], &mapping).unwrap();

    assert_eq!(mapped.entity.len(), 2);
    assert_eq!(mapped.diagnostics.len(), 1);
    assert_eq!(mapped.diagnostics[0].column, "age");
}

#[test]
fn test_parameters_follow_declaration_order() {
    let registry = MappingRegistry::new();
    let mapping = registry.resolve::<User>().unwrap();
    let user = User {
        id: 5,
        name: "Di".to_string(),
        age: 22,
        posts: Vec::new(),
    };

    let params = to_parameters(&user, &mapping, false);
    let names: Vec<String> = params.iter().map(|p| p.name()).collect();
    assert_eq!(names, vec!["@name", "@age"]);
    assert_eq!(params[1].value, Value::Integer(22));
}

fn reading_strategy() -> impl Strategy<Value = Reading> {
    (
        any::<i64>(),
        ".{0,24}",
        -1.0e12f64..1.0e12f64,
        any::<u8>(),
        any::<bool>(),
        any::<char>(),
        0i64..4_102_444_800i64,
        proptest::option::of("[a-z ]{0,16}"),
    )
        .prop_map(
            |(id, sensor, value, level, flagged, grade, secs, comment)| Reading {
                id,
                sensor,
                value,
                level,
                flagged,
                grade,
                taken_at: Utc.timestamp_opt(secs, 0).unwrap(),
                comment,
            },
        )
}

proptest! {
    #[test]
    fn test_to_row_then_to_object_round_trips(reading in reading_strategy()) {
        let registry = MappingRegistry::new();
        let mapping = registry.resolve::<Reading>().unwrap();

        let mapped = to_object(&to_row(&reading, &mapping), &mapping).unwrap();

        prop_assert!(mapped.is_clean());
        prop_assert_eq!(mapped.entity, reading);
    }
}
