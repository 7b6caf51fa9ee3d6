use rowmap_core::errors::{ExError, ExErrorKind, OrmError};

#[test]
fn test_schema_mismatch_verifiable_by_kind() {
    let err = OrmError::SchemaMismatch {
        table: "users".to_string(),
        property: "age".to_string(),
        column: "age".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::SchemaMismatch);
    assert_eq!(ex_err.code(), "ERR_SCHEMA_MISMATCH");
    assert_eq!(ex_err.table(), Some("users"));
    assert!(ex_err.message().contains("age"));
}

#[test]
fn test_unsupported_type_structured_fields() {
    let err = OrmError::UnsupportedType {
        type_name: "Attachment".to_string(),
        property: "payload".to_string(),
        declared: "Vec<u8>".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::UnsupportedType);
    assert_eq!(ex_err.op(), Some("generate_table"));
    assert!(ex_err.message().contains("Vec<u8>"));
}

#[test]
fn test_too_many_rows_distinct_from_mapping() {
    let many: ExError = OrmError::TooManyRows { count: 3 }.into();
    let mapping: ExError = OrmError::mapping::<u8>("no table name declared").into();

    assert_eq!(many.code(), "ERR_TOO_MANY_ROWS");
    assert_eq!(mapping.code(), "ERR_MAPPING");
    assert_ne!(many.kind(), mapping.kind());
    assert!(mapping.message().contains("u8"));
}

#[test]
fn test_store_errors_keep_their_context() {
    let store_err = ExError::new(ExErrorKind::Persistence)
        .with_op("sqlite")
        .with_table("users")
        .with_entity_id("7")
        .with_message("no such table: users");

    let orm_err = OrmError::from(store_err);
    assert!(orm_err.to_string().contains("no such table"));

    let back: ExError = orm_err.into();
    assert_eq!(back.code(), "ERR_PERSISTENCE");
    assert_eq!(back.entity_id(), Some("7"));
}

#[test]
fn test_error_kind_code_mapping() {
    let kinds = vec![
        (ExErrorKind::Mapping, "ERR_MAPPING"),
        (ExErrorKind::SchemaMismatch, "ERR_SCHEMA_MISMATCH"),
        (ExErrorKind::FieldCoercion, "ERR_FIELD_COERCION"),
        (ExErrorKind::UnsupportedType, "ERR_UNSUPPORTED_TYPE"),
        (ExErrorKind::InvalidInput, "ERR_INVALID_INPUT"),
        (ExErrorKind::TooManyRows, "ERR_TOO_MANY_ROWS"),
        (ExErrorKind::Config, "ERR_CONFIG"),
        (ExErrorKind::Io, "ERR_IO"),
        (ExErrorKind::Persistence, "ERR_PERSISTENCE"),
        (ExErrorKind::Internal, "ERR_INTERNAL"),
    ];

    for (kind, expected_code) in kinds {
        assert_eq!(kind.code(), expected_code);
    }
}
