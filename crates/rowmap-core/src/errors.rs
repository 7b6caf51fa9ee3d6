use thiserror::Error;

/// Result type alias using OrmError
pub type Result<T> = std::result::Result<T, OrmError>;

/// Result type returned by row stores
pub type StoreResult<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and log correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Metadata
    Mapping,
    SchemaMismatch,
    FieldCoercion,
    UnsupportedType,

    // Query shape
    InvalidInput,
    TooManyRows,

    // Integration/IO
    Config,
    Io,
    Persistence,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::Mapping => "ERR_MAPPING",
            ExErrorKind::SchemaMismatch => "ERR_SCHEMA_MISMATCH",
            ExErrorKind::FieldCoercion => "ERR_FIELD_COERCION",
            ExErrorKind::UnsupportedType => "ERR_UNSUPPORTED_TYPE",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::TooManyRows => "ERR_TOO_MANY_ROWS",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification kind plus optional context (operation, table,
/// entity id) for log correlation. Row stores report their failures with this
/// type; [`OrmError`] converts into it at the logging boundary.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    table: Option<String>,
    entity_id: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            table: None,
            entity_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add table context
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Add entity ID context
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the table context, if any
    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    /// Get the entity ID context, if any
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(table) = &self.table {
            write!(f, " (table: {})", table)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for mapping and CRUD operations
#[derive(Error, Debug, Clone)]
pub enum OrmError {
    /// Type metadata is missing or inconsistent (no table, zero or many primary keys)
    #[error("Mapping error on {type_name}: {reason}")]
    Mapping { type_name: String, reason: String },

    /// An annotated column is absent from the row returned by the store
    #[error("Column {column} (property {property}) not present in result row for table {table}")]
    SchemaMismatch {
        table: String,
        property: String,
        column: String,
    },

    /// A stored value could not be converted to its property type
    #[error("Cannot coerce column {column} into property {property}: {reason}")]
    FieldCoercion {
        property: String,
        column: String,
        reason: String,
    },

    /// A property type has no store column type
    #[error("Unsupported type {declared} for property {property} on {type_name}")]
    UnsupportedType {
        type_name: String,
        property: String,
        declared: String,
    },

    /// A single-row query produced more than one row
    #[error("Expected at most one row, query returned {count}")]
    TooManyRows { count: usize },

    /// Configuration could not be parsed
    #[error("Invalid configuration: {reason}")]
    Config { reason: String },

    /// Filesystem access failed
    #[error("IO error on {path}: {reason}")]
    Io { path: String, reason: String },

    /// Failure reported by the row store
    #[error("Store error: {0}")]
    Store(#[from] ExError),
}

impl OrmError {
    /// Shorthand for a mapping error on type `T`
    pub fn mapping<T: ?Sized>(reason: impl Into<String>) -> Self {
        OrmError::Mapping {
            type_name: std::any::type_name::<T>().to_string(),
            reason: reason.into(),
        }
    }
}

/// Conversion from OrmError to ExError
///
/// Used by the lifecycle logging macros to classify any failure with a stable code.
impl From<OrmError> for ExError {
    fn from(err: OrmError) -> Self {
        match err {
            OrmError::Mapping { type_name, reason } => ExError::new(ExErrorKind::Mapping)
                .with_op("resolve_mapping")
                .with_message(format!("{}: {}", type_name, reason)),

            OrmError::SchemaMismatch {
                table,
                property,
                column,
            } => ExError::new(ExErrorKind::SchemaMismatch)
                .with_op("map_row")
                .with_table(table)
                .with_message(format!(
                    "Column {} for property {} missing from row",
                    column, property
                )),

            OrmError::FieldCoercion {
                property,
                column,
                reason,
            } => ExError::new(ExErrorKind::FieldCoercion)
                .with_op("map_row")
                .with_message(format!("{} <- {}: {}", property, column, reason)),

            OrmError::UnsupportedType {
                type_name,
                property,
                declared,
            } => ExError::new(ExErrorKind::UnsupportedType)
                .with_op("generate_table")
                .with_message(format!(
                    "{}.{} has unsupported type {}",
                    type_name, property, declared
                )),

            OrmError::TooManyRows { count } => ExError::new(ExErrorKind::TooManyRows)
                .with_op("query_one")
                .with_message(format!("Query returned {} rows", count)),

            OrmError::Config { reason } => ExError::new(ExErrorKind::Config).with_message(reason),

            OrmError::Io { path, reason } => ExError::new(ExErrorKind::Io)
                .with_op("read_file")
                .with_message(format!("{}: {}", path, reason)),

            OrmError::Store(inner) => inner,
        }
    }
}
