//! Row store interface
//!
//! The orchestrator talks to storage only through [`RowStore`]. Concrete
//! backends live in their own crates (see `rowmap-store`).

use crate::errors::{Result, StoreResult};
use crate::model::{Row, Value};
use crate::registry::MappingRegistry;

/// A named statement parameter, bound as `@column`
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub column: String,
    pub value: Value,
}

impl Parameter {
    pub fn new(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Placeholder name as it appears in statement text
    pub fn name(&self) -> String {
        format!("@{}", self.column)
    }
}

/// Rows produced by a query, classified by count
#[derive(Debug, Clone, PartialEq, Default)]
pub enum QueryOutcome {
    #[default]
    NoRows,
    OneRow(Row),
    ManyRows(Vec<Row>),
}

impl QueryOutcome {
    pub fn from_rows(mut rows: Vec<Row>) -> Self {
        match rows.len() {
            0 => QueryOutcome::NoRows,
            1 => match rows.pop() {
                Some(row) => QueryOutcome::OneRow(row),
                None => QueryOutcome::NoRows,
            },
            _ => QueryOutcome::ManyRows(rows),
        }
    }

    pub fn row_count(&self) -> usize {
        match self {
            QueryOutcome::NoRows => 0,
            QueryOutcome::OneRow(_) => 1,
            QueryOutcome::ManyRows(rows) => rows.len(),
        }
    }

    pub fn into_rows(self) -> Vec<Row> {
        match self {
            QueryOutcome::NoRows => Vec::new(),
            QueryOutcome::OneRow(row) => vec![row],
            QueryOutcome::ManyRows(rows) => rows,
        }
    }
}

/// Executes statements against a relational store
///
/// Implementations report failures as `ExError` with kind `Persistence`.
pub trait RowStore {
    /// Run a query and return its rows
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the statement fails.
    fn execute(&self, sql: &str) -> StoreResult<QueryOutcome>;

    /// Run a statement with named `@column` parameters and return the
    /// number of affected rows
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the statement fails.
    fn execute_non_query(&self, sql: &str, params: &[Parameter]) -> StoreResult<usize>;

    /// Identifier generated by the most recent successful insert
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the identifier cannot be read.
    fn last_inserted_id(&self) -> StoreResult<i64>;
}

/// What a relation loader needs while hydrating a collection
pub trait RelatedRows {
    /// Registry used to resolve the element type's mapping
    fn registry(&self) -> &MappingRegistry;

    /// Fetch every row selected by `sql`
    ///
    /// # Errors
    ///
    /// Propagates the store failure.
    fn fetch_rows(&self, sql: &str) -> Result<Vec<Row>>;
}
