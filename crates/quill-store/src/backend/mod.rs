//! Backend-as-a-service boundary
//!
//! Stores talk to the hosted database through [`Backend`]: a narrow,
//! table-oriented interface of select/insert/update/delete calls. Each call
//! either yields rows or a [`BackendError`], which the caller treats as fatal
//! for that call only.

use std::fmt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::error::{BackendError, BackendResult, StoreError};

pub mod memory;

pub use memory::MemoryBackend;

/// One row as sent over the wire
pub type Row = serde_json::Map<String, JsonValue>;

/// Error message for `select_single` when the result is not exactly one row
pub const SINGLE_ROW_MESSAGE: &str = "JSON object requested, multiple (or no) rows returned";

/// Tables the stores read and write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    Profiles,
    Posts,
    Comments,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Profiles => "profiles",
            Table::Posts => "posts",
            Table::Comments => "comments",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Equality filter on one column
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub value: JsonValue,
}

/// Sort order on one column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

/// Select query: table, equality filters, optional ordering and limit
///
/// ```
/// use quill_store::backend::{Query, Table};
///
/// let query = Query::from(Table::Comments)
///     .eq("post_id", "p1")
///     .order("created_at", true);
/// assert_eq!(query.filters.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub table: Table,
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn from(table: Table) -> Self {
        Self {
            table,
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.filters.push(Filter {
            column: column.into(),
            value: value.into(),
        });
        self
    }

    pub fn order(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.order = Some(Order {
            column: column.into(),
            ascending,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Hosted database client
#[async_trait]
pub trait Backend: Send + Sync {
    /// Rows matching the query, in the order the backend decides
    async fn select(&self, query: &Query) -> BackendResult<Vec<Row>>;

    /// Exactly one row; zero or several rows is an error
    async fn select_single(&self, query: &Query) -> BackendResult<Row> {
        let mut rows = self.select(query).await?;
        if rows.len() == 1 {
            Ok(rows.remove(0))
        } else {
            Err(BackendError::new(SINGLE_ROW_MESSAGE))
        }
    }

    /// Insert a row and return it as stored (with server-assigned columns)
    async fn insert(&self, table: Table, row: Row) -> BackendResult<Row>;

    /// Merge `patch` into the row with `id` and return the updated row
    async fn update(&self, table: Table, id: &str, patch: Row) -> BackendResult<Row>;

    /// Delete the row with `id`
    async fn delete(&self, table: Table, id: &str) -> BackendResult<()>;

    /// Backend name for logs
    fn name(&self) -> &'static str;
}

/// Serialize a payload into a row
pub fn to_row<T: Serialize>(value: &T) -> Result<Row, StoreError> {
    match serde_json::to_value(value)? {
        JsonValue::Object(row) => Ok(row),
        other => Err(StoreError::Decode(<serde_json::Error as serde::ser::Error>::custom(format!(
            "expected an object, got {}",
            other
        )))),
    }
}

/// Decode a row into an entity
pub fn from_row<T: DeserializeOwned>(row: Row) -> Result<T, StoreError> {
    Ok(serde_json::from_value(JsonValue::Object(row))?)
}

/// Decode many rows, failing on the first bad one
pub fn from_rows<T: DeserializeOwned>(rows: Vec<Row>) -> Result<Vec<T>, StoreError> {
    rows.into_iter().map(from_row).collect()
}
