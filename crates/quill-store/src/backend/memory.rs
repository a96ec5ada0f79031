//! In-memory backend
//!
//! Mimics the hosted database closely enough for tests, the CLI and local
//! development: ids and timestamps are assigned on insert, `updated_at` is
//! touched on update, and a configurable failure turns every call into an
//! error.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::Value as JsonValue;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Backend, Query, Row, Table, SINGLE_ROW_MESSAGE};
use crate::error::{BackendError, BackendResult};

/// In-memory backend
///
/// Rows live in a HashMap keyed by table. Non-persistent - data is lost when
/// the last clone is dropped.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    tables: Arc<RwLock<HashMap<Table, Vec<Row>>>>,
    failure: Arc<RwLock<Option<String>>>,
}

impl MemoryBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Append rows to a table as-is (no id or timestamp assignment)
    pub async fn seed(&self, table: Table, rows: Vec<Row>) {
        self.tables.write().await.entry(table).or_default().extend(rows);
    }

    /// Snapshot of a table's rows in storage order
    pub async fn rows(&self, table: Table) -> Vec<Row> {
        self.tables.read().await.get(&table).cloned().unwrap_or_default()
    }

    /// Make every subsequent call fail with `message`
    pub async fn fail_with(&self, message: impl Into<String>) {
        *self.failure.write().await = Some(message.into());
    }

    /// Stop failing
    pub async fn recover(&self) {
        *self.failure.write().await = None;
    }

    async fn check_failure(&self) -> BackendResult<()> {
        match self.failure.read().await.as_ref() {
            Some(message) => Err(BackendError::new(message.clone())),
            None => Ok(()),
        }
    }
}

fn now_timestamp() -> JsonValue {
    JsonValue::String(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true))
}

/// Text form of a scalar cell; numbers compare by their decimal rendering
fn scalar_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn row_id(row: &Row) -> Option<String> {
    row.get("id").and_then(scalar_text)
}

/// Equality with text coercion, so `eq("id", "1")` matches a numeric `1`
fn cell_matches(cell: &JsonValue, value: &JsonValue) -> bool {
    cell == value
        || matches!((scalar_text(cell), scalar_text(value)), (Some(a), Some(b)) if a == b)
}

/// Does the row satisfy every equality filter of the query (Pure function)
fn matches_filters(row: &Row, query: &Query) -> bool {
    query.filters.iter().all(|filter| {
        row.get(&filter.column)
            .is_some_and(|cell| cell_matches(cell, &filter.value))
    })
}

/// Total order over JSON scalars used for sorting (Pure function)
///
/// Nulls and missing values sort first; values of different kinds compare
/// as equal so the sort stays stable.
fn compare_json(a: Option<&JsonValue>, b: Option<&JsonValue>) -> Ordering {
    match (a, b) {
        (None | Some(JsonValue::Null), None | Some(JsonValue::Null)) => Ordering::Equal,
        (None | Some(JsonValue::Null), _) => Ordering::Less,
        (_, None | Some(JsonValue::Null)) => Ordering::Greater,
        (Some(JsonValue::String(x)), Some(JsonValue::String(y))) => x.cmp(y),
        (Some(JsonValue::Number(x)), Some(JsonValue::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(JsonValue::Bool(x)), Some(JsonValue::Bool(y))) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn select(&self, query: &Query) -> BackendResult<Vec<Row>> {
        self.check_failure().await?;

        let tables = self.tables.read().await;
        let mut rows: Vec<Row> = tables
            .get(&query.table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| matches_filters(row, query))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let ord = compare_json(a.get(&order.column), b.get(&order.column));
                if order.ascending {
                    ord
                } else {
                    ord.reverse()
                }
            });
        }

        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }

        Ok(rows)
    }

    async fn insert(&self, table: Table, mut row: Row) -> BackendResult<Row> {
        self.check_failure().await?;

        if row_id(&row).is_none() {
            row.insert("id".to_string(), JsonValue::String(Uuid::new_v4().to_string()));
        }
        let now = now_timestamp();
        row.entry("created_at").or_insert_with(|| now.clone());
        row.entry("updated_at").or_insert(now);

        let mut tables = self.tables.write().await;
        let rows = tables.entry(table).or_default();

        if let Some(id) = row_id(&row) {
            if rows.iter().any(|existing| row_id(existing).as_deref() == Some(id.as_str())) {
                return Err(BackendError::new(format!(
                    "duplicate key value violates unique constraint \"{}_pkey\"",
                    table
                )));
            }
        }

        rows.push(row.clone());
        Ok(row)
    }

    async fn update(&self, table: Table, id: &str, patch: Row) -> BackendResult<Row> {
        self.check_failure().await?;

        let mut tables = self.tables.write().await;
        let row = tables
            .get_mut(&table)
            .and_then(|rows| rows.iter_mut().find(|row| row_id(row).as_deref() == Some(id)))
            .ok_or_else(|| BackendError::new(SINGLE_ROW_MESSAGE))?;

        let touched = patch.contains_key("updated_at");
        row.extend(patch);
        if !touched {
            row.insert("updated_at".to_string(), now_timestamp());
        }

        Ok(row.clone())
    }

    async fn delete(&self, table: Table, id: &str) -> BackendResult<()> {
        self.check_failure().await?;

        if let Some(rows) = self.tables.write().await.get_mut(&table) {
            rows.retain(|row| row_id(row).as_deref() != Some(id));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
