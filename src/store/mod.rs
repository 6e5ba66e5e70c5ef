//! Storage seam: the controller talks to a `Store`, never to a concrete backend.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::{ensure_database_exists, PgStore};

use crate::error::AppError;
use crate::model::{FieldKind, ResourceDescriptor};
use async_trait::async_trait;
use serde_json::{Map, Value};
use uuid::Uuid;

/// One stored record as a JSON object keyed by field name.
pub type Row = Map<String, Value>;

/// Hard cap on a single list page.
pub const MAX_LIMIT: u32 = 1000;

/// Exact-match filters plus paging for list queries.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListQuery {
    pub filters: Vec<(String, Value)>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl ListQuery {
    pub fn filter(mut self, field: &str, value: Value) -> Self {
        self.filters.push((field.to_string(), value));
        self
    }

    pub fn limit(mut self, n: u32) -> Self {
        self.limit = Some(n.min(MAX_LIMIT));
        self
    }

    pub fn offset(mut self, n: u32) -> Self {
        self.offset = Some(n);
        self
    }

    /// Build from query-string pairs: `limit`, `offset`, and declared fields as filters.
    /// Unknown and sensitive keys are ignored; filter values are coerced to the field's kind.
    pub fn from_params<'a>(
        resource: &ResourceDescriptor,
        params: impl IntoIterator<Item = (&'a String, &'a String)>,
    ) -> Self {
        let mut q = ListQuery::default();
        for (k, v) in params {
            match k.as_str() {
                "limit" => {
                    if let Ok(n) = v.parse::<u32>() {
                        q = q.limit(n);
                    }
                }
                "offset" => q.offset = v.parse().ok(),
                _ if resource.sensitive.contains(&k.as_str()) => {}
                _ => {
                    if let Some(field) = resource.field(k) {
                        q.filters.push((k.clone(), coerce(field.kind, v)));
                    }
                }
            }
        }
        q
    }
}

/// Query-string text to the JSON value a stored row would hold for that kind.
pub fn coerce(kind: FieldKind, s: &str) -> Value {
    match kind {
        FieldKind::Id | FieldKind::Uuid => match Uuid::parse_str(s) {
            Ok(u) => Value::String(u.to_string()),
            Err(_) => Value::String(s.to_string()),
        },
        FieldKind::Integer | FieldKind::BigInt => match s.parse::<i64>() {
            Ok(n) => Value::Number(n.into()),
            Err(_) => Value::String(s.to_string()),
        },
        FieldKind::Bool => match s.to_ascii_lowercase().as_str() {
            "true" | "1" => Value::Bool(true),
            "false" | "0" => Value::Bool(false),
            _ => Value::String(s.to_string()),
        },
        FieldKind::Text | FieldKind::Timestamp => Value::String(s.to_string()),
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Cheap liveness check for the readiness route.
    async fn ping(&self) -> Result<(), AppError>;

    async fn list(&self, resource: &ResourceDescriptor, query: &ListQuery) -> Result<Vec<Row>, AppError>;

    async fn fetch(&self, resource: &ResourceDescriptor, id: Uuid) -> Result<Option<Row>, AppError>;

    /// Insert writable fields; storage assigns id and timestamps. Returns the stored row.
    async fn insert(&self, resource: &ResourceDescriptor, row: Row) -> Result<Row, AppError>;

    /// Overwrite writable fields of row `id`; `None` when no such row.
    async fn update(&self, resource: &ResourceDescriptor, id: Uuid, row: Row) -> Result<Option<Row>, AppError>;

    /// Rows affected (0 or 1).
    async fn delete(&self, resource: &ResourceDescriptor, id: Uuid) -> Result<u64, AppError>;
}
