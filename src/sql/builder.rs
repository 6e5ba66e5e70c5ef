//! Builds parameterized INSERT, SELECT, UPDATE, DELETE from a resource descriptor.

use crate::model::ResourceDescriptor;
use crate::store::ListQuery;
use serde_json::Value;

/// Quote identifier for PostgreSQL (safe: only from descriptors).
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[derive(Debug, Default)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<Value>,
}

impl QueryBuf {
    fn push_param(&mut self, v: Value) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

/// Placeholder `$n::type` for field `name` (untyped when undeclared).
fn placeholder(resource: &ResourceDescriptor, name: &str, n: usize) -> String {
    resource
        .field(name)
        .map(|f| format!("${}::{}", n, f.kind.pg_type()))
        .unwrap_or_else(|| format!("${}", n))
}

fn column_list(resource: &ResourceDescriptor) -> String {
    resource
        .fields
        .iter()
        .map(|f| quoted(f.name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// SELECT by primary key. Caller binds the id as the sole param.
pub fn select_by_id(resource: &ResourceDescriptor, id: &str) -> QueryBuf {
    let mut q = QueryBuf::default();
    let ph = placeholder(resource, "id", q.push_param(Value::String(id.to_string())));
    q.sql = format!(
        "SELECT {} FROM {} WHERE \"id\" = {}",
        column_list(resource),
        quoted(resource.name),
        ph
    );
    q
}

/// SELECT with exact-match filters on declared fields, in storage (creation) order.
pub fn select_list(resource: &ResourceDescriptor, query: &ListQuery) -> QueryBuf {
    let mut q = QueryBuf::default();
    let mut where_parts = Vec::new();
    for (col, val) in &query.filters {
        if !resource.has_field(col) {
            continue;
        }
        let n = q.push_param(val.clone());
        where_parts.push(format!("{} = {}", quoted(col), placeholder(resource, col, n)));
    }
    let where_clause = if where_parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", where_parts.join(" AND "))
    };
    let limit_clause = query.limit.map(|n| format!(" LIMIT {}", n)).unwrap_or_default();
    let offset_clause = query.offset.map(|n| format!(" OFFSET {}", n)).unwrap_or_default();
    q.sql = format!(
        "SELECT {} FROM {}{} ORDER BY \"created_at\", \"id\"{}{}",
        column_list(resource),
        quoted(resource.name),
        where_clause,
        limit_clause,
        offset_clause
    );
    q
}

/// INSERT every writable field; id and timestamps come from column defaults.
pub fn insert(resource: &ResourceDescriptor, row: &serde_json::Map<String, Value>) -> QueryBuf {
    let mut q = QueryBuf::default();
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for f in resource.writable_fields() {
        let n = q.push_param(row.get(f.name).cloned().unwrap_or(Value::Null));
        cols.push(quoted(f.name));
        placeholders.push(placeholder(resource, f.name, n));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(resource.name),
        cols.join(", "),
        placeholders.join(", "),
        column_list(resource)
    );
    q
}

/// UPDATE by id: SET every writable field present in `row`, bump updated_at.
pub fn update(resource: &ResourceDescriptor, id: &str, row: &serde_json::Map<String, Value>) -> QueryBuf {
    let mut q = QueryBuf::default();
    let mut sets = Vec::new();
    for f in resource.writable_fields() {
        let Some(v) = row.get(f.name) else { continue };
        let n = q.push_param(v.clone());
        sets.push(format!("{} = {}", quoted(f.name), placeholder(resource, f.name, n)));
    }
    sets.push(format!("{} = NOW()", quoted("updated_at")));
    let id_ph = placeholder(resource, "id", q.push_param(Value::String(id.to_string())));
    q.sql = format!(
        "UPDATE {} SET {} WHERE \"id\" = {} RETURNING {}",
        quoted(resource.name),
        sets.join(", "),
        id_ph,
        column_list(resource)
    );
    q
}

/// DELETE by id.
pub fn delete(resource: &ResourceDescriptor, id: &str) -> QueryBuf {
    let mut q = QueryBuf::default();
    let ph = placeholder(resource, "id", q.push_param(Value::String(id.to_string())));
    q.sql = format!("DELETE FROM {} WHERE \"id\" = {}", quoted(resource.name), ph);
    q
}
