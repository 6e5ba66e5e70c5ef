//! In-process store: insertion-ordered tables with unique, foreign-key and cascade semantics
//! matching the Postgres schema. Used for tests and `STORAGE_BACKEND=memory`.

use crate::error::AppError;
use crate::model::{OnDelete, Registry, ResourceDescriptor};
use crate::store::{ListQuery, Row, Store};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockWriteGuard};
use uuid::Uuid;

type Tables = HashMap<String, Vec<Row>>;

pub struct MemoryStore {
    registry: Registry,
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new(registry: Registry) -> Self {
        let tables = registry
            .resources()
            .iter()
            .map(|r| (r.name.to_string(), Vec::new()))
            .collect();
        MemoryStore {
            registry,
            tables: RwLock::new(tables),
        }
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, AppError> {
        self.tables
            .write()
            .map_err(|_| AppError::Internal("memory store lock poisoned".into()))
    }

    fn read_rows<T>(&self, name: &str, f: impl FnOnce(&[Row]) -> T) -> Result<T, AppError> {
        let tables = self
            .tables
            .read()
            .map_err(|_| AppError::Internal("memory store lock poisoned".into()))?;
        Ok(f(tables.get(name).map(Vec::as_slice).unwrap_or(&[])))
    }

    /// Delete `id` from `resource` and apply relation policies to dependents.
    fn delete_locked(&self, tables: &mut Tables, resource: &str, id: &str) -> u64 {
        let Some(rows) = tables.get_mut(resource) else {
            return 0;
        };
        let before = rows.len();
        rows.retain(|r| r.get("id").and_then(Value::as_str) != Some(id));
        let removed = (before - rows.len()) as u64;
        if removed == 0 {
            return 0;
        }
        for (dependent, relation) in self.registry.dependents_of(resource) {
            let matches = |r: &Row| r.get(relation.field).and_then(Value::as_str) == Some(id);
            match relation.on_delete {
                OnDelete::Cascade => {
                    let doomed: Vec<String> = tables
                        .get(dependent.name)
                        .map(|rows| {
                            rows.iter()
                                .filter(|r| matches(r))
                                .filter_map(|r| r.get("id").and_then(Value::as_str).map(String::from))
                                .collect()
                        })
                        .unwrap_or_default();
                    for child in doomed {
                        self.delete_locked(tables, dependent.name, &child);
                    }
                }
                OnDelete::SetNull => {
                    if let Some(rows) = tables.get_mut(dependent.name) {
                        for r in rows.iter_mut().filter(|r| matches(r)) {
                            r.insert(relation.field.to_string(), Value::Null);
                        }
                    }
                }
            }
        }
        removed
    }
}

fn now() -> Value {
    serde_json::to_value(Utc::now()).unwrap_or(Value::Null)
}

fn row_id(r: &Row) -> Option<&str> {
    r.get("id").and_then(Value::as_str)
}

/// Unique and foreign-key checks for a row about to be written. `own_id` excludes the row itself.
fn check_constraints(
    tables: &Tables,
    resource: &ResourceDescriptor,
    row: &Row,
    own_id: Option<&str>,
) -> Result<(), AppError> {
    let rows = tables.get(resource.name).map(Vec::as_slice).unwrap_or(&[]);
    for field in resource.fields.iter().filter(|f| f.unique) {
        let Some(v) = row.get(field.name).filter(|v| !v.is_null()) else {
            continue;
        };
        let taken = rows
            .iter()
            .filter(|r| row_id(r) != own_id)
            .any(|r| r.get(field.name) == Some(v));
        if taken {
            return Err(AppError::Conflict(format!("{} already exists", field.name)));
        }
    }
    for rel in resource.relations {
        let Some(target_id) = row.get(rel.field).and_then(Value::as_str) else {
            continue;
        };
        let exists = tables
            .get(rel.target)
            .is_some_and(|rows| rows.iter().any(|r| row_id(r) == Some(target_id)));
        if !exists {
            return Err(AppError::Validation(format!(
                "{} references a missing {} record",
                rel.field, rel.target
            )));
        }
    }
    Ok(())
}

/// Keep only declared writable fields, in declaration order.
fn writable_row(resource: &ResourceDescriptor, mut input: Row) -> Row {
    resource
        .writable_fields()
        .map(|f| (f.name.to_string(), input.remove(f.name).unwrap_or(Value::Null)))
        .collect()
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        self.read_rows("", |_| ())
    }

    async fn list(&self, resource: &ResourceDescriptor, query: &ListQuery) -> Result<Vec<Row>, AppError> {
        self.read_rows(resource.name, |rows| {
            rows.iter()
                .filter(|r| {
                    query
                        .filters
                        .iter()
                        .all(|(k, v)| r.get(k).unwrap_or(&Value::Null) == v)
                })
                .skip(query.offset.unwrap_or(0) as usize)
                .take(query.limit.map(|n| n as usize).unwrap_or(usize::MAX))
                .cloned()
                .collect()
        })
    }

    async fn fetch(&self, resource: &ResourceDescriptor, id: Uuid) -> Result<Option<Row>, AppError> {
        let id = id.to_string();
        self.read_rows(resource.name, |rows| {
            rows.iter().find(|r| row_id(r) == Some(id.as_str())).cloned()
        })
    }

    async fn insert(&self, resource: &ResourceDescriptor, row: Row) -> Result<Row, AppError> {
        let mut tables = self.write()?;
        let fields = writable_row(resource, row);
        check_constraints(&tables, resource, &fields, None)?;
        let ts = now();
        let mut stored = Row::new();
        for f in resource.fields {
            let v = match f.name {
                "id" => Value::String(Uuid::new_v4().to_string()),
                "created_at" | "updated_at" => ts.clone(),
                name => fields.get(name).cloned().unwrap_or(Value::Null),
            };
            stored.insert(f.name.to_string(), v);
        }
        tables
            .entry(resource.name.to_string())
            .or_default()
            .push(stored.clone());
        tracing::debug!(resource = resource.name, "memory insert");
        Ok(stored)
    }

    async fn update(&self, resource: &ResourceDescriptor, id: Uuid, row: Row) -> Result<Option<Row>, AppError> {
        let id = id.to_string();
        let mut tables = self.write()?;
        let fields = writable_row(resource, row);
        let exists = tables
            .get(resource.name)
            .is_some_and(|rows| rows.iter().any(|r| row_id(r) == Some(id.as_str())));
        if !exists {
            return Ok(None);
        }
        check_constraints(&tables, resource, &fields, Some(&id))?;
        let Some(existing) = tables
            .get_mut(resource.name)
            .and_then(|rows| rows.iter_mut().find(|r| row_id(r) == Some(id.as_str())))
        else {
            return Ok(None);
        };
        for (k, v) in fields {
            existing.insert(k, v);
        }
        existing.insert("updated_at".to_string(), now());
        tracing::debug!(resource = resource.name, id = %id, "memory update");
        Ok(Some(existing.clone()))
    }

    async fn delete(&self, resource: &ResourceDescriptor, id: Uuid) -> Result<u64, AppError> {
        let mut tables = self.write()?;
        let removed = self.delete_locked(&mut tables, resource.name, &id.to_string());
        tracing::debug!(resource = resource.name, id = %id, removed, "memory delete");
        Ok(removed)
    }
}
