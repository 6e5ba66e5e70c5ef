//! Generic CRUD over any typed resource, backed by an explicit store.

use crate::error::AppError;
use crate::model::{from_body, from_row, to_row, RequestValidator, Resource, SaveContext, GENERATED_FIELDS};
use crate::store::{ListQuery, Row, Store};
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;
use uuid::Uuid;

pub struct ResourceController<R: Resource> {
    store: Arc<dyn Store>,
    ctx: SaveContext,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> Clone for ResourceController<R> {
    fn clone(&self) -> Self {
        ResourceController {
            store: self.store.clone(),
            ctx: self.ctx,
            _resource: PhantomData,
        }
    }
}

fn not_found<R: Resource>(id: Uuid) -> AppError {
    AppError::NotFound(format!("{} {}", R::descriptor().name, id))
}

/// Row without storage-generated fields.
fn strip_generated(mut row: Row) -> Row {
    for f in GENERATED_FIELDS {
        row.remove(*f);
    }
    row
}

fn body_object(body: Value) -> Result<Row, AppError> {
    match body {
        Value::Object(m) => Ok(m),
        _ => Err(AppError::Validation("request body must be a JSON object".into())),
    }
}

impl<R: Resource> ResourceController<R> {
    pub fn new(store: Arc<dyn Store>, ctx: SaveContext) -> Self {
        ResourceController {
            store,
            ctx,
            _resource: PhantomData,
        }
    }

    /// All rows in storage order.
    pub async fn list(&self) -> Result<Vec<R>, AppError> {
        self.list_where(&ListQuery::default()).await
    }

    pub async fn list_where(&self, query: &ListQuery) -> Result<Vec<R>, AppError> {
        let rows = self.store.list(R::descriptor(), query).await?;
        rows.into_iter().map(from_row).collect()
    }

    /// First row whose `field` equals `value`.
    pub async fn find_by(&self, field: &str, value: Value) -> Result<Option<R>, AppError> {
        if !R::descriptor().has_field(field) {
            return Err(AppError::Validation(format!(
                "{} has no field {}",
                R::descriptor().name,
                field
            )));
        }
        let query = ListQuery::default().filter(field, value).limit(1);
        let mut rows = self.store.list(R::descriptor(), &query).await?;
        match rows.pop() {
            Some(row) => from_row(row).map(Some),
            None => Ok(None),
        }
    }

    pub async fn get(&self, id: Uuid) -> Result<R, AppError> {
        match self.store.fetch(R::descriptor(), id).await? {
            Some(row) => from_row(row),
            None => Err(not_found::<R>(id)),
        }
    }

    /// Deserialize, validate, run the save hook, persist. Client-supplied ids and timestamps are ignored.
    pub async fn create(&self, body: Value) -> Result<R, AppError> {
        let input = strip_generated(body_object(body)?);
        let mut item: R = from_body(input)?;
        RequestValidator::validate(&to_row(&item)?, R::descriptor())?;
        item.before_save(None, &self.ctx)?;
        let stored = self
            .store
            .insert(R::descriptor(), strip_generated(to_row(&item)?))
            .await?;
        let created: R = from_row(stored)?;
        tracing::debug!(resource = R::descriptor().name, id = %created.id(), "created");
        Ok(created)
    }

    /// Merge declared, non-generated body fields over the stored row, then validate and persist.
    pub async fn update(&self, id: Uuid, body: Value) -> Result<R, AppError> {
        let patch = body_object(body)?;
        let existing = self.get(id).await?;
        let mut merged = to_row(&existing)?;
        let descriptor = R::descriptor();
        for (k, v) in patch {
            if descriptor.field(&k).is_some_and(|f| !f.is_generated()) {
                merged.insert(k, v);
            }
        }
        let mut item: R = from_body(merged)?;
        RequestValidator::validate(&to_row(&item)?, descriptor)?;
        item.before_save(Some(&existing), &self.ctx)?;
        let stored = self
            .store
            .update(descriptor, id, strip_generated(to_row(&item)?))
            .await?
            .ok_or_else(|| not_found::<R>(id))?;
        tracing::debug!(resource = descriptor.name, id = %id, "updated");
        from_row(stored)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let removed = self.store.delete(R::descriptor(), id).await?;
        if removed == 0 {
            return Err(not_found::<R>(id));
        }
        tracing::debug!(resource = R::descriptor().name, id = %id, "deleted");
        Ok(())
    }
}
