//! Generic resource handlers: list, get, create, update, delete.

use crate::error::AppError;
use crate::extractors::{CurrentUser, JsonBody};
use crate::model::{to_row, Resource};
use crate::notify;
use crate::response::{success_many, success_one, success_one_ok};
use crate::state::AppState;
use crate::store::ListQuery;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

pub(crate) fn parse_id(id_str: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id_str).map_err(|_| AppError::Validation("invalid uuid".into()))
}

/// Outgoing representation: sensitive fields removed.
pub fn present<R: Resource>(item: &R) -> Result<Value, AppError> {
    let mut row = to_row(item)?;
    for f in R::descriptor().sensitive {
        row.remove(*f);
    }
    Ok(Value::Object(row))
}

/// GET /{resource}?field=value&limit=&offset=
pub async fn list<R: Resource>(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let query = ListQuery::from_params(R::descriptor(), &params);
    let items = state.controller::<R>().list_where(&query).await?;
    let data = items.iter().map(present).collect::<Result<Vec<_>, _>>()?;
    Ok(success_many(data))
}

pub async fn get<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let item = state.controller::<R>().get(parse_id(&id)?).await?;
    Ok(success_one_ok(present(&item)?))
}

/// POST /{resource}. An authenticated caller is stamped into the resource's owner column.
pub async fn create<R: Resource>(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
    JsonBody(mut body): JsonBody,
) -> Result<impl IntoResponse, AppError> {
    if let (Some(column), Some(CurrentUser(claims)), Value::Object(map)) =
        (R::descriptor().stamp_column(), user, &mut body)
    {
        map.insert(column.to_string(), Value::String(claims.sub.to_string()));
    }
    let item = state.controller::<R>().create(body).await?;
    if let Some(n) = item.notification() {
        notify::dispatch(state.notifier.clone(), n);
    }
    tracing::info!(resource = R::descriptor().name, id = %item.id(), "resource created");
    Ok(success_one(present(&item)?))
}

pub async fn update<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, AppError> {
    let item = state.controller::<R>().update(parse_id(&id)?, body).await?;
    Ok(success_one_ok(present(&item)?))
}

pub async fn delete<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    state.controller::<R>().delete(id).await?;
    tracing::info!(resource = R::descriptor().name, %id, "resource deleted");
    Ok(StatusCode::NO_CONTENT)
}
