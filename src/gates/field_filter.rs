use crate::error::AppError;
use axum::{
    body::{to_bytes, Body, Bytes},
    extract::{Request, State},
    http::header::CONTENT_LENGTH,
    middleware::Next,
    response::Response,
};
use serde_json::Value;
use std::sync::Arc;

/// Names stripped from JSON object bodies before the handler runs.
#[derive(Clone, Debug)]
pub struct FieldFilter {
    fields: Arc<[&'static str]>,
    limit: usize,
}

impl FieldFilter {
    pub fn new(fields: Vec<&'static str>, limit: usize) -> Self {
        FieldFilter {
            fields: fields.into(),
            limit,
        }
    }

    /// Filtered body; anything that is not a JSON object passes through unchanged.
    pub fn apply(&self, bytes: Bytes) -> Bytes {
        let Ok(Value::Object(mut map)) = serde_json::from_slice::<Value>(&bytes) else {
            return bytes;
        };
        let removed: Vec<&str> = self
            .fields
            .iter()
            .copied()
            .filter(|f| map.remove(*f).is_some())
            .collect();
        if removed.is_empty() {
            return bytes;
        }
        tracing::debug!(?removed, "field filter stripped body fields");
        match serde_json::to_vec(&Value::Object(map)) {
            Ok(v) => Bytes::from(v),
            Err(_) => bytes,
        }
    }
}

pub async fn field_filter(
    State(filter): State<FieldFilter>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();
    let bytes = to_bytes(body, filter.limit)
        .await
        .map_err(|_| AppError::Validation("request body too large".into()))?;
    parts.headers.remove(CONTENT_LENGTH);
    let req = Request::from_parts(parts, Body::from(filter.apply(bytes)));
    Ok(next.run(req).await)
}
