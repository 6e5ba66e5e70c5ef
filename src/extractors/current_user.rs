//! Claims placed in request extensions by the authenticate gate.

use crate::auth::Claims;
use crate::error::AppError;
use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

/// The authenticated caller. Rejects with 401 on routes without the authenticate gate;
/// use `Option<CurrentUser>` where authentication is optional.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| AppError::Auth("authentication required".into()))
    }
}
