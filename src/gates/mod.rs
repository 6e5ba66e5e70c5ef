//! Authorization gate chain: authenticate, role, ownership and field-filter middlewares.
//! Each gate either passes the request on or rejects it with the JSON error envelope.

mod authenticate;
mod field_filter;
mod ownership;
mod role;

pub use authenticate::{authenticate, bearer_token};
pub use field_filter::{field_filter, FieldFilter};
pub use ownership::{ownership, OwnershipGate};
pub use role::require_role;

use crate::auth::Claims;
use crate::error::AppError;
use axum::extract::Request;

/// Claims left by `authenticate`; gates that run without it reject with 401.
fn claims_of(req: &Request) -> Result<&Claims, AppError> {
    req.extensions()
        .get::<Claims>()
        .ok_or_else(|| AppError::Auth("authentication required".into()))
}
