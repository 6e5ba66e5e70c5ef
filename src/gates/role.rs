use crate::auth::Role;
use crate::error::AppError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

/// Pass when the caller holds `required` or is an admin.
pub async fn require_role(
    State(required): State<Role>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = super::claims_of(&req)?;
    if !claims.role.satisfies(required) {
        tracing::debug!(sub = %claims.sub, role = %claims.role, %required, "role gate rejected");
        return Err(AppError::Permission(format!("requires role {}", required)));
    }
    Ok(next.run(req).await)
}
