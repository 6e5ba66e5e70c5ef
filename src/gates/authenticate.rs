use crate::auth::TokenService;
use crate::error::AppError;
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::Auth("missing authorization header".into()))?
        .to_str()
        .map_err(|_| AppError::Auth("malformed authorization header".into()))?;
    let (scheme, token) = value
        .split_once(' ')
        .ok_or_else(|| AppError::Auth("malformed authorization header".into()))?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(AppError::Auth("malformed authorization header".into()));
    }
    Ok(token)
}

/// Verify the bearer token and insert its `Claims` into request extensions.
pub async fn authenticate(
    State(tokens): State<Arc<TokenService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = tokens.verify(bearer_token(req.headers())?)?;
    tracing::debug!(sub = %claims.sub, role = %claims.role, "authenticated");
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(v: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(AUTHORIZATION, HeaderValue::from_str(v).unwrap());
        h
    }

    #[test]
    fn parses_bearer_scheme() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")).unwrap(), "abc.def");
        assert_eq!(bearer_token(&headers("bearer abc")).unwrap(), "abc");
    }

    #[test]
    fn rejects_missing_or_foreign_schemes() {
        assert!(matches!(bearer_token(&HeaderMap::new()), Err(AppError::Auth(_))));
        assert!(matches!(bearer_token(&headers("Basic dXNlcg==")), Err(AppError::Auth(_))));
        assert!(matches!(bearer_token(&headers("Bearer ")), Err(AppError::Auth(_))));
        assert!(matches!(bearer_token(&headers("abc")), Err(AppError::Auth(_))));
    }
}
