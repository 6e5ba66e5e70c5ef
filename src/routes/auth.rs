//! Authentication routes.

use crate::gates;
use crate::handlers::{login, me};
use crate::state::AppState;
use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

/// POST /auth/login (public), GET /auth/me (authenticated).
pub fn auth_routes(state: &AppState) -> Router<AppState> {
    Router::new().route("/auth/login", post(login)).route(
        "/auth/me",
        get(me).route_layer(from_fn_with_state(state.tokens.clone(), gates::authenticate)),
    )
}
