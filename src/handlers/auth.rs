//! Login and current-user handlers.

use crate::auth::password;
use crate::error::AppError;
use crate::extractors::{CurrentUser, JsonBody};
use crate::handlers::present;
use crate::model::entities::User;
use crate::response::success_one_ok;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

fn invalid_credentials() -> AppError {
    AppError::Auth("invalid email or password".into())
}

/// POST /auth/login: `{email, password}` to `{data: {token, user}}`.
pub async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, AppError> {
    let req: LoginRequest =
        serde_json::from_value(body).map_err(|e| AppError::Validation(e.to_string()))?;
    let email = req.email.trim().to_lowercase();
    let Some(user) = state
        .controller::<User>()
        .find_by("email", Value::String(email))
        .await?
    else {
        password::verify_decoy(&req.password, state.settings.bcrypt_cost);
        return Err(invalid_credentials());
    };
    if !password::verify(&req.password, &user.password) {
        tracing::info!(user = %user.id, "login rejected");
        return Err(invalid_credentials());
    }
    let token = state.tokens.issue(user.id, user.role, user.name())?;
    tracing::info!(user = %user.id, role = %user.role, "login succeeded");
    Ok(success_one_ok(json!({
        "token": token,
        "user": present(&user)?,
    })))
}

/// GET /auth/me: the caller's user record.
pub async fn me(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let user = state.controller::<User>().get(claims.sub).await?;
    Ok(success_one_ok(present(&user)?))
}
