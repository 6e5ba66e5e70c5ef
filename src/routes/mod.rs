//! Route composition: common, auth and per-resource routes under `/api/v1`.

pub mod auth;
pub mod common;
pub mod resource;

pub use auth::auth_routes;
pub use common::common_routes;
pub use resource::{resource_routes, Access, Policy};

use crate::auth::Role;
use crate::error::AppError;
use crate::model::entities::{Ban, Channel, Friend, Member, Message, Reaction, Server, ServerRole, User};
use crate::state::AppState;
use axum::{http::Uri, Router};
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Access table for every chat resource.
pub fn api_routes(state: &AppState) -> Router<AppState> {
    let users = Policy {
        create: Access::Public,
        ..Policy::OWNED
    };
    Router::new()
        .merge(auth_routes(state))
        .merge(resource_routes::<User>(state, users))
        .merge(resource_routes::<Server>(state, Policy::OWNED))
        .merge(resource_routes::<Channel>(state, Policy::AUTHENTICATED))
        .merge(resource_routes::<Message>(state, Policy::OWNED))
        .merge(resource_routes::<Friend>(state, Policy::OWNED))
        .merge(resource_routes::<ServerRole>(
            state,
            Policy {
                list: Access::Authenticated,
                get: Access::Authenticated,
                ..Policy::role(Role::Admin)
            },
        ))
        .merge(resource_routes::<Ban>(state, Policy::role(Role::Moderator)))
        .merge(resource_routes::<Reaction>(state, Policy::OWNED))
        .merge(resource_routes::<Member>(state, Policy::OWNED))
}

async fn fallback(uri: Uri) -> AppError {
    AppError::NotFound(format!("route {}", uri.path()))
}

/// The full application router.
pub fn app(state: AppState) -> Router {
    let body_limit = state.settings.max_body_bytes;
    Router::new()
        .merge(common_routes())
        .nest("/api/v1", api_routes(&state))
        .fallback(fallback)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(body_limit)),
        )
        .with_state(state)
}
