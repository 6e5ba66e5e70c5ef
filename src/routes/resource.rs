//! Per-resource CRUD routes, each method wrapped in the gates its access policy names.

use crate::auth::Role;
use crate::gates::{self, FieldFilter, OwnershipGate};
use crate::handlers::resource::{create, delete, get, list, update};
use crate::model::Resource;
use crate::state::AppState;
use axum::{middleware::from_fn_with_state, routing, routing::MethodRouter, Router};

/// Who may call one method of a resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Public,
    /// Any valid token, whatever its role.
    Authenticated,
    /// Authenticated with this role (admins always pass).
    Role(Role),
    /// Any valid token; on `/:id` routes also the owner of the row (or admin).
    Owner,
}

#[derive(Clone, Copy, Debug)]
pub struct Policy {
    pub list: Access,
    pub get: Access,
    pub create: Access,
    pub update: Access,
    pub delete: Access,
}

impl Policy {
    /// Reads for any account, writes for owners.
    pub const OWNED: Policy = Policy {
        list: Access::Authenticated,
        get: Access::Authenticated,
        create: Access::Owner,
        update: Access::Owner,
        delete: Access::Owner,
    };

    /// Any account for every method.
    pub const AUTHENTICATED: Policy = Policy {
        list: Access::Authenticated,
        get: Access::Authenticated,
        create: Access::Authenticated,
        update: Access::Authenticated,
        delete: Access::Authenticated,
    };

    /// Same role for every method.
    pub const fn role(role: Role) -> Policy {
        Policy {
            list: Access::Role(role),
            get: Access::Role(role),
            create: Access::Role(role),
            update: Access::Role(role),
            delete: Access::Role(role),
        }
    }
}

/// Which gates a method carries besides access.
struct Guard<'a> {
    access: Access,
    /// Row addressed by `:id`, enabling the ownership gate.
    by_id: bool,
    filtered: &'a [&'static str],
}

impl<'a> Guard<'a> {
    fn new(access: Access, by_id: bool, filtered: &'a [&'static str]) -> Self {
        Guard {
            access,
            by_id,
            filtered,
        }
    }
}

fn guarded<R: Resource>(route: MethodRouter<AppState>, guard: Guard<'_>, state: &AppState) -> MethodRouter<AppState> {
    let mut route = route;
    // route_layer wraps outward: the last layer added runs first.
    if !guard.filtered.is_empty() {
        let filter = FieldFilter::new(guard.filtered.to_vec(), state.settings.max_body_bytes);
        route = route.route_layer(from_fn_with_state(filter, gates::field_filter));
    }
    match guard.access {
        Access::Public => return route,
        Access::Authenticated => {}
        Access::Role(role) => {
            route = route.route_layer(from_fn_with_state(role, gates::require_role));
        }
        Access::Owner => {
            if guard.by_id {
                let gate = OwnershipGate {
                    store: state.store.clone(),
                    descriptor: R::descriptor(),
                };
                route = route.route_layer(from_fn_with_state(gate, gates::ownership));
            }
        }
    }
    route.route_layer(from_fn_with_state(state.tokens.clone(), gates::authenticate))
}

/// GET/POST `/{name}` and GET/PUT/DELETE `/{name}/:id` for `R`.
pub fn resource_routes<R: Resource>(state: &AppState, policy: Policy) -> Router<AppState> {
    let d = R::descriptor();
    let on_create = d.filtered_on_create();
    let on_update = d.filtered_on_update();

    let collection = guarded::<R>(routing::get(list::<R>), Guard::new(policy.list, false, &[]), state)
        .merge(guarded::<R>(
            routing::post(create::<R>),
            Guard::new(policy.create, false, &on_create),
            state,
        ));
    let item = guarded::<R>(routing::get(get::<R>), Guard::new(policy.get, true, &[]), state)
        .merge(guarded::<R>(
            routing::put(update::<R>),
            Guard::new(policy.update, true, &on_update),
            state,
        ))
        .merge(guarded::<R>(
            routing::delete(delete::<R>),
            Guard::new(policy.delete, true, &[]),
            state,
        ));

    Router::new()
        .route(&format!("/{}", d.name), collection)
        .route(&format!("/{}/:id", d.name), item)
}
