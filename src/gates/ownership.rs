use crate::auth::Claims;
use crate::error::AppError;
use crate::model::{Ownership, ResourceDescriptor};
use crate::store::Store;
use axum::{
    extract::{Path, Request, State},
    middleware::Next,
    response::Response,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// State for the ownership gate on `/{resource}/:id` routes.
#[derive(Clone)]
pub struct OwnershipGate {
    pub store: Arc<dyn Store>,
    pub descriptor: &'static ResourceDescriptor,
}

impl OwnershipGate {
    /// Whether `claims` owns row `id`. Missing rows are `NotFound`.
    pub async fn check(&self, claims: &Claims, id: Uuid) -> Result<bool, AppError> {
        match self.descriptor.owner {
            Some(Ownership::PathId) => Ok(id == claims.sub),
            Some(Ownership::Columns(cols)) => {
                let row = self
                    .store
                    .fetch(self.descriptor, id)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("{} {}", self.descriptor.name, id)))?;
                let sub = claims.sub.to_string();
                Ok(cols
                    .iter()
                    .any(|c| row.get(*c).and_then(Value::as_str) == Some(sub.as_str())))
            }
            None => Ok(false),
        }
    }
}

/// Pass when the caller owns the addressed row or is an admin.
pub async fn ownership(
    State(gate): State<OwnershipGate>,
    Path(params): Path<HashMap<String, String>>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = super::claims_of(&req)?.clone();
    if claims.is_admin() {
        return Ok(next.run(req).await);
    }
    let raw = params
        .get("id")
        .ok_or_else(|| AppError::Internal("ownership gate mounted without :id".into()))?;
    let id = Uuid::parse_str(raw).map_err(|_| AppError::Validation("invalid id".into()))?;
    if !gate.check(&claims, id).await? {
        tracing::debug!(sub = %claims.sub, resource = gate.descriptor.name, %id, "ownership gate rejected");
        return Err(AppError::Permission("not the owner of this resource".into()));
    }
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::model::entities::{FRIENDS, USERS};
    use crate::model::Registry;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn claims(sub: Uuid) -> Claims {
        Claims {
            sub,
            role: Role::User,
            name: String::new(),
            iat: 0,
            exp: i64::MAX,
        }
    }

    fn obj(v: Value) -> crate::store::Row {
        v.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn path_id_compares_subject() {
        let gate = OwnershipGate {
            store: Arc::new(MemoryStore::new(Registry::standard().unwrap())),
            descriptor: &USERS,
        };
        let me = Uuid::new_v4();
        assert!(gate.check(&claims(me), me).await.unwrap());
        assert!(!gate.check(&claims(me), Uuid::new_v4()).await.unwrap());
    }

    #[tokio::test]
    async fn either_column_owns_the_row() {
        let store = Arc::new(MemoryStore::new(Registry::standard().unwrap()));
        let mut ids = Vec::new();
        for email in ["a@b.com", "b@b.com", "c@b.com"] {
            let u = store
                .insert(&USERS, obj(json!({"email": email, "password": "h", "display_name": "", "role": "user"})))
                .await
                .unwrap();
            ids.push(Uuid::parse_str(u["id"].as_str().unwrap()).unwrap());
        }
        let pair = store
            .insert(
                &FRIENDS,
                obj(json!({"requester_id": ids[0], "addressee_id": ids[1], "status": "pending"})),
            )
            .await
            .unwrap();
        let pair_id = Uuid::parse_str(pair["id"].as_str().unwrap()).unwrap();
        let gate = OwnershipGate {
            store,
            descriptor: &FRIENDS,
        };
        assert!(gate.check(&claims(ids[0]), pair_id).await.unwrap());
        assert!(gate.check(&claims(ids[1]), pair_id).await.unwrap());
        assert!(!gate.check(&claims(ids[2]), pair_id).await.unwrap());
        assert!(matches!(
            gate.check(&claims(ids[0]), Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }
}
