use crate::model::{FieldSpec, Relation, Resource, ResourceDescriptor};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub static ROLES: ResourceDescriptor = ResourceDescriptor {
    name: "roles",
    fields: &[
        FieldSpec::id(),
        FieldSpec::uuid("server_id").required(),
        FieldSpec::text("name").required().max_length(64),
        FieldSpec::text("color").max_length(7),
        FieldSpec::bigint("permissions").not_null(),
        FieldSpec::integer("position").not_null(),
        FieldSpec::created_at(),
        FieldSpec::updated_at(),
    ],
    relations: &[Relation::cascade("server_id", "servers")],
    owner: None,
    sensitive: &[],
    protected: &[],
    author: None,
};

/// A named permission set inside a server. Unrelated to the account `auth::Role`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerRole {
    pub id: Uuid,
    pub server_id: Option<Uuid>,
    pub name: String,
    /// Hex colour, e.g. `#5865f2`.
    pub color: Option<String>,
    /// Permission bit set.
    pub permissions: i64,
    pub position: i32,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Resource for ServerRole {
    fn descriptor() -> &'static ResourceDescriptor {
        &ROLES
    }

    fn id(&self) -> Uuid {
        self.id
    }
}
