use crate::model::{FieldSpec, Ownership, Relation, Resource, ResourceDescriptor};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub static SERVERS: ResourceDescriptor = ResourceDescriptor {
    name: "servers",
    fields: &[
        FieldSpec::id(),
        FieldSpec::text("name").required().max_length(100),
        FieldSpec::text("description").max_length(1024),
        FieldSpec::text("icon_url").max_length(2048),
        FieldSpec::uuid("owner_id").required(),
        FieldSpec::created_at(),
        FieldSpec::updated_at(),
    ],
    relations: &[Relation::cascade("owner_id", "users")],
    owner: Some(Ownership::Columns(&["owner_id"])),
    sensitive: &[],
    protected: &[],
    author: None,
};

/// A community ("guild") that groups channels, roles and members.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Server {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub icon_url: Option<String>,
    pub owner_id: Option<Uuid>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Resource for Server {
    fn descriptor() -> &'static ResourceDescriptor {
        &SERVERS
    }

    fn id(&self) -> Uuid {
        self.id
    }
}
