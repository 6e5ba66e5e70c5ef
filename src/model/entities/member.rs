use crate::model::{FieldSpec, Ownership, Relation, Resource, ResourceDescriptor};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub static MEMBERS: ResourceDescriptor = ResourceDescriptor {
    name: "members",
    fields: &[
        FieldSpec::id(),
        FieldSpec::uuid("server_id").required(),
        FieldSpec::uuid("user_id").required(),
        FieldSpec::text("nickname").max_length(64),
        FieldSpec::created_at(),
        FieldSpec::updated_at(),
    ],
    relations: &[
        Relation::cascade("server_id", "servers"),
        Relation::cascade("user_id", "users"),
    ],
    owner: Some(Ownership::Columns(&["user_id"])),
    sensitive: &[],
    protected: &[],
    author: None,
};

/// Server membership of a user.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Member {
    pub id: Uuid,
    pub server_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub nickname: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Resource for Member {
    fn descriptor() -> &'static ResourceDescriptor {
        &MEMBERS
    }

    fn id(&self) -> Uuid {
        self.id
    }
}
