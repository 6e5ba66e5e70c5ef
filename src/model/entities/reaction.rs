use crate::model::{FieldSpec, Ownership, Relation, Resource, ResourceDescriptor};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub static REACTIONS: ResourceDescriptor = ResourceDescriptor {
    name: "reactions",
    fields: &[
        FieldSpec::id(),
        FieldSpec::uuid("message_id").required(),
        FieldSpec::uuid("user_id").required(),
        FieldSpec::text("emoji").required().max_length(32),
        FieldSpec::created_at(),
        FieldSpec::updated_at(),
    ],
    relations: &[
        Relation::cascade("message_id", "messages"),
        Relation::cascade("user_id", "users"),
    ],
    owner: Some(Ownership::Columns(&["user_id"])),
    sensitive: &[],
    protected: &[],
    author: None,
};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reaction {
    pub id: Uuid,
    pub message_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub emoji: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Resource for Reaction {
    fn descriptor() -> &'static ResourceDescriptor {
        &REACTIONS
    }

    fn id(&self) -> Uuid {
        self.id
    }
}
