use crate::model::{FieldSpec, Relation, Resource, ResourceDescriptor};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub static BANS: ResourceDescriptor = ResourceDescriptor {
    name: "bans",
    fields: &[
        FieldSpec::id(),
        FieldSpec::uuid("server_id").required(),
        FieldSpec::uuid("user_id").required(),
        FieldSpec::text("reason").max_length(512),
        FieldSpec::uuid("banned_by"),
        FieldSpec::created_at(),
        FieldSpec::updated_at(),
    ],
    relations: &[
        Relation::cascade("server_id", "servers"),
        Relation::cascade("user_id", "users"),
        Relation::set_null("banned_by", "users"),
    ],
    owner: None,
    sensitive: &[],
    protected: &[],
    author: Some("banned_by"),
};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ban {
    pub id: Uuid,
    pub server_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub reason: Option<String>,
    pub banned_by: Option<Uuid>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Resource for Ban {
    fn descriptor() -> &'static ResourceDescriptor {
        &BANS
    }

    fn id(&self) -> Uuid {
        self.id
    }
}
