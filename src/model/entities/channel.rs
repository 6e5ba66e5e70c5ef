use crate::model::{FieldSpec, Relation, Resource, ResourceDescriptor};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub static CHANNELS: ResourceDescriptor = ResourceDescriptor {
    name: "channels",
    fields: &[
        FieldSpec::id(),
        FieldSpec::uuid("server_id").required(),
        FieldSpec::text("name").required().max_length(100),
        FieldSpec::text("kind").not_null().one_of(&["text", "voice"]),
        FieldSpec::text("topic").max_length(1024),
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

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    #[default]
    Text,
    Voice,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Channel {
    pub id: Uuid,
    pub server_id: Option<Uuid>,
    pub name: String,
    pub kind: ChannelKind,
    pub topic: Option<String>,
    pub position: i32,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Resource for Channel {
    fn descriptor() -> &'static ResourceDescriptor {
        &CHANNELS
    }

    fn id(&self) -> Uuid {
        self.id
    }
}
