use crate::error::AppError;
use crate::model::{FieldSpec, Ownership, Relation, Resource, ResourceDescriptor, SaveContext};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub static MESSAGES: ResourceDescriptor = ResourceDescriptor {
    name: "messages",
    fields: &[
        FieldSpec::id(),
        FieldSpec::uuid("channel_id").required(),
        FieldSpec::uuid("author_id").required(),
        FieldSpec::text("content").required().max_length(4000),
        FieldSpec::boolean("edited").not_null(),
        FieldSpec::created_at(),
        FieldSpec::updated_at(),
    ],
    relations: &[
        Relation::cascade("channel_id", "channels"),
        Relation::cascade("author_id", "users"),
    ],
    owner: Some(Ownership::Columns(&["author_id"])),
    sensitive: &[],
    protected: &["edited"],
    author: None,
};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Message {
    pub id: Uuid,
    pub channel_id: Option<Uuid>,
    pub author_id: Option<Uuid>,
    pub content: String,
    /// Set by the server once the content changes after creation.
    pub edited: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Resource for Message {
    fn descriptor() -> &'static ResourceDescriptor {
        &MESSAGES
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn before_save(&mut self, previous: Option<&Self>, _ctx: &SaveContext) -> Result<(), AppError> {
        self.edited = match previous {
            Some(p) => p.edited || p.content != self.content,
            None => false,
        };
        Ok(())
    }
}
