use crate::error::AppError;
use crate::model::{FieldSpec, Ownership, Relation, Resource, ResourceDescriptor, SaveContext};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub static FRIENDS: ResourceDescriptor = ResourceDescriptor {
    name: "friends",
    fields: &[
        FieldSpec::id(),
        FieldSpec::uuid("requester_id").required(),
        FieldSpec::uuid("addressee_id").required(),
        FieldSpec::text("status").not_null().one_of(&["pending", "accepted", "blocked"]),
        FieldSpec::created_at(),
        FieldSpec::updated_at(),
    ],
    relations: &[
        Relation::cascade("requester_id", "users"),
        Relation::cascade("addressee_id", "users"),
    ],
    owner: Some(Ownership::Columns(&["requester_id", "addressee_id"])),
    sensitive: &[],
    protected: &[],
    author: None,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FriendStatus {
    #[default]
    Pending,
    Accepted,
    Blocked,
}

/// A friend request between two users; either side may update or remove it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Friend {
    pub id: Uuid,
    pub requester_id: Option<Uuid>,
    pub addressee_id: Option<Uuid>,
    pub status: FriendStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Resource for Friend {
    fn descriptor() -> &'static ResourceDescriptor {
        &FRIENDS
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn before_save(&mut self, previous: Option<&Self>, _ctx: &SaveContext) -> Result<(), AppError> {
        if previous.is_none() && self.requester_id.is_some() && self.requester_id == self.addressee_id {
            return Err(AppError::Validation("cannot send a friend request to yourself".into()));
        }
        Ok(())
    }
}
