use crate::auth::{password, Role};
use crate::error::AppError;
use crate::model::{FieldSpec, Ownership, Resource, ResourceDescriptor, SaveContext};
use crate::notify::Notification;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub static USERS: ResourceDescriptor = ResourceDescriptor {
    name: "users",
    fields: &[
        FieldSpec::id(),
        FieldSpec::text("email").required().unique().email().max_length(255),
        FieldSpec::text("password").required().min_length(6).max_length(72),
        FieldSpec::text("display_name").not_null().max_length(64),
        FieldSpec::text("avatar_url").max_length(2048),
        FieldSpec::text("role").not_null().one_of(Role::NAMES),
        FieldSpec::created_at(),
        FieldSpec::updated_at(),
    ],
    relations: &[],
    owner: Some(Ownership::PathId),
    sensitive: &["password"],
    protected: &["role"],
    author: None,
};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    /// bcrypt hash once stored.
    pub password: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub role: Role,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Name used in tokens and greetings; falls back to the email's local part.
    pub fn name(&self) -> &str {
        if self.display_name.is_empty() {
            self.email.split('@').next().unwrap_or(&self.email)
        } else {
            &self.display_name
        }
    }
}

impl Resource for User {
    fn descriptor() -> &'static ResourceDescriptor {
        &USERS
    }

    fn id(&self) -> Uuid {
        self.id
    }

    /// Hash the password unless it is the unchanged stored hash.
    fn before_save(&mut self, previous: Option<&Self>, ctx: &SaveContext) -> Result<(), AppError> {
        self.email = self.email.trim().to_lowercase();
        if previous.is_some_and(|p| p.password == self.password) {
            return Ok(());
        }
        self.password = password::hash(&self.password, ctx.password_cost)?;
        Ok(())
    }

    fn notification(&self) -> Option<Notification> {
        Some(Notification::Welcome {
            to: self.email.clone(),
            display_name: self.name().to_string(),
        })
    }
}
