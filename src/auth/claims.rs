//! Identity token payload and roles.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Account role carried in tokens and stored on users.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Moderator,
    Admin,
}

impl Role {
    pub const NAMES: &'static [&'static str] = &["user", "moderator", "admin"];

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Role gate rule: the exact role, or admin.
    pub fn satisfies(&self, required: Role) -> bool {
        *self == required || self.is_admin()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Moderator => "moderator",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded token claims. Validated once in `TokenService::verify`, then read-only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id.
    pub sub: Uuid,
    pub role: Role,
    /// Display name at issue time.
    pub name: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_satisfies_every_role() {
        for required in [Role::User, Role::Moderator, Role::Admin] {
            assert!(Role::Admin.satisfies(required));
        }
    }

    #[test]
    fn user_satisfies_only_user() {
        assert!(Role::User.satisfies(Role::User));
        assert!(!Role::User.satisfies(Role::Moderator));
        assert!(!Role::User.satisfies(Role::Admin));
        assert!(!Role::Moderator.satisfies(Role::User));
    }

    #[test]
    fn roles_serialize_lowercase() {
        assert_eq!(serde_json::to_value(Role::Moderator).unwrap(), "moderator");
        let r: Role = serde_json::from_value(serde_json::json!("admin")).unwrap();
        assert_eq!(r, Role::Admin);
        assert!(serde_json::from_value::<Role>(serde_json::json!("root")).is_err());
    }
}
