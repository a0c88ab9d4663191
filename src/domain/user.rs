use serde::{Deserialize, Serialize};

pub type UserId = i64;

/// Role granting access to the cross-user order operations.
pub const ADMIN_ROLE: &str = "ROLE_ADMIN";

/// A stored user account, resolved by username when an order is placed.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub roles: Vec<String>,
}

/// The caller of an operation, as asserted by the authentication layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
    pub roles: Vec<String>,
}

impl Principal {
    pub fn new(username: impl Into<String>, roles: Vec<String>) -> Self {
        Self {
            username: username.into(),
            roles,
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(ADMIN_ROLE)
    }
}
