use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entities::accounts;

/// Closed set of operator roles. Only `Admin` may reach the management
/// surface; `User` exists for read-only operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            other => Err(format!("Unknown role: {other}")),
        }
    }
}

/// An operator account without its password hash.
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    pub id: i32,
    pub name: String,
    pub username: String,
    pub role: Role,
    pub created_at: String,
}

impl From<accounts::Model> for Account {
    fn from(model: accounts::Model) -> Self {
        // Stored roles come from the closed set; anything unexpected in the
        // column degrades to the non-privileged role.
        let role = model.role.parse().unwrap_or(Role::User);
        Self {
            id: model.id,
            name: model.name,
            username: model.username,
            role,
            created_at: model.created_at,
        }
    }
}

/// Fields accepted when creating or updating an account. On update a `None`
/// password means "keep the current hash".
#[derive(Debug, Clone, Deserialize)]
pub struct AccountInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub role: String,
}
