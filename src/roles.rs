use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    User,
}

/// Order in which roles are offered to the operator.
pub const ROLE_CHOICES: [Role; 2] = [Role::User, Role::Admin];

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::User => "User",
        }
    }

    /// Sub-permissions this role may carry. Never empty; the first entry is
    /// the one selected when the role changes.
    pub fn sub_permissions(&self) -> &'static [SubPermission] {
        match self {
            Role::Admin => &[SubPermission::Editor],
            Role::User => &[SubPermission::Viewer, SubPermission::Commentor],
        }
    }

    pub fn default_sub_permission(&self) -> SubPermission {
        self.sub_permissions()[0]
    }

    pub fn allows(&self, sub_permission: SubPermission) -> bool {
        self.sub_permissions().contains(&sub_permission)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            _ => Err(ParseRoleError::UnknownRole(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubPermission {
    Editor,
    Viewer,
    Commentor,
}

impl SubPermission {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubPermission::Editor => "Editor",
            SubPermission::Viewer => "Viewer",
            SubPermission::Commentor => "Commentor",
        }
    }
}

impl fmt::Display for SubPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SubPermission {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "editor" => Ok(SubPermission::Editor),
            "viewer" => Ok(SubPermission::Viewer),
            "commentor" => Ok(SubPermission::Commentor),
            _ => Err(ParseRoleError::UnknownSubPermission(s.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseRoleError {
    #[error("Invalid role: {0}")]
    UnknownRole(String),

    #[error("Invalid sub-permission: {0}")]
    UnknownSubPermission(String),
}
