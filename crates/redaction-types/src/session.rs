//! Signed-in user context
//!
//! Built once where the application is composed and handed to whatever needs
//! to know who is acting. Nothing reads the session from ambient storage.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Owner,
    Editor,
    Viewer,
}

impl Role {
    /// Parse a role name as stored by the backend. Unknown roles get the
    /// least privilege.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" | "administrator" | "superadmin" => Role::Admin,
            "owner" => Role::Owner,
            "editor" | "collaborator" => Role::Editor,
            _ => Role::Viewer,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Owner => "Owner",
            Role::Editor => "Editor",
            Role::Viewer => "Viewer",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    user_id: String,
    role: Role,
    #[serde(default, skip_serializing)]
    api_token: Option<String>,
}

impl SessionContext {
    pub fn new(user_id: impl Into<String>, role: Role, api_token: Option<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role,
            api_token,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn api_token(&self) -> Option<&str> {
        self.api_token.as_deref()
    }

    /// Creating and deleting restrictions is reserved to admins and the
    /// document owner.
    pub fn can_manage_restrictions(&self) -> bool {
        matches!(self.role, Role::Admin | Role::Owner)
    }
}
