//! Account domain model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::result::Error;

/// Avatar reference given to accounts that never uploaded one
pub const PLACEHOLDER_AVATAR: &str = "/placeholder.svg";

/// Lower-case an email for lookup and storage.
///
/// Emails are the registry key and compare case-insensitively. Whitespace
/// is significant: a padded email is a different key.
pub fn normalize_email(email: &str) -> String {
    email.to_lowercase()
}

/// Closed set of account roles.
///
/// Serialized with the short names the persisted records have always used;
/// the descriptive names are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "student", alias = "regular-member")]
    Member,
    #[serde(rename = "club", alias = "organization")]
    Organization,
    #[serde(rename = "admin", alias = "administrator")]
    Administrator,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Member, Role::Organization, Role::Administrator];

    /// Wire name as stored in JSON
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "student",
            Role::Organization => "club",
            Role::Administrator => "admin",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Role::Member => "Student",
            Role::Organization => "Club/Society",
            Role::Administrator => "Administrator",
        }
    }

    /// What a signed-in account with this role may do in the feed and forums.
    ///
    /// These only decide which controls are shown. Nothing server-side
    /// enforces them.
    pub fn capabilities(&self) -> RoleCapabilities {
        let publisher = matches!(self, Role::Organization | Role::Administrator);
        RoleCapabilities {
            can_create_post: publisher,
            can_comment: publisher,
            can_react: true,
            can_ask_question: true,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "student" | "regular-member" | "member" => Ok(Role::Member),
            "club" | "organization" => Ok(Role::Organization),
            "admin" | "administrator" => Ok(Role::Administrator),
            other => Err(Error::validation(format!(
                "unknown role '{}' (expected student, club or admin)",
                other
            ))),
        }
    }
}

/// Role-based visibility of feed and forum controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoleCapabilities {
    pub can_create_post: bool,
    pub can_comment: bool,
    pub can_react: bool,
    pub can_ask_question: bool,
}

/// A persisted identity: credentials live beside it in the registry, never on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub username: String,
    /// Always stored lower-cased
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    /// Year of study; 0 for staff and organizations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
}

impl Account {
    /// Create a freshly registered account with the placeholder avatar
    pub fn new(
        id: impl Into<String>,
        username: impl Into<String>,
        email: &str,
        role: Role,
    ) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            email: normalize_email(email),
            role,
            avatar: Some(PLACEHOLDER_AVATAR.to_string()),
            bio: None,
            department: None,
            year: None,
        }
    }

    /// Avatar reference, falling back to the placeholder
    pub fn avatar_or_placeholder(&self) -> &str {
        self.avatar.as_deref().unwrap_or(PLACEHOLDER_AVATAR)
    }

    /// Merge a profile update, field by field.
    ///
    /// Absent fields keep their prior value.
    pub fn apply(&mut self, update: &ProfileUpdate) {
        if let Some(username) = &update.username {
            self.username = username.clone();
        }
        if let Some(bio) = &update.bio {
            self.bio = Some(bio.clone());
        }
        if let Some(department) = &update.department {
            self.department = Some(department.clone());
        }
        if let Some(year) = update.year {
            self.year = Some(year);
        }
        if let Some(avatar) = &update.avatar {
            self.avatar = Some(avatar.clone());
        }
    }
}

/// Partial profile edit.
///
/// Only the mutable profile fields exist here; id, email and role cannot be
/// changed after creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub year: Option<u32>,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl ProfileUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = Some(bio.into());
        self
    }

    pub fn department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn year(mut self, year: u32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
