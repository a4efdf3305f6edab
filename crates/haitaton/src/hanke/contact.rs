use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::Actor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(pub i64);

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role list a contact belongs to. A contact never moves between roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactRole {
    Owner,
    Implementer,
    Assessor,
}

impl ContactRole {
    pub const fn ordered() -> [Self; 3] {
        [Self::Owner, Self::Assessor, Self::Implementer]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Implementer => "implementer",
            Self::Assessor => "assessor",
        }
    }
}

/// Person and organisation details shared by incoming and stored contacts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub organization_id: Option<i64>,
    pub organization_name: Option<String>,
    pub department: Option<String>,
}

impl ContactDetails {
    /// First name, last name, email, and phone are all non-blank.
    pub fn has_mandatory_fields(&self) -> bool {
        [&self.first_name, &self.last_name, &self.email, &self.phone]
            .iter()
            .all(|value| !value.trim().is_empty())
    }

    pub fn is_any_field_set(&self) -> bool {
        let text_set = [&self.first_name, &self.last_name, &self.email, &self.phone]
            .iter()
            .any(|value| !value.trim().is_empty());
        let optional_set = [&self.organization_name, &self.department]
            .iter()
            .any(|value| value.as_deref().is_some_and(|v| !v.trim().is_empty()));

        text_set || optional_set || self.organization_id.is_some()
    }

    /// Overwrites `target` with these details. Organisation name and department
    /// are only replaced when provided.
    pub(crate) fn overwrite(&self, target: &mut ContactDetails) {
        target.first_name = self.first_name.clone();
        target.last_name = self.last_name.clone();
        target.email = self.email.clone();
        target.phone = self.phone.clone();
        target.organization_id = self.organization_id;
        if let Some(name) = &self.organization_name {
            target.organization_name = Some(name.clone());
        }
        if let Some(department) = &self.department {
            target.department = Some(department.clone());
        }
    }
}

/// Contact as submitted by a client; a missing id marks a new contact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ContactId>,
    #[serde(flatten)]
    pub details: ContactDetails,
}

/// Contact as returned to clients, with its audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactEntry {
    pub id: ContactId,
    pub role: ContactRole,
    #[serde(flatten)]
    pub details: ContactDetails,
    pub created_by: Option<Actor>,
    pub created_at: Option<DateTime<Utc>>,
    pub modified_by: Option<Actor>,
    pub modified_at: Option<DateTime<Utc>>,
}
