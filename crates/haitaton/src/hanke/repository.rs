use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::contact::{ContactDetails, ContactEntry, ContactId, ContactRole};
use super::domain::{
    Actor, Hanke, HankeFields, HankeId, HankeStateFlags, HankeTunnus, SaveType,
};

/// Stored contact row. Contacts reference their Hanke by id only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedContact {
    pub id: Option<ContactId>,
    pub hanke_id: HankeId,
    pub role: ContactRole,
    pub details: ContactDetails,
    pub created_by: Option<Actor>,
    pub created_at: Option<DateTime<Utc>>,
    pub modified_by: Option<Actor>,
    pub modified_at: Option<DateTime<Utc>>,
}

/// Scalar Hanke row: business fields, state flags, and audit columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HankeRecord {
    pub id: Option<HankeId>,
    pub tunnus: HankeTunnus,
    pub fields: HankeFields,
    pub state_flags: HankeStateFlags,
    pub version: u32,
    pub created_by: Actor,
    pub created_at: DateTime<Utc>,
    pub modified_by: Option<Actor>,
    pub modified_at: Option<DateTime<Utc>>,
}

/// Hanke row together with all of its contact rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedHanke {
    pub record: HankeRecord,
    pub contacts: Vec<PersistedContact>,
}

impl PersistedHanke {
    /// Splits the flat contact rows into role lists for the outward model.
    pub fn to_hanke(&self) -> Result<Hanke, StateInconsistency> {
        let id = self.record.id.ok_or_else(|| {
            StateInconsistency(format!("stored hanke {} has no id", self.record.tunnus))
        })?;

        let mut owners = Vec::new();
        let mut implementers = Vec::new();
        let mut assessors = Vec::new();

        for contact in &self.contacts {
            let contact_id = contact.id.ok_or_else(|| {
                StateInconsistency(format!(
                    "stored contact of hanke {} has no id",
                    self.record.tunnus
                ))
            })?;
            let entry = ContactEntry {
                id: contact_id,
                role: contact.role,
                details: contact.details.clone(),
                created_by: contact.created_by.clone(),
                created_at: contact.created_at,
                modified_by: contact.modified_by.clone(),
                modified_at: contact.modified_at,
            };
            match contact.role {
                ContactRole::Owner => owners.push(entry),
                ContactRole::Implementer => implementers.push(entry),
                ContactRole::Assessor => assessors.push(entry),
            }
        }

        Ok(Hanke {
            id,
            tunnus: self.record.tunnus.clone(),
            fields: self.record.fields.clone(),
            state_flags: self.record.state_flags,
            version: self.record.version,
            created_by: self.record.created_by.clone(),
            created_at: self.record.created_at,
            modified_by: self.record.modified_by.clone(),
            modified_at: self.record.modified_at,
            owners,
            implementers,
            assessors,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContact {
    pub role: ContactRole,
    pub details: ContactDetails,
    pub created_by: Actor,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactUpdate {
    pub id: ContactId,
    pub details: ContactDetails,
    pub modified_by: Actor,
    pub modified_at: DateTime<Utc>,
}

/// Single contact change produced by reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactMutation {
    Create(NewContact),
    Update(ContactUpdate),
    Delete(ContactId),
}

/// Everything one create/update call writes; repositories apply it as a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HankeChangeSet {
    pub record: HankeRecord,
    pub mutations: Vec<ContactMutation>,
}

/// Storage abstraction consumed by the Hanke service.
pub trait HankeRepository: Send + Sync {
    fn find_by_tunnus(&self, tunnus: &HankeTunnus)
        -> Result<Option<PersistedHanke>, RepositoryError>;
    /// Inserts (record without id) or updates the Hanke and applies every
    /// contact mutation atomically, assigning ids to created rows.
    fn save(&self, changes: HankeChangeSet) -> Result<PersistedHanke, RepositoryError>;
    fn save_state_flags(
        &self,
        tunnus: &HankeTunnus,
        flags: HankeStateFlags,
    ) -> Result<(), RepositoryError>;
    fn find_all(&self) -> Result<Vec<PersistedHanke>, RepositoryError>;
    /// Hanke rows starting before `end` and ending after `begin`.
    fn find_all_between(
        &self,
        begin: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PersistedHanke>, RepositoryError>;
    fn find_all_by_save_type(
        &self,
        save_type: SaveType,
    ) -> Result<Vec<PersistedHanke>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("hanke {0} already exists")]
    Conflict(HankeTunnus),
    #[error("hanke {0} not found")]
    NotFound(HankeTunnus),
    #[error("contact {0} not found")]
    ContactNotFound(ContactId),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Stored data violates an invariant the store itself should guarantee.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("inconsistent hanke state: {0}")]
pub struct StateInconsistency(pub String);
