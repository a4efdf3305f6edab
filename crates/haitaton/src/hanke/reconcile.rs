//! Merges an incoming Hanke payload into stored state.
//!
//! Reconciliation is two-phase: stored contacts are indexed by id, incoming
//! contacts consume matching entries, and whatever is left over becomes a
//! deletion. The result is a complete [`HankeChangeSet`]; nothing is written
//! here, so a failure leaves no partial mutation set behind.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::warn;

use super::contact::{ContactId, ContactInput, ContactRole};
use super::domain::{Actor, HankeFields, HankeInput, HankeStateFlags, HankeTunnus};
use super::repository::{
    ContactMutation, ContactUpdate, HankeChangeSet, HankeRecord, NewContact, PersistedContact,
    PersistedHanke, StateInconsistency,
};

#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    /// The id points at a contact of another Hanke or one deleted concurrently.
    #[error("contact {contact_id} not found in hanke {tunnus}")]
    ContactNotFound {
        tunnus: HankeTunnus,
        contact_id: ContactId,
    },
    #[error("hanke update is missing its tunnus")]
    MissingTunnus,
    #[error(transparent)]
    State(#[from] StateInconsistency),
}

/// Builds the change set for a brand new Hanke at version 0.
pub fn prepare_creation(
    incoming: &HankeInput,
    tunnus: HankeTunnus,
    actor: &Actor,
    now: DateTime<Utc>,
) -> Result<HankeChangeSet, ReconcileError> {
    let mut fields = HankeFields::default();
    fields.apply(incoming);

    let mut mutations = Vec::new();
    for role in ContactRole::ordered() {
        for contact in incoming.contacts(role) {
            if let Some(contact_id) = contact.id {
                return Err(ReconcileError::ContactNotFound {
                    tunnus,
                    contact_id,
                });
            }
            if let Some(created) = plan_creation(contact, role, &tunnus, actor, now) {
                mutations.push(created);
            }
        }
    }

    let record = HankeRecord {
        id: None,
        tunnus,
        fields,
        state_flags: HankeStateFlags::default(),
        version: 0,
        created_by: actor.clone(),
        created_at: now,
        modified_by: None,
        modified_at: None,
    };

    Ok(HankeChangeSet { record, mutations })
}

/// Merges `incoming` into `existing`, bumping the version by one and stamping
/// the modification audit fields.
pub fn reconcile(
    incoming: &HankeInput,
    existing: &PersistedHanke,
    actor: &Actor,
    now: DateTime<Utc>,
) -> Result<HankeChangeSet, ReconcileError> {
    let tunnus = incoming.tunnus.as_ref().ok_or(ReconcileError::MissingTunnus)?;
    if *tunnus != existing.record.tunnus {
        return Err(StateInconsistency(format!(
            "update for {} applied to stored hanke {}",
            tunnus, existing.record.tunnus
        ))
        .into());
    }
    if existing.record.id.is_none() {
        return Err(StateInconsistency(format!("hanke {tunnus} updated before creation")).into());
    }

    let mut candidates = index_existing(existing)?;
    let mut mutations = Vec::new();

    for role in ContactRole::ordered() {
        for contact in incoming.contacts(role) {
            let planned = match contact.id {
                None => plan_creation(contact, role, tunnus, actor, now),
                Some(contact_id) => plan_update(
                    contact_id,
                    contact,
                    role,
                    tunnus,
                    &mut candidates,
                    actor,
                    now,
                )?,
            };
            mutations.extend(planned);
        }
    }

    mutations.extend(candidates.into_keys().map(ContactMutation::Delete));

    let mut record = existing.record.clone();
    record.fields.apply(incoming);
    record.version = record.version.checked_add(1).ok_or_else(|| {
        StateInconsistency(format!("hanke {tunnus} version counter exhausted"))
    })?;
    record.modified_by = Some(actor.clone());
    record.modified_at = Some(now);

    Ok(HankeChangeSet { record, mutations })
}

fn index_existing(
    existing: &PersistedHanke,
) -> Result<BTreeMap<ContactId, &PersistedContact>, StateInconsistency> {
    existing
        .contacts
        .iter()
        .map(|contact| {
            contact.id.map(|id| (id, contact)).ok_or_else(|| {
                StateInconsistency(format!(
                    "stored contact of hanke {} has no id",
                    existing.record.tunnus
                ))
            })
        })
        .collect()
}

fn plan_creation(
    contact: &ContactInput,
    role: ContactRole,
    tunnus: &HankeTunnus,
    actor: &Actor,
    now: DateTime<Utc>,
) -> Option<ContactMutation> {
    if !contact.details.has_mandatory_fields() {
        warn!(
            %tunnus,
            role = role.label(),
            "skipping new contact with blank mandatory fields"
        );
        return None;
    }

    Some(ContactMutation::Create(NewContact {
        role,
        details: contact.details.clone(),
        created_by: actor.clone(),
        created_at: now,
    }))
}

fn plan_update(
    contact_id: ContactId,
    contact: &ContactInput,
    role: ContactRole,
    tunnus: &HankeTunnus,
    candidates: &mut BTreeMap<ContactId, &PersistedContact>,
    actor: &Actor,
    now: DateTime<Utc>,
) -> Result<Option<ContactMutation>, ReconcileError> {
    let stored = match candidates.get(&contact_id) {
        Some(stored) if stored.role == role => *stored,
        _ => {
            return Err(ReconcileError::ContactNotFound {
                tunnus: tunnus.clone(),
                contact_id,
            })
        }
    };

    if !contact.details.has_mandatory_fields() {
        // Left in the candidate map, so the stored contact is deleted.
        if contact.details.is_any_field_set() {
            warn!(
                %tunnus,
                %contact_id,
                role = role.label(),
                "contact update has blank mandatory fields, deleting contact"
            );
        }
        return Ok(None);
    }

    candidates.remove(&contact_id);

    let mut details = stored.details.clone();
    contact.details.overwrite(&mut details);
    if details == stored.details {
        return Ok(None);
    }

    Ok(Some(ContactMutation::Update(ContactUpdate {
        id: contact_id,
        details,
        modified_by: actor.clone(),
        modified_at: now,
    })))
}
