use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDate;

use super::contact::ContactId;
use super::domain::{HankeId, HankeStateFlags, HankeTunnus, SaveType};
use super::repository::{
    ContactMutation, HankeChangeSet, HankeRepository, PersistedContact, PersistedHanke,
    RepositoryError,
};

/// Process-local repository used by the service binary and the tests.
#[derive(Default, Clone)]
pub struct InMemoryHankeRepository {
    state: Arc<Mutex<StoreState>>,
}

#[derive(Default)]
struct StoreState {
    hankkeet: BTreeMap<HankeTunnus, PersistedHanke>,
    last_hanke_id: i64,
    last_contact_id: i64,
}

impl InMemoryHankeRepository {
    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, RepositoryError> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::Unavailable("hanke store lock poisoned".to_string()))
    }

    fn select<F>(&self, predicate: F) -> Result<Vec<PersistedHanke>, RepositoryError>
    where
        F: Fn(&PersistedHanke) -> bool,
    {
        let state = self.lock()?;
        Ok(state
            .hankkeet
            .values()
            .filter(|hanke| predicate(hanke))
            .cloned()
            .collect())
    }
}

impl HankeRepository for InMemoryHankeRepository {
    fn find_by_tunnus(
        &self,
        tunnus: &HankeTunnus,
    ) -> Result<Option<PersistedHanke>, RepositoryError> {
        let state = self.lock()?;
        Ok(state.hankkeet.get(tunnus).cloned())
    }

    fn save(&self, changes: HankeChangeSet) -> Result<PersistedHanke, RepositoryError> {
        let mut state = self.lock()?;
        let HankeChangeSet {
            mut record,
            mutations,
        } = changes;

        let (hanke_id, mut contacts, last_hanke_id) = match record.id {
            None => {
                if state.hankkeet.contains_key(&record.tunnus) {
                    return Err(RepositoryError::Conflict(record.tunnus));
                }
                let next = state.last_hanke_id + 1;
                (HankeId(next), Vec::new(), next)
            }
            Some(id) => {
                let stored = state
                    .hankkeet
                    .get(&record.tunnus)
                    .ok_or_else(|| RepositoryError::NotFound(record.tunnus.clone()))?;
                (id, stored.contacts.clone(), state.last_hanke_id)
            }
        };

        let mut last_contact_id = state.last_contact_id;
        for mutation in mutations {
            apply_mutation(&mut contacts, mutation, hanke_id, &mut last_contact_id)?;
        }

        record.id = Some(hanke_id);
        let persisted = PersistedHanke { record, contacts };
        state.last_hanke_id = last_hanke_id;
        state.last_contact_id = last_contact_id;
        state
            .hankkeet
            .insert(persisted.record.tunnus.clone(), persisted.clone());
        Ok(persisted)
    }

    fn save_state_flags(
        &self,
        tunnus: &HankeTunnus,
        flags: HankeStateFlags,
    ) -> Result<(), RepositoryError> {
        let mut state = self.lock()?;
        let stored = state
            .hankkeet
            .get_mut(tunnus)
            .ok_or_else(|| RepositoryError::NotFound(tunnus.clone()))?;
        stored.record.state_flags = flags;
        Ok(())
    }

    fn find_all(&self) -> Result<Vec<PersistedHanke>, RepositoryError> {
        self.select(|_| true)
    }

    fn find_all_between(
        &self,
        begin: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PersistedHanke>, RepositoryError> {
        self.select(|hanke| hanke.record.fields.overlaps(begin, end))
    }

    fn find_all_by_save_type(
        &self,
        save_type: SaveType,
    ) -> Result<Vec<PersistedHanke>, RepositoryError> {
        self.select(|hanke| hanke.record.fields.save_type == Some(save_type))
    }
}

fn apply_mutation(
    contacts: &mut Vec<PersistedContact>,
    mutation: ContactMutation,
    hanke_id: HankeId,
    last_contact_id: &mut i64,
) -> Result<(), RepositoryError> {
    match mutation {
        ContactMutation::Create(new) => {
            *last_contact_id += 1;
            contacts.push(PersistedContact {
                id: Some(ContactId(*last_contact_id)),
                hanke_id,
                role: new.role,
                details: new.details,
                created_by: Some(new.created_by),
                created_at: Some(new.created_at),
                modified_by: None,
                modified_at: None,
            });
        }
        ContactMutation::Update(update) => {
            let stored = contacts
                .iter_mut()
                .find(|contact| contact.id == Some(update.id))
                .ok_or(RepositoryError::ContactNotFound(update.id))?;
            stored.details = update.details;
            stored.modified_by = Some(update.modified_by);
            stored.modified_at = Some(update.modified_at);
        }
        ContactMutation::Delete(id) => {
            let index = contacts
                .iter()
                .position(|contact| contact.id == Some(id))
                .ok_or(RepositoryError::ContactNotFound(id))?;
            contacts.remove(index);
        }
    }
    Ok(())
}
