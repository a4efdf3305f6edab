use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::hanke::contact::{ContactDetails, ContactId, ContactInput, ContactRole};
use crate::hanke::domain::{
    Actor, HankeFields, HankeId, HankeInput, HankeStateFlags, HankeTunnus, SaveType,
};
use crate::hanke::memory::InMemoryHankeRepository;
use crate::hanke::patch::Patch;
use crate::hanke::repository::{
    HankeChangeSet, HankeRecord, HankeRepository, PersistedContact, PersistedHanke,
    RepositoryError,
};
use crate::hanke::service::HankeService;
use crate::hanke::tunnus::SequenceTunnusGenerator;

pub(super) type MemoryService = HankeService<InMemoryHankeRepository, SequenceTunnusGenerator>;

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 14, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn actor() -> Actor {
    Actor::new("suunnittelija-7")
}

pub(super) fn tunnus() -> HankeTunnus {
    HankeTunnus("HAI24-11".to_string())
}

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn details(first: &str, last: &str, email: &str, phone: &str) -> ContactDetails {
    ContactDetails {
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        ..ContactDetails::default()
    }
}

pub(super) fn new_contact(first: &str, last: &str, email: &str, phone: &str) -> ContactInput {
    ContactInput {
        id: None,
        details: details(first, last, email, phone),
    }
}

pub(super) fn blank_contact(id: Option<i64>) -> ContactInput {
    ContactInput {
        id: id.map(ContactId),
        details: ContactDetails::default(),
    }
}

pub(super) fn stored_contact(id: i64, role: ContactRole, first: &str) -> PersistedContact {
    PersistedContact {
        id: Some(ContactId(id)),
        hanke_id: HankeId(1),
        role,
        details: details(first, "Nieminen", "yhteys@example.fi", "0501112233"),
        created_by: Some(Actor::new("creator")),
        created_at: Some(now()),
        modified_by: None,
        modified_at: None,
    }
}

pub(super) fn echo(contact: &PersistedContact) -> ContactInput {
    ContactInput {
        id: contact.id,
        details: contact.details.clone(),
    }
}

pub(super) fn persisted(contacts: Vec<PersistedContact>) -> PersistedHanke {
    PersistedHanke {
        record: HankeRecord {
            id: Some(HankeId(1)),
            tunnus: tunnus(),
            fields: HankeFields {
                name: Some("Kaivokatu".to_string()),
                save_type: Some(SaveType::Draft),
                ..HankeFields::default()
            },
            state_flags: HankeStateFlags::default(),
            version: 2,
            created_by: Actor::new("creator"),
            created_at: now(),
            modified_by: None,
            modified_at: None,
        },
        contacts,
    }
}

pub(super) fn update_for(tunnus: &HankeTunnus) -> HankeInput {
    HankeInput {
        tunnus: Some(tunnus.clone()),
        ..HankeInput::default()
    }
}

pub(super) fn draft(name: &str, start: NaiveDate, end: NaiveDate) -> HankeInput {
    HankeInput {
        name: Patch::Set(name.to_string()),
        start_date: Patch::Set(start.and_hms_opt(15, 45, 0).expect("valid").and_utc()),
        end_date: Patch::Set(end.and_hms_opt(8, 0, 0).expect("valid").and_utc()),
        save_type: Patch::Set(SaveType::Draft),
        ..HankeInput::default()
    }
}

pub(super) fn build_service() -> (MemoryService, Arc<InMemoryHankeRepository>) {
    let repository = Arc::new(InMemoryHankeRepository::default());
    let service = HankeService::new(
        repository.clone(),
        Arc::new(SequenceTunnusGenerator::default()),
    );
    (service, repository)
}

pub(super) struct UnavailableRepository;

impl HankeRepository for UnavailableRepository {
    fn find_by_tunnus(
        &self,
        _tunnus: &HankeTunnus,
    ) -> Result<Option<PersistedHanke>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn save(&self, _changes: HankeChangeSet) -> Result<PersistedHanke, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn save_state_flags(
        &self,
        _tunnus: &HankeTunnus,
        _flags: HankeStateFlags,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_all(&self) -> Result<Vec<PersistedHanke>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_all_between(
        &self,
        _begin: NaiveDate,
        _end: NaiveDate,
    ) -> Result<Vec<PersistedHanke>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_all_by_save_type(
        &self,
        _save_type: SaveType,
    ) -> Result<Vec<PersistedHanke>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Read-only store whose single Hanke has a contact row without an id.
pub(super) struct CorruptRepository;

impl CorruptRepository {
    fn stored() -> PersistedHanke {
        let mut contact = stored_contact(3, ContactRole::Owner, "Ilkka");
        contact.id = None;
        persisted(vec![contact])
    }
}

impl HankeRepository for CorruptRepository {
    fn find_by_tunnus(
        &self,
        _tunnus: &HankeTunnus,
    ) -> Result<Option<PersistedHanke>, RepositoryError> {
        Ok(Some(Self::stored()))
    }

    fn save(&self, _changes: HankeChangeSet) -> Result<PersistedHanke, RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn save_state_flags(
        &self,
        _tunnus: &HankeTunnus,
        _flags: HankeStateFlags,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn find_all(&self) -> Result<Vec<PersistedHanke>, RepositoryError> {
        Ok(vec![Self::stored()])
    }

    fn find_all_between(
        &self,
        _begin: NaiveDate,
        _end: NaiveDate,
    ) -> Result<Vec<PersistedHanke>, RepositoryError> {
        Ok(vec![Self::stored()])
    }

    fn find_all_by_save_type(
        &self,
        _save_type: SaveType,
    ) -> Result<Vec<PersistedHanke>, RepositoryError> {
        Ok(vec![Self::stored()])
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
