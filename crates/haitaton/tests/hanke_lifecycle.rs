use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};
use haitaton::hanke::{
    Actor, ContactDetails, ContactInput, ContactRole, HankeInput, HankeSearch, HankeService,
    HankeServiceError, InMemoryHankeRepository, Patch, ReconcileError, SaveType,
    SequenceTunnusGenerator,
};

type Service = HankeService<InMemoryHankeRepository, SequenceTunnusGenerator>;

fn service() -> Service {
    HankeService::new(
        Arc::new(InMemoryHankeRepository::default()),
        Arc::new(SequenceTunnusGenerator::new("HAI")),
    )
}

fn person(first: &str, last: &str) -> ContactDetails {
    ContactDetails {
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: format!("{}@example.fi", first.to_lowercase()),
        phone: "09 310 0000".to_string(),
        ..ContactDetails::default()
    }
}

fn new_contact(first: &str, last: &str) -> ContactInput {
    ContactInput {
        id: None,
        details: person(first, last),
    }
}

fn summer_works() -> HankeInput {
    HankeInput {
        name: Patch::Set("Mannerheimintien vesijohto".to_string()),
        start_date: Utc.with_ymd_and_hms(2025, 6, 2, 5, 0, 0).single().into(),
        end_date: Utc.with_ymd_and_hms(2025, 8, 15, 14, 0, 0).single().into(),
        save_type: Patch::Set(SaveType::Draft),
        owners: vec![new_contact("Aino", "Virta")],
        implementers: vec![new_contact("Mikko", "Koski"), new_contact("Leena", "Aalto")],
        ..HankeInput::default()
    }
}

fn day(year: i32, month: u32, date: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, date).expect("valid date")
}

#[test]
fn contacts_follow_the_submitted_lists_across_updates() {
    let service = service();
    let creator = Actor::new("suunnittelija");
    let editor = Actor::new("valvoja");

    let created = service.create(summer_works(), &creator).expect("create");
    assert_eq!(created.version, 0);
    assert_eq!(created.owners.len(), 1);
    assert_eq!(created.implementers.len(), 2);
    assert!(created.modified_by.is_none());

    let owner = created.owners[0].clone();
    let kept = created.implementers[0].clone();

    let mut update = HankeInput {
        tunnus: Some(created.tunnus.clone()),
        owners: vec![ContactInput {
            id: Some(owner.id),
            details: ContactDetails {
                phone: "040 123 4567".to_string(),
                ..owner.details.clone()
            },
        }],
        implementers: vec![ContactInput {
            id: Some(kept.id),
            details: kept.details.clone(),
        }],
        assessors: vec![new_contact("Sanna", "Laine")],
        ..HankeInput::default()
    };
    update.work_site_types = created.fields.work_site_types.clone();

    let updated = service.update(update, &editor).expect("update");
    assert_eq!(updated.version, 1);
    assert_eq!(updated.modified_by, Some(editor.clone()));
    assert_eq!(updated.fields.name, created.fields.name);
    assert_eq!(updated.fields.start_date, Some(day(2025, 6, 2)));

    assert_eq!(updated.owners.len(), 1);
    assert_eq!(updated.owners[0].id, owner.id);
    assert_eq!(updated.owners[0].details.phone, "040 123 4567");
    assert_eq!(updated.owners[0].modified_by, Some(editor.clone()));

    assert_eq!(updated.implementers.len(), 1);
    assert_eq!(updated.implementers[0].id, kept.id);
    assert!(updated.implementers[0].modified_by.is_none());

    assert_eq!(updated.assessors.len(), 1);
    assert_eq!(updated.assessors[0].role, ContactRole::Assessor);
    assert_eq!(updated.assessors[0].created_by, Some(editor));

    let reloaded = service
        .load(&updated.tunnus)
        .expect("load")
        .expect("hanke stored");
    assert_eq!(reloaded, updated);
}

#[test]
fn rejected_update_leaves_the_stored_hanke_untouched() {
    let service = service();
    let actor = Actor::new("suunnittelija");

    let first = service.create(summer_works(), &actor).expect("create first");
    let second = service.create(summer_works(), &actor).expect("create second");
    assert_ne!(first.tunnus, second.tunnus);

    let foreign = second.owners[0].id;
    let update = HankeInput {
        tunnus: Some(first.tunnus.clone()),
        name: Patch::Set("Uusi nimi".to_string()),
        owners: vec![ContactInput {
            id: Some(foreign),
            details: person("Aino", "Virta"),
        }],
        ..HankeInput::default()
    };

    let err = service.update(update, &actor).expect_err("foreign contact");
    assert!(matches!(
        err,
        HankeServiceError::Reconcile(ReconcileError::ContactNotFound { contact_id, .. })
            if contact_id == foreign
    ));

    let stored = service
        .load(&first.tunnus)
        .expect("load")
        .expect("hanke stored");
    assert_eq!(stored, first);
}

#[test]
fn listings_filter_by_save_type_and_period() {
    let service = service();
    let actor = Actor::new("suunnittelija");

    service.create(summer_works(), &actor).expect("create summer");
    let winter = HankeInput {
        name: Patch::Set("Talvikunnossapito".to_string()),
        start_date: Utc.with_ymd_and_hms(2025, 12, 1, 6, 0, 0).single().into(),
        end_date: Utc.with_ymd_and_hms(2026, 2, 27, 15, 0, 0).single().into(),
        save_type: Patch::Set(SaveType::Submit),
        ..HankeInput::default()
    };
    service.create(winter, &actor).expect("create winter");

    let all = service.load_all(None).expect("all");
    assert_eq!(all.len(), 2);

    let submitted = service
        .load_all(Some(&HankeSearch {
            save_type: Some(SaveType::Submit),
            ..HankeSearch::default()
        }))
        .expect("by save type");
    assert_eq!(submitted.len(), 1);
    assert_eq!(
        submitted[0].fields.name.as_deref(),
        Some("Talvikunnossapito")
    );

    let july = service
        .load_all(Some(&HankeSearch {
            period_begin: Some(day(2025, 7, 1)),
            period_end: Some(day(2025, 7, 31)),
            ..HankeSearch::default()
        }))
        .expect("by period");
    assert_eq!(july.len(), 1);
    assert_eq!(
        july[0].fields.name.as_deref(),
        Some("Mannerheimintien vesijohto")
    );

    let reversed = service.load_all(Some(&HankeSearch {
        period_begin: Some(day(2025, 7, 31)),
        period_end: Some(day(2025, 7, 1)),
        ..HankeSearch::default()
    }));
    assert!(matches!(reversed, Err(HankeServiceError::InvalidSearch(_))));
}
