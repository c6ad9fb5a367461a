use chrono::{DateTime, Duration, TimeZone, Utc};
use rusqlite::Connection;
use saios_core::db::migrations::target_version;
use saios_core::db::open_db_in_memory;
use saios_core::{
    Domain, EntryListQuery, EntryPatch, EntryRepository, EntryService, EntryValidationError,
    NewEntry, RepoError, SqliteEntryRepository,
};
use std::collections::HashSet;
use uuid::Uuid;

fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

#[test]
fn add_assigns_unique_ids_and_returns_stored_entry() {
    let conn = open_db_in_memory().unwrap();
    let service = EntryService::new(SqliteEntryRepository::try_new(&conn).unwrap());

    let first = service
        .add(Domain::Physical, NewEntry::new("Steps").with_amount(8000.0))
        .unwrap();
    let second = service
        .add(Domain::Physical, NewEntry::new("Steps").with_amount(9000.0))
        .unwrap();

    assert_ne!(first.id, second.id);
    let loaded = service.get(first.id).unwrap().unwrap();
    assert_eq!(loaded, first);
    assert_eq!(loaded.domain, Domain::Physical);
}

#[test]
fn get_all_is_scoped_to_domain_and_most_recent_first() {
    let conn = open_db_in_memory().unwrap();
    let service = EntryService::new(SqliteEntryRepository::try_new(&conn).unwrap());

    let older = service
        .add_at(Domain::Mental, NewEntry::new("Meditation"), at(2024, 1, 1, 8))
        .unwrap();
    let newer = service
        .add_at(Domain::Mental, NewEntry::new("Therapy"), at(2024, 1, 3, 8))
        .unwrap();
    service
        .add_at(
            Domain::Finance,
            NewEntry::new("Income").with_amount(100.0),
            at(2024, 1, 2, 8),
        )
        .unwrap();

    let mental = service.get_all(Domain::Mental).unwrap();
    let ids: Vec<Uuid> = mental.iter().map(|entry| entry.id).collect();
    assert_eq!(ids, vec![newer.id, older.id]);
    assert!(service.get_all(Domain::Journal).unwrap().is_empty());
}

#[test]
fn delete_removes_exactly_one_entry_and_keeps_the_rest_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let service = EntryService::new(SqliteEntryRepository::try_new(&conn).unwrap());

    let kept_a = service
        .add_at(
            Domain::Addiction,
            NewEntry::new("Cigarettes").with_amount(3.0).with_notes("after lunch"),
            at(2024, 2, 1, 12),
        )
        .unwrap();
    let doomed = service
        .add_at(
            Domain::Addiction,
            NewEntry::new("Alcohol").with_amount(1.0),
            at(2024, 2, 2, 20),
        )
        .unwrap();
    let kept_b = service
        .add_at(
            Domain::Addiction,
            NewEntry::new("Gaming").with_amount(2.0),
            at(2024, 2, 3, 21),
        )
        .unwrap();

    assert!(service.delete(doomed.id).unwrap());

    let remaining = service.get_all(Domain::Addiction).unwrap();
    assert_eq!(remaining, vec![kept_b, kept_a]);
    assert!(service.get(doomed.id).unwrap().is_none());
}

#[test]
fn delete_and_update_of_absent_id_are_silent_no_ops() {
    let conn = open_db_in_memory().unwrap();
    let service = EntryService::new(SqliteEntryRepository::try_new(&conn).unwrap());
    let existing = service
        .add(Domain::Rituals, NewEntry::new("Prayer").with_completed(true))
        .unwrap();

    let missing = Uuid::now_v7();
    assert!(!service.delete(missing).unwrap());
    let patch = EntryPatch {
        notes: Some("ignored".to_string()),
        ..EntryPatch::default()
    };
    assert!(service.update(missing, &patch).unwrap().is_none());
    assert!(service.toggle_completed(missing).unwrap().is_none());

    assert_eq!(service.get_all(Domain::Rituals).unwrap(), vec![existing]);
}

#[test]
fn update_merges_patch_fields_in_place() {
    let conn = open_db_in_memory().unwrap();
    let service = EntryService::new(SqliteEntryRepository::try_new(&conn).unwrap());
    let original = service
        .add(
            Domain::Finance,
            NewEntry::new("Expense")
                .with_amount(12.5)
                .with_category("Food")
                .with_notes("lunch"),
        )
        .unwrap();

    let patch = EntryPatch {
        amount: Some(14.0),
        notes: Some("lunch + tip".to_string()),
        ..EntryPatch::default()
    };
    let updated = service.update(original.id, &patch).unwrap().unwrap();

    assert_eq!(updated.id, original.id);
    assert_eq!(updated.amount, Some(14.0));
    assert_eq!(updated.category.as_deref(), Some("Food"));
    assert_eq!(updated.notes.as_deref(), Some("lunch + tip"));
    assert_eq!(updated.recorded_at, original.recorded_at);
    assert_eq!(service.get(original.id).unwrap().unwrap(), updated);
}

#[test]
fn toggle_completed_flips_ritual_flag() {
    let conn = open_db_in_memory().unwrap();
    let service = EntryService::new(SqliteEntryRepository::try_new(&conn).unwrap());
    let ritual = service
        .add(Domain::Rituals, NewEntry::new("Reading").with_completed(false))
        .unwrap();

    let toggled = service.toggle_completed(ritual.id).unwrap().unwrap();
    assert_eq!(toggled.completed, Some(true));
    let toggled_back = service.toggle_completed(ritual.id).unwrap().unwrap();
    assert_eq!(toggled_back.completed, Some(false));
}

#[test]
fn validation_failure_blocks_add_and_update() {
    let conn = open_db_in_memory().unwrap();
    let service = EntryService::new(SqliteEntryRepository::try_new(&conn).unwrap());

    let blank_kind = service.add(Domain::Physical, NewEntry::new("   "));
    assert!(matches!(
        blank_kind,
        Err(RepoError::Validation(EntryValidationError::BlankKind))
    ));

    let missing_amount = service.add(Domain::Finance, NewEntry::new("Income"));
    assert!(matches!(
        missing_amount,
        Err(RepoError::Validation(EntryValidationError::MissingAmount(
            Domain::Finance
        )))
    ));

    let journal = service
        .add(Domain::Journal, NewEntry::new("Entry").with_value("first words"))
        .unwrap();
    let blanking = EntryPatch {
        value: Some(String::new()),
        ..EntryPatch::default()
    };
    assert!(matches!(
        service.update(journal.id, &blanking),
        Err(RepoError::Validation(EntryValidationError::BlankJournalBody))
    ));
    assert_eq!(service.get(journal.id).unwrap().unwrap(), journal);
}

#[test]
fn date_range_bounds_are_inclusive() {
    let conn = open_db_in_memory().unwrap();
    let service = EntryService::new(SqliteEntryRepository::try_new(&conn).unwrap());
    let start = at(2024, 3, 1, 0);
    let end = at(2024, 3, 7, 0);

    let on_start = service
        .add_at(Domain::Physical, NewEntry::new("Workout"), start)
        .unwrap();
    let inside = service
        .add_at(Domain::Physical, NewEntry::new("Workout"), at(2024, 3, 4, 9))
        .unwrap();
    let on_end = service
        .add_at(Domain::Physical, NewEntry::new("Workout"), end)
        .unwrap();
    service
        .add_at(
            Domain::Physical,
            NewEntry::new("Workout"),
            end + Duration::milliseconds(1),
        )
        .unwrap();
    service
        .add_at(
            Domain::Physical,
            NewEntry::new("Workout"),
            start - Duration::milliseconds(1),
        )
        .unwrap();

    let found: HashSet<Uuid> = service
        .get_by_date_range(Domain::Physical, start, end)
        .unwrap()
        .into_iter()
        .map(|entry| entry.id)
        .collect();
    assert_eq!(found, HashSet::from([on_start.id, inside.id, on_end.id]));
}

#[test]
fn list_filters_by_kind_with_stable_pagination() {
    let conn = open_db_in_memory().unwrap();
    let service = EntryService::new(SqliteEntryRepository::try_new(&conn).unwrap());
    for day in 1..=5 {
        service
            .add_at(
                Domain::Physical,
                NewEntry::new("Weight").with_amount(70.0 + f64::from(day)),
                at(2024, 4, day, 7),
            )
            .unwrap();
    }
    service
        .add_at(Domain::Physical, NewEntry::new("Steps").with_amount(5000.0), at(2024, 4, 6, 7))
        .unwrap();

    assert_eq!(service.get_by_kind(Domain::Physical, "Weight").unwrap().len(), 5);

    let page = service
        .list(&EntryListQuery {
            kind: Some("Weight".to_string()),
            limit: Some(2),
            offset: 1,
            ..EntryListQuery::domain(Domain::Physical)
        })
        .unwrap();
    let amounts: Vec<Option<f64>> = page.iter().map(|entry| entry.amount).collect();
    assert_eq!(amounts, vec![Some(74.0), Some(73.0)]);
}

#[test]
fn clear_domain_leaves_other_domains_alone() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();
    let service = EntryService::new(SqliteEntryRepository::try_new(&conn).unwrap());
    service.add(Domain::Mental, NewEntry::new("Mood")).unwrap();
    service.add(Domain::Mental, NewEntry::new("Mood")).unwrap();
    let kept = service.add(Domain::Physical, NewEntry::new("Steps")).unwrap();

    assert_eq!(repo.clear_domain(Domain::Mental).unwrap(), 2);
    assert!(service.get_all(Domain::Mental).unwrap().is_empty());
    assert_eq!(service.get_all(Domain::Physical).unwrap(), vec![kept]);
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteEntryRepository::try_new(&conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_entries_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", target_version()))
        .unwrap();

    let result = SqliteEntryRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("entries"))
    ));
}

#[test]
fn repository_rejects_connection_missing_entry_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE entries (
            id TEXT PRIMARY KEY NOT NULL,
            domain TEXT NOT NULL,
            recorded_at INTEGER NOT NULL,
            type TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", target_version()))
        .unwrap();

    let result = SqliteEntryRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "entries",
            column: "value"
        })
    ));
}
