mod common;

use bookkeeper_core::db::open_db_in_memory;
use bookkeeper_core::{
    Expense, Filter, RepoError, Repository, SchemaMode, SqliteRepository, UNSET_PK,
};
use common::Sample;

fn insert_corrupt_expense_row(conn: &rusqlite::Connection) -> i64 {
    conn.execute(
        "INSERT INTO expense (amount, category, expense_date, added_date, comment)
         VALUES ('not-a-float', 1, '2024-01-01 00:00:00', '2024-01-01 00:00:00', '');",
        [],
    )
    .unwrap();
    conn.last_insert_rowid()
}

#[test]
fn add_and_get_round_trip() {
    let conn = open_db_in_memory().unwrap();
    let repo: SqliteRepository<'_, Sample> = SqliteRepository::try_new(&conn).unwrap();

    let mut sample = Sample::new("first");
    let pk = repo.add(&mut sample).unwrap();

    assert_eq!(sample.pk, pk);
    let loaded = repo.get(pk).unwrap().unwrap();
    assert_eq!(loaded, sample);
}

#[test]
fn table_name_is_case_folded_shape_name() {
    let conn = open_db_in_memory().unwrap();
    let repo: SqliteRepository<'_, Sample> = SqliteRepository::try_new(&conn).unwrap();
    assert_eq!(repo.table_name(), "sample");
}

#[test]
fn identities_are_unique_and_strictly_increasing() {
    let conn = open_db_in_memory().unwrap();
    let repo: SqliteRepository<'_, Sample> = SqliteRepository::try_new(&conn).unwrap();

    let mut assigned = Vec::new();
    for i in 0..5 {
        let mut sample = Sample::new(&format!("row {i}"));
        assigned.push(repo.add(&mut sample).unwrap());
    }

    for pair in assigned.windows(2) {
        assert!(pair[0] < pair[1], "identities must increase in call order");
    }
}

#[test]
fn identities_are_not_reused_after_delete() {
    let conn = open_db_in_memory().unwrap();
    let repo: SqliteRepository<'_, Sample> = SqliteRepository::try_new(&conn).unwrap();

    let mut first = Sample::new("a");
    let mut last = Sample::new("b");
    repo.add(&mut first).unwrap();
    let last_pk = repo.add(&mut last).unwrap();
    repo.delete(last_pk).unwrap();

    let mut next = Sample::new("c");
    let next_pk = repo.add(&mut next).unwrap();
    assert!(next_pk > last_pk, "deleted identity must not be reused");
}

#[test]
fn add_rejects_record_with_assigned_identity() {
    let conn = open_db_in_memory().unwrap();
    let repo: SqliteRepository<'_, Sample> = SqliteRepository::try_new(&conn).unwrap();

    let mut sample = Sample::new("already persisted");
    sample.pk = 1;
    let err = repo.add(&mut sample).unwrap_err();
    assert!(matches!(err, RepoError::InvalidState(_)));
    assert_eq!(sample.pk, 1, "failed add must leave the identity untouched");
}

#[test]
fn get_missing_identity_is_none_not_error() {
    let conn = open_db_in_memory().unwrap();
    let repo: SqliteRepository<'_, Sample> = SqliteRepository::try_new(&conn).unwrap();
    assert!(repo.get(42).unwrap().is_none());
}

#[test]
fn delete_missing_identity_fails_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo: SqliteRepository<'_, Sample> = SqliteRepository::try_new(&conn).unwrap();

    let err = repo.delete(1).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(1)));
}

#[test]
fn delete_removes_exactly_one_row() {
    let conn = open_db_in_memory().unwrap();
    let repo: SqliteRepository<'_, Sample> = SqliteRepository::try_new(&conn).unwrap();

    let mut keep = Sample::new("keep");
    let mut gone = Sample::new("gone");
    repo.add(&mut keep).unwrap();
    let drop_pk = repo.add(&mut gone).unwrap();

    repo.delete(drop_pk).unwrap();
    assert!(repo.get(drop_pk).unwrap().is_none());
    let remaining = repo.get_all(&Filter::new()).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].pk, keep.pk);
}

#[test]
fn update_with_unset_identity_fails_invalid_state() {
    let conn = open_db_in_memory().unwrap();
    let repo: SqliteRepository<'_, Sample> = SqliteRepository::try_new(&conn).unwrap();

    let sample = Sample::new("transient");
    assert_eq!(sample.pk, UNSET_PK);
    let err = repo.update(&sample).unwrap_err();
    assert!(matches!(err, RepoError::InvalidState(_)));
}

#[test]
fn update_missing_identity_is_silent_noop() {
    let conn = open_db_in_memory().unwrap();
    let repo: SqliteRepository<'_, Sample> = SqliteRepository::try_new(&conn).unwrap();

    let mut ghost = Sample::new("ghost");
    ghost.pk = 99;
    repo.update(&ghost).unwrap();

    // No error and no row created.
    assert!(repo.get(99).unwrap().is_none());
    assert!(repo.get_all(&Filter::new()).unwrap().is_empty());
}

#[test]
fn update_rewrites_only_the_addressed_row() {
    let conn = open_db_in_memory().unwrap();
    let repo: SqliteRepository<'_, Sample> = SqliteRepository::try_new(&conn).unwrap();

    let mut target = Sample::new("before");
    let mut other = Sample::new("untouched");
    repo.add(&mut target).unwrap();
    repo.add(&mut other).unwrap();

    target.text = "after".to_string();
    repo.update(&target).unwrap();

    assert_eq!(repo.get(target.pk).unwrap().unwrap().text, "after");
    assert_eq!(repo.get(other.pk).unwrap().unwrap().text, "untouched");
}

#[test]
fn construction_is_idempotent_and_recreate_wipes() {
    let conn = open_db_in_memory().unwrap();
    let repo: SqliteRepository<'_, Sample> = SqliteRepository::try_new(&conn).unwrap();
    let mut sample = Sample::new("survives");
    repo.add(&mut sample).unwrap();

    // Create-if-missing leaves existing data alone.
    let again: SqliteRepository<'_, Sample> = SqliteRepository::try_new(&conn).unwrap();
    assert_eq!(again.get_all(&Filter::new()).unwrap().len(), 1);

    // Clean-slate mode drops the table first.
    let clean: SqliteRepository<'_, Sample> =
        SqliteRepository::try_new_with_mode(&conn, SchemaMode::Recreate).unwrap();
    assert!(clean.get_all(&Filter::new()).unwrap().is_empty());
}

#[test]
fn corrupt_stored_text_fails_decode_with_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    let repo: SqliteRepository<'_, Expense> = SqliteRepository::try_new(&conn).unwrap();

    let pk = insert_corrupt_expense_row(&conn);

    let err = repo.get(pk).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
    assert!(err.to_string().contains("amount"));

    let scan_err = repo.get_all(&Filter::new()).unwrap_err();
    assert!(matches!(scan_err, RepoError::InvalidData(_)));
}

#[test]
fn corrupt_row_can_still_be_deleted() {
    let conn = open_db_in_memory().unwrap();
    let repo: SqliteRepository<'_, Expense> = SqliteRepository::try_new(&conn).unwrap();

    let pk = insert_corrupt_expense_row(&conn);
    assert!(matches!(
        repo.get(pk).unwrap_err(),
        RepoError::InvalidData(_)
    ));

    // The existence check must not decode the row.
    repo.delete(pk).unwrap();
    assert!(repo.get(pk).unwrap().is_none());
    assert!(repo.get_all(&Filter::new()).unwrap().is_empty());
}

#[test]
fn end_to_end_crud_scenario() {
    let conn = open_db_in_memory().unwrap();
    let repo: SqliteRepository<'_, Sample> = SqliteRepository::try_new(&conn).unwrap();

    let mut sample = Sample::new("abc");
    let pk = repo.add(&mut sample).unwrap();
    assert_eq!(pk, sample.pk);

    sample.text = "xyz".to_string();
    repo.update(&sample).unwrap();
    assert_eq!(repo.get(pk).unwrap().unwrap().text, "xyz");

    repo.delete(pk).unwrap();
    assert!(repo.get(pk).unwrap().is_none());
    let err = repo.delete(pk).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(missing) if missing == pk));
}
