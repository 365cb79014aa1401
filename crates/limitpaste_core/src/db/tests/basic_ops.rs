//! Basic database lifecycle tests.

use super::*;
use tempfile::TempDir;

#[test]
fn test_create_database_and_ping() {
    let (db, _temp) = setup_test_db();
    db.ping().expect("fresh database should answer a ping");
}

#[test]
fn test_new_creates_missing_parent_directories() {
    let temp = TempDir::new().expect("temp dir");
    let nested = temp.path().join("a").join("b").join("db");
    let db = Database::new(nested.to_str().expect("path")).expect("open nested");
    db.ping().expect("ping");
    assert!(nested.join(tables::REDB_FILE_NAME).exists());
}

#[test]
fn test_rows_survive_reopen() {
    let temp = TempDir::new().expect("temp dir");
    let path = temp.path().join("db");
    let path = path.to_str().expect("path");

    let id = {
        let db = Database::new(path).expect("open");
        let created = db
            .pastes
            .create(limited_draft("persisted", Some(2)))
            .expect("create");
        db.pastes
            .consume(&created.id, base_instant())
            .expect("consume")
            .expect("view");
        created.id
    };

    let reopened = Database::new(path).expect("reopen");
    let stored = reopened
        .pastes
        .get(&id)
        .expect("get")
        .expect("paste should survive reopen");
    assert_eq!(stored.content, "persisted");
    assert_eq!(stored.current_views, 1);
}

#[test]
fn test_second_open_of_same_path_is_reported() {
    let (db, temp) = setup_test_db();
    let path = temp.path().join("test.db");
    let err = match Database::new(path.to_str().expect("path")) {
        Ok(_) => panic!("second open should fail while the first handle is alive"),
        Err(err) => err,
    };
    assert!(
        err.to_string().contains("already open"),
        "unexpected error: {}",
        err
    );
    drop(db);
}

#[test]
fn test_shared_handles_see_the_same_rows() {
    let (db, _temp) = setup_test_db();
    let other = db.share().expect("share");

    let created = db
        .pastes
        .create(limited_draft("shared", None))
        .expect("create");
    let seen = other
        .pastes
        .consume(&created.id, base_instant())
        .expect("consume")
        .expect("visible through shared handle");
    assert_eq!(seen.content, "shared");
    assert!(Arc::ptr_eq(&db.db, &other.db));
}

#[test]
fn test_identical_content_creates_distinct_rows() {
    let (db, _temp) = setup_test_db();
    let a = db.pastes.create(limited_draft("same", None)).expect("a");
    let b = db.pastes.create(limited_draft("same", None)).expect("b");
    assert_ne!(a.id, b.id);
    assert_eq!(db.pastes.count().expect("count"), 2);
    assert_eq!(db.pastes.get(&a.id).expect("get").expect("a"), a);
}

#[test]
fn test_expiry_uses_supplied_instant() {
    let (db, _temp) = setup_test_db();
    let mut draft = limited_draft("ttl", Some(10));
    draft.expires_at = Some(base_instant() + Duration::seconds(1));
    let created = db.pastes.create(draft).expect("create");

    let too_late = base_instant() + Duration::seconds(2);
    assert!(db
        .pastes
        .consume(&created.id, too_late)
        .expect("consume")
        .is_none());
    assert!(db
        .pastes
        .consume(&created.id, base_instant())
        .expect("consume")
        .is_some());
}
