use kanban_core::db::{open_db, DbError, STORAGE_SCHEMA_VERSION};
use kanban_core::{
    decode_snapshot, BoardService, ColumnKey, LocalStorage, SqliteLocalStorage, STORAGE_KEY,
};
use rusqlite::{Connection, OptionalExtension};

#[test]
fn fresh_file_is_stamped_and_accepts_items() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = SqliteLocalStorage::open(dir.path().join("board.sqlite3")).unwrap();

    assert_eq!(user_version(storage.connection()), STORAGE_SCHEMA_VERSION);
    assert_eq!(storage.get_item(STORAGE_KEY).unwrap(), None);
    storage.set_item(STORAGE_KEY, "{}").unwrap();
    storage.set_item(STORAGE_KEY, "[]").unwrap();
    assert_eq!(storage.get_item(STORAGE_KEY).unwrap().as_deref(), Some("[]"));
}

#[test]
fn reopening_keeps_layout_and_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.sqlite3");

    SqliteLocalStorage::open(&path)
        .unwrap()
        .set_item("other key", "kept")
        .unwrap();

    let conn = open_db(&path).unwrap();
    assert_eq!(user_version(&conn), STORAGE_SCHEMA_VERSION);
    assert_eq!(stored_value(&conn, "other key").as_deref(), Some("kept"));
}

#[test]
fn newer_layout_is_refused_and_saved_board_left_alone() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let saved = {
        let storage = SqliteLocalStorage::open(&path).unwrap();
        let mut service = BoardService::initialize(storage).unwrap();
        service.add_task(ColumnKey::Done, "written by old build").unwrap();
        service.storage().get_item(STORAGE_KEY).unwrap().unwrap()
    };

    let conn = Connection::open(&path).unwrap();
    conn.pragma_update(None, "user_version", STORAGE_SCHEMA_VERSION + 1)
        .unwrap();
    drop(conn);

    match SqliteLocalStorage::open(&path) {
        Err(DbError::NewerStorageSchema { found, supported }) => {
            assert_eq!(found, STORAGE_SCHEMA_VERSION + 1);
            assert_eq!(supported, STORAGE_SCHEMA_VERSION);
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("newer layout was opened"),
    }

    let conn = Connection::open(&path).unwrap();
    assert_eq!(user_version(&conn), STORAGE_SCHEMA_VERSION + 1);
    let row = stored_value(&conn, STORAGE_KEY).unwrap();
    assert_eq!(row, saved);
    assert_eq!(decode_snapshot(&row).unwrap().task_count(), 4);
}

fn user_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn stored_value(conn: &Connection, key: &str) -> Option<String> {
    conn.query_row(
        "SELECT value FROM local_storage WHERE key = ?1;",
        [key],
        |row| row.get(0),
    )
    .optional()
    .unwrap()
}
