use rusqlite::Connection;
use simplerepo_core::db::migrations::{current_version, latest_version};
use simplerepo_core::db::{open_db, open_db_in_memory, DbError, OpenOptions};
use simplerepo_core::{AccountDto, AccountRepository, SqliteContext};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory(&OpenOptions::default()).unwrap();

    assert_eq!(current_version(&conn).unwrap(), latest_version());
    assert_table_exists(&conn, "account");
}

#[test]
fn foreign_keys_are_enabled_on_opened_connections() {
    let conn = open_db_in_memory(&OpenOptions::quiet()).unwrap();
    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);
}

#[test]
fn reopening_a_database_keeps_schema_and_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("simplerepo.db");

    let first = open_db(&path, &OpenOptions::quiet()).unwrap();
    {
        let ctx = SqliteContext::new(&first);
        AccountRepository::try_new(&ctx)
            .unwrap()
            .save_account(&AccountDto::new("Simon", "simon@x.com"))
            .unwrap();
    }
    drop(first);

    let second = open_db(&path, &OpenOptions::quiet()).unwrap();
    assert_eq!(current_version(&second).unwrap(), latest_version());
    let ctx = SqliteContext::new(&second);
    let accounts = AccountRepository::try_new(&ctx)
        .unwrap()
        .get_accounts()
        .unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].user_name(), Some("Simon"));
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path, &OpenOptions::quiet()).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
