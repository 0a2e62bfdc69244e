use simplerepo_core::db::{open_db_in_memory, OpenOptions};
use simplerepo_core::{
    AccountDto, AccountMapper, AccountRepository, OrAbsent, QueryError, RepoError,
    SimpleRepository, SqliteContext,
};
use std::collections::HashMap;
use uuid::Uuid;

fn open() -> rusqlite::Connection {
    open_db_in_memory(&OpenOptions::quiet()).unwrap()
}

#[test]
fn created_accounts_are_listed_with_their_generated_ids() {
    let conn = open();
    let ctx = SqliteContext::new(&conn);
    let repo = AccountRepository::try_new(&ctx).unwrap();

    let simon = repo
        .save_account(&AccountDto::new("Simon", "simon@x.com"))
        .unwrap();
    let lukas = repo
        .save_account(&AccountDto::new("Lukas", "lukas@x.com"))
        .unwrap();

    let simon_id = simon.id().expect("storage assigns an id");
    let lukas_id = lukas.id().expect("storage assigns an id");
    assert_ne!(simon_id, lukas_id);
    assert_eq!(simon.user_name(), Some("Simon"));
    assert_eq!(simon.email_address(), Some("simon@x.com"));

    let listed: HashMap<_, _> = repo
        .get_accounts()
        .unwrap()
        .into_iter()
        .map(|account| (account.id().unwrap(), account))
        .collect();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[&simon_id], simon);
    assert_eq!(listed[&lukas_id], lukas);
}

#[test]
fn generated_ids_are_version_4_uuids() {
    let conn = open();
    let ctx = SqliteContext::new(&conn);
    let repo = AccountRepository::try_new(&ctx).unwrap();

    for index in 0..16 {
        let account = repo
            .save_account(&AccountDto::new("user", format!("user{index}@x.com")))
            .unwrap();
        let id = account.id().unwrap();
        assert_eq!(id.get_version_num(), 4);
        assert_eq!(id.get_variant(), uuid::Variant::RFC4122);
    }
}

#[test]
fn create_keeps_caller_assigned_id() {
    let conn = open();
    let ctx = SqliteContext::new(&conn);
    let repo = AccountRepository::try_new(&ctx).unwrap();

    let id = Uuid::new_v4();
    let input = AccountDto::with_id(id, "Simon", "simon@x.com");
    let created = repo.save_account(&input).unwrap();

    assert_eq!(created, input);
    assert_eq!(repo.find_account(id).unwrap(), Some(input));
}

#[test]
fn read_all_on_empty_table_returns_empty_list() {
    let conn = open();
    let ctx = SqliteContext::new(&conn);
    let repo = AccountRepository::try_new(&ctx).unwrap();

    assert!(repo.get_accounts().unwrap().is_empty());
}

#[test]
fn delete_by_user_name_removes_only_matching_accounts() {
    let conn = open();
    let ctx = SqliteContext::new(&conn);
    let repo = AccountRepository::try_new(&ctx).unwrap();

    repo.save_account(&AccountDto::new("Simon", "simon@x.com"))
        .unwrap();
    let lukas = repo
        .save_account(&AccountDto::new("Lukas", "lukas@x.com"))
        .unwrap();

    assert_eq!(repo.find_accounts_by_user_name("Simon").unwrap().len(), 1);
    assert_eq!(repo.delete_accounts_by_user_name("Simon").unwrap(), 1);
    assert!(repo.find_accounts_by_user_name("Simon").unwrap().is_empty());

    let remaining = repo.get_accounts().unwrap();
    assert_eq!(remaining, vec![lukas]);
}

#[test]
fn delete_matching_nothing_is_not_an_error() {
    let conn = open();
    let ctx = SqliteContext::new(&conn);
    let repo = AccountRepository::try_new(&ctx).unwrap();

    repo.save_account(&AccountDto::new("Lukas", "lukas@x.com"))
        .unwrap();

    assert_eq!(repo.delete_accounts_by_user_name("Nobody").unwrap(), 0);
    assert!(!repo.delete_account(Uuid::new_v4()).unwrap());
    assert_eq!(repo.get_accounts().unwrap().len(), 1);
}

#[test]
fn read_one_returns_none_for_no_match_and_the_row_for_one_match() {
    let conn = open();
    let ctx = SqliteContext::new(&conn);
    let repo = AccountRepository::try_new(&ctx).unwrap();

    let simon = repo
        .save_account(&AccountDto::new("Simon", "simon@x.com"))
        .unwrap();

    assert_eq!(repo.find_account_by_email("nobody@x.com").unwrap(), None);
    assert_eq!(
        repo.find_account_by_email("simon@x.com").unwrap(),
        Some(simon.clone())
    );
    assert_eq!(repo.find_account(simon.id().unwrap()).unwrap(), Some(simon));
}

#[test]
fn read_one_with_several_matches_is_ambiguous() {
    let conn = open();
    let ctx = SqliteContext::new(&conn);
    let repo = SimpleRepository::try_new(&ctx, AccountMapper).unwrap();

    repo.create_one(&AccountDto::new("Simon", "simon.a@x.com"))
        .unwrap();
    repo.create_one(&AccountDto::new("Simon", "simon.b@x.com"))
        .unwrap();

    let err = repo.read_one(|t| t.user_name.eq("Simon")).unwrap_err();
    assert!(matches!(err, RepoError::Ambiguous { table: "account" }));

    assert_eq!(repo.read_many(|t| t.user_name.eq("Simon")).unwrap().len(), 2);
}

#[test]
fn read_many_combines_conditions() {
    let conn = open();
    let ctx = SqliteContext::new(&conn);
    let repo = SimpleRepository::try_new(&ctx, AccountMapper).unwrap();

    repo.create_one(&AccountDto::new("Simon", "simon@x.com"))
        .unwrap();
    repo.create_one(&AccountDto::new("Lukas", "lukas@x.com"))
        .unwrap();
    repo.create_one(&AccountDto::new("Lara", "lara@y.org"))
        .unwrap();

    let mut names: Vec<_> = repo
        .read_many(|t| t.email_address.like("%@x.com").and(t.user_name.ne("Simon")))
        .unwrap()
        .into_iter()
        .map(|account| account.user_name().unwrap().to_string())
        .collect();
    names.sort();
    assert_eq!(names, ["Lukas"]);

    let both = repo
        .read_many(|t| t.user_name.in_list(["Simon", "Lara"]))
        .unwrap();
    assert_eq!(both.len(), 2);
}

#[test]
fn duplicate_email_fails_create() {
    let conn = open();
    let ctx = SqliteContext::new(&conn);
    let repo = AccountRepository::try_new(&ctx).unwrap();

    repo.save_account(&AccountDto::new("Simon", "simon@x.com"))
        .unwrap();
    let err = repo
        .save_account(&AccountDto::new("Simon II", "simon@x.com"))
        .unwrap_err();

    assert!(matches!(
        err,
        RepoError::CreateFailed {
            table: "account",
            source: QueryError::Sqlite(_)
        }
    ));
    assert_eq!(repo.get_accounts().unwrap().len(), 1);
}

#[test]
fn missing_required_field_fails_create() {
    let conn = open();
    let ctx = SqliteContext::new(&conn);
    let repo = AccountRepository::try_new(&ctx).unwrap();

    let mut incomplete = AccountDto::default();
    incomplete.set_user_name("Simon");

    let err = repo.save_account(&incomplete).unwrap_err();
    assert!(matches!(err, RepoError::CreateFailed { .. }));
    assert!(repo.get_accounts().unwrap().is_empty());
}

#[test]
fn update_overwrites_fields_of_existing_account() {
    let conn = open();
    let ctx = SqliteContext::new(&conn);
    let repo = AccountRepository::try_new(&ctx).unwrap();

    let mut account = repo
        .save_account(&AccountDto::new("Simon", "simon@x.com"))
        .unwrap();
    account.set_email_address("simon@example.org");

    let updated = repo.update_account(&account).unwrap();
    assert_eq!(updated, account);
    assert_eq!(
        repo.find_account(account.id().unwrap()).unwrap(),
        Some(account)
    );
}

#[test]
fn update_of_unknown_id_is_not_found() {
    let conn = open();
    let ctx = SqliteContext::new(&conn);
    let repo = AccountRepository::try_new(&ctx).unwrap();

    let ghost = AccountDto::with_id(Uuid::new_v4(), "Ghost", "ghost@x.com");
    let err = repo.update_account(&ghost).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { table: "account" }));
}

#[test]
fn update_without_id_fails() {
    let conn = open();
    let ctx = SqliteContext::new(&conn);
    let repo = AccountRepository::try_new(&ctx).unwrap();

    let err = repo
        .update_account(&AccountDto::new("Simon", "simon@x.com"))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::UpdateFailed {
            source: QueryError::MissingPrimaryKey { table: "account" },
            ..
        }
    ));
}

#[test]
fn update_violating_unique_email_fails() {
    let conn = open();
    let ctx = SqliteContext::new(&conn);
    let repo = AccountRepository::try_new(&ctx).unwrap();

    repo.save_account(&AccountDto::new("Simon", "simon@x.com"))
        .unwrap();
    let mut lukas = repo
        .save_account(&AccountDto::new("Lukas", "lukas@x.com"))
        .unwrap();
    lukas.set_email_address("simon@x.com");

    let err = repo.update_account(&lukas).unwrap_err();
    assert!(matches!(err, RepoError::UpdateFailed { .. }));
}

#[test]
fn or_absent_collapses_errors_and_misses_into_none() {
    let conn = open();
    let ctx = SqliteContext::new(&conn);
    let repo = AccountRepository::try_new(&ctx).unwrap();

    let ghost = AccountDto::with_id(Uuid::new_v4(), "Ghost", "ghost@x.com");
    assert_eq!(repo.update_account(&ghost).or_absent(), None);
    assert_eq!(
        repo.find_account(Uuid::new_v4()).or_absent().flatten(),
        None
    );

    let saved = repo
        .save_account(&AccountDto::new("Simon", "simon@x.com"))
        .unwrap();
    assert_eq!(
        repo.find_account(saved.id().unwrap()).or_absent().flatten(),
        Some(saved)
    );
}

#[test]
fn or_absent_collapses_storage_failures_into_none() {
    let conn = open();
    let ctx = SqliteContext::new(&conn);
    let repo = AccountRepository::try_new(&ctx).unwrap();
    conn.execute(
        "INSERT INTO account (id, user_name, email_address) VALUES ('not-a-uuid', 'x', 'x@x.com');",
        [],
    )
    .unwrap();

    assert!(matches!(
        repo.find_account_by_email("x@x.com"),
        Err(RepoError::FetchFailed {
            table: "account",
            source: QueryError::InvalidData(_)
        })
    ));
    assert_eq!(repo.find_account_by_email("x@x.com").or_absent().flatten(), None);
    assert_eq!(repo.get_accounts().or_absent(), None);
}

#[test]
fn repositories_share_the_static_table_handle() {
    let conn = open();
    let ctx = SqliteContext::new(&conn);
    let first = AccountRepository::new(&ctx);
    let second = AccountRepository::new(&ctx);

    assert!(std::ptr::eq(first.generic().table(), second.generic().table()));
    assert!(std::ptr::eq(first.generic().table(), &simplerepo_core::ACCOUNT));
}
