//! Generic CRUD repositories over SQLite.
//!
//! A concrete repository binds one static table handle and one mapping
//! contract to `SimpleRepository`, which runs every operation against a
//! caller-owned `QueryContext`.

pub mod account;
pub mod context;
pub mod db;
pub mod logging;
pub mod record;
pub mod repo;
pub mod schema;

pub use account::{
    AccountDto, AccountId, AccountMapper, AccountRecord, AccountRepository, AccountTable,
    IdAlreadyAssigned, ACCOUNT,
};
pub use context::{QueryContext, QueryError, QueryResult, SqliteContext, StoredColumn};
pub use logging::{default_log_level, init_logging, logging_status, LogSettings, LoggingError};
pub use record::{Record, RecordMapper};
pub use repo::{OrAbsent, RepoError, RepoResult, SimpleRepository};
pub use schema::{Column, ColumnType, Condition, SqlParam, Table};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
