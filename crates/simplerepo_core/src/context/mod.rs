//! Query execution context: the live session repositories run against.
//!
//! # Responsibility
//! - Define the primitive fetch/insert/update/delete contract the generic
//!   repository consumes.
//! - Keep SQL text and driver calls out of repository code.
//!
//! # Invariants
//! - A context never opens, pools or closes connections; the caller owns the
//!   connection and its lifecycle.
//! - Every primitive runs synchronously to completion or failure.

use crate::record::Record;
use crate::schema::{Condition, Table};
use thiserror::Error;

mod sqlite;

pub use sqlite::SqliteContext;

pub type QueryResult<T> = Result<T, QueryError>;

/// Failure of one primitive storage operation.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error("query on `{table}` matched more than one row")]
    TooManyRows { table: &'static str },
    #[error("record for `{table}` has no primary key assigned")]
    MissingPrimaryKey { table: &'static str },
    #[error("invalid persisted data: {0}")]
    InvalidData(String),
}

/// One column of a stored table, as the storage catalog reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredColumn {
    pub name: String,
    /// Declared type text, e.g. `TEXT` or `VARCHAR(64)`; empty when undeclared.
    pub declared_type: String,
    pub not_null: bool,
    pub has_default: bool,
    pub primary_key: bool,
}

impl StoredColumn {
    /// Whether storage fills this column on insert when it is left unset:
    /// an explicit default, or an `INTEGER PRIMARY KEY` rowid alias.
    pub fn is_generated(&self) -> bool {
        self.has_default || self.is_rowid_alias()
    }

    /// Whether storage guarantees the column never holds `NULL`.
    pub fn is_never_null(&self) -> bool {
        self.not_null || self.is_rowid_alias()
    }

    fn is_rowid_alias(&self) -> bool {
        self.primary_key && self.declared_type.eq_ignore_ascii_case("INTEGER")
    }
}

/// Primitive operations against exactly one open connection.
pub trait QueryContext {
    /// Inserts `record` and returns the persisted row, including every
    /// column storage generated.
    fn insert_one<R: Record>(&self, table: &R::Table, record: &R) -> QueryResult<R>;

    /// Every row of `table`, in storage order.
    fn fetch_all<R: Record>(&self, table: &R::Table) -> QueryResult<Vec<R>>;

    /// Every row of `table` matching `condition`, in storage order.
    fn fetch<R: Record>(&self, table: &R::Table, condition: &Condition) -> QueryResult<Vec<R>>;

    /// At most one row matching `condition`.
    ///
    /// # Errors
    /// - `QueryError::TooManyRows` when more than one row matches.
    fn fetch_optional<R: Record>(
        &self,
        table: &R::Table,
        condition: &Condition,
    ) -> QueryResult<Option<R>>;

    /// Updates the row whose primary key equals the record's and returns the
    /// stored result, or `None` when no such row exists.
    fn update_one<R: Record>(&self, table: &R::Table, record: &R) -> QueryResult<Option<R>>;

    /// Deletes every row matching `condition` and returns how many went away.
    fn delete<T: Table>(&self, table: &T, condition: &Condition) -> QueryResult<usize>;

    /// Columns of `table_name` as storage sees them, in declaration order;
    /// empty when the table does not exist.
    fn table_columns(&self, table_name: &str) -> QueryResult<Vec<StoredColumn>>;

    /// Schema version recorded by the migration layer.
    fn schema_version(&self) -> QueryResult<u32>;
}
