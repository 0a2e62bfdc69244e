//! Table-shaped rows and the mapping contract to domain objects.
//!
//! # Responsibility
//! - `Record`: the persisted form of one entity, column for column.
//! - `RecordMapper`: the pair of total functions between DTO and record.
//!
//! # Invariants
//! - Records are transient; the repository builds one per operation and
//!   never holds it across calls.
//! - `from_record(to_record(x)) == x`, except that an unassigned identifier
//!   is filled in by storage during an insert.

use crate::context::QueryError;
use crate::schema::Table;
use rusqlite::types::Value;
use rusqlite::Row;

/// Persisted, table-shaped representation of one entity instance.
pub trait Record: Sized {
    type Table: Table;

    /// Explicitly assigned columns, in table order, with their bind values.
    ///
    /// An unassigned column is left out entirely so storage can apply its
    /// default; an assigned-but-empty nullable column is sent as `NULL`.
    fn assigned_values(&self) -> Vec<(&'static str, Value)>;

    /// Bind value of the primary key, if one is assigned.
    fn primary_key_value(&self) -> Option<Value>;

    /// Reads every column of `row`, which was selected with the table's
    /// `select_list()`.
    fn from_row(row: &Row<'_>) -> Result<Self, QueryError>;
}

/// Mapping contract between a domain object and its record.
pub trait RecordMapper {
    type Dto;
    type Table: Table;
    type Record: Record<Table = Self::Table>;

    /// The static handle of the table this mapper targets.
    fn table(&self) -> &'static Self::Table;

    /// Builds a fresh record from `dto`. Never fails; a DTO missing
    /// required fields yields a record storage will reject.
    fn to_record(&self, dto: &Self::Dto) -> Self::Record;

    /// Copies every column of `record` into a new DTO.
    fn from_record(&self, record: Self::Record) -> Self::Dto;
}
