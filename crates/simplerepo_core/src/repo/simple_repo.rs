//! Generic CRUD repository over (DTO, record, table handle).

use super::error::{RepoError, RepoResult};
use crate::context::{QueryContext, QueryError, StoredColumn};
use crate::db::migrations::latest_version;
use crate::record::RecordMapper;
use crate::schema::{Column, Condition, Table};

/// Reusable CRUD operations for one table.
///
/// Concrete repositories wrap this type, supply a `RecordMapper` and expose
/// entity-specific method names on top of the five primitives.
pub struct SimpleRepository<'ctx, C: QueryContext, M: RecordMapper> {
    ctx: &'ctx C,
    mapper: M,
}

impl<'ctx, C: QueryContext, M: RecordMapper> SimpleRepository<'ctx, C, M> {
    /// Builds a repository without inspecting the schema.
    pub fn new(ctx: &'ctx C, mapper: M) -> Self {
        Self { ctx, mapper }
    }

    /// Builds a repository after checking that `ctx` is migrated and that
    /// every column of the mapper's table handle exists in storage with a
    /// compatible type, nullability, key and default.
    pub fn try_new(ctx: &'ctx C, mapper: M) -> RepoResult<Self> {
        ensure_connection_ready(ctx, mapper.table())?;
        Ok(Self::new(ctx, mapper))
    }

    pub fn table(&self) -> &'static M::Table {
        self.mapper.table()
    }

    pub fn mapper(&self) -> &M {
        &self.mapper
    }

    /// Inserts `dto` and returns it as stored, with any storage-generated
    /// identifier filled in.
    ///
    /// # Errors
    /// - `RepoError::CreateFailed` for any storage failure.
    pub fn create_one(&self, dto: &M::Dto) -> RepoResult<M::Dto> {
        let table = self.table();
        let record = self.mapper.to_record(dto);
        let stored = self
            .ctx
            .insert_one(table, &record)
            .map_err(|source| RepoError::CreateFailed {
                table: table.name(),
                source,
            })?;
        Ok(self.mapper.from_record(stored))
    }

    /// Every row of the table, in storage order. An empty table is not an error.
    pub fn read_all(&self) -> RepoResult<Vec<M::Dto>> {
        let table = self.table();
        let records = self
            .ctx
            .fetch_all::<M::Record>(table)
            .map_err(|source| fetch_failed(table, source))?;
        Ok(self.map_all(records))
    }

    /// Every row matching `predicate`, in storage order.
    pub fn read_many<F>(&self, predicate: F) -> RepoResult<Vec<M::Dto>>
    where
        F: FnOnce(&M::Table) -> Condition,
    {
        let table = self.table();
        let condition = predicate(table);
        let records = self
            .ctx
            .fetch::<M::Record>(table, &condition)
            .map_err(|source| fetch_failed(table, source))?;
        Ok(self.map_all(records))
    }

    /// The single row matching `predicate`, or `None` when nothing matches.
    ///
    /// # Errors
    /// - `RepoError::Ambiguous` when more than one row matches.
    /// - `RepoError::FetchFailed` for any storage failure.
    pub fn read_one<F>(&self, predicate: F) -> RepoResult<Option<M::Dto>>
    where
        F: FnOnce(&M::Table) -> Condition,
    {
        let table = self.table();
        let condition = predicate(table);
        let record = self
            .ctx
            .fetch_optional::<M::Record>(table, &condition)
            .map_err(|source| match source {
                QueryError::TooManyRows { table: name } => RepoError::Ambiguous { table: name },
                other => fetch_failed(table, other),
            })?;
        Ok(record.map(|record| self.mapper.from_record(record)))
    }

    /// Writes every field of `dto` to the row with the same identifier and
    /// returns the stored result.
    ///
    /// # Errors
    /// - `RepoError::NotFound` when no row carries the identifier.
    /// - `RepoError::UpdateFailed` for storage failures or a missing identifier.
    pub fn update_one(&self, dto: &M::Dto) -> RepoResult<M::Dto> {
        let table = self.table();
        let record = self.mapper.to_record(dto);
        let stored = self
            .ctx
            .update_one(table, &record)
            .map_err(|source| RepoError::UpdateFailed {
                table: table.name(),
                source,
            })?
            .ok_or(RepoError::NotFound {
                table: table.name(),
            })?;
        Ok(self.mapper.from_record(stored))
    }

    /// Deletes every row matching `predicate` and returns the count.
    /// Deleting nothing is not an error.
    pub fn delete_many<F>(&self, predicate: F) -> RepoResult<usize>
    where
        F: FnOnce(&M::Table) -> Condition,
    {
        let table = self.table();
        let condition = predicate(table);
        self.ctx
            .delete(table, &condition)
            .map_err(|source| RepoError::DeleteFailed {
                table: table.name(),
                source,
            })
    }

    fn map_all(&self, records: Vec<M::Record>) -> Vec<M::Dto> {
        records
            .into_iter()
            .map(|record| self.mapper.from_record(record))
            .collect()
    }
}

fn fetch_failed<T: Table>(table: &T, source: QueryError) -> RepoError {
    RepoError::FetchFailed {
        table: table.name(),
        source,
    }
}

fn ensure_connection_ready<C: QueryContext, T: Table>(ctx: &C, table: &T) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = ctx.schema_version().map_err(RepoError::Schema)?;
    if actual_version < expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let existing = ctx.table_columns(table.name()).map_err(RepoError::Schema)?;
    if existing.is_empty() {
        return Err(RepoError::MissingRequiredTable(table.name()));
    }

    for column in table.columns() {
        let Some(stored) = existing.iter().find(|stored| stored.name == column.name()) else {
            return Err(RepoError::MissingRequiredColumn {
                table: table.name(),
                column: column.name(),
            });
        };
        if !column_fits(column, stored) {
            return Err(RepoError::IncompatibleColumn {
                table: table.name(),
                column: column.name(),
            });
        }
    }

    Ok(())
}

/// A stored column fits a descriptor when every row storage can hold or
/// generate for it decodes into the record shape.
fn column_fits(column: &Column, stored: &StoredColumn) -> bool {
    column.sql_type().accepts_declared(&stored.declared_type)
        && column.is_primary_key() == stored.primary_key
        && (column.is_nullable() || stored.is_never_null())
        && (!column.has_default() || stored.is_generated())
}
