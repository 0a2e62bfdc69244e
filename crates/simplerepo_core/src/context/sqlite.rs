//! `QueryContext` over a borrowed `rusqlite::Connection`.

use super::{QueryContext, QueryError, QueryResult, StoredColumn};
use crate::record::Record;
use crate::schema::{quote_ident, Condition, Table};
use log::{debug, error};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use std::time::Instant;

/// SQLite-backed query context.
///
/// Borrows the connection for its whole lifetime. `Connection` is not `Sync`,
/// so a context cannot be shared between threads; one context serves one
/// unit of work at a time.
pub struct SqliteContext<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteContext<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// The underlying connection, for callers that need raw access.
    pub fn connection(&self) -> &'conn Connection {
        self.conn
    }

    fn select_rows<R: Record>(
        &self,
        table: &R::Table,
        condition: Option<&Condition>,
    ) -> QueryResult<Vec<R>> {
        let mut sql = format!("SELECT {} FROM {}", table.select_list(), table.quoted_name());
        let params: &[Value] = match condition {
            Some(condition) => {
                sql.push_str(" WHERE ");
                sql.push_str(condition.sql());
                condition.params()
            }
            None => &[],
        };

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(params.iter()))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(R::from_row(row)?);
        }
        Ok(records)
    }

    /// Runs `write` inside a savepoint. When `write` fails, including when a
    /// returned row cannot be decoded, every change it made is rolled back.
    fn within_savepoint<T>(&self, write: impl FnOnce() -> QueryResult<T>) -> QueryResult<T> {
        self.conn.execute_batch("SAVEPOINT simplerepo_write;")?;
        match write() {
            Ok(value) => {
                self.conn.execute_batch("RELEASE simplerepo_write;")?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = self
                    .conn
                    .execute_batch("ROLLBACK TO simplerepo_write; RELEASE simplerepo_write;")
                {
                    error!(
                        "event=savepoint_rollback module=context status=error error={rollback_err}"
                    );
                }
                Err(err)
            }
        }
    }
}

impl QueryContext for SqliteContext<'_> {
    fn insert_one<R: Record>(&self, table: &R::Table, record: &R) -> QueryResult<R> {
        let started_at = Instant::now();
        let result = self.within_savepoint(|| -> QueryResult<R> {
            let values = record.assigned_values();
            let sql = if values.is_empty() {
                format!(
                    "INSERT INTO {} DEFAULT VALUES RETURNING {};",
                    table.quoted_name(),
                    table.select_list()
                )
            } else {
                let columns = values
                    .iter()
                    .map(|(name, _)| quote_ident(name))
                    .collect::<Vec<_>>()
                    .join(", ");
                let placeholders = vec!["?"; values.len()].join(", ");
                format!(
                    "INSERT INTO {} ({columns}) VALUES ({placeholders}) RETURNING {};",
                    table.quoted_name(),
                    table.select_list()
                )
            };

            let mut stmt = self.conn.prepare(&sql)?;
            let mut rows = stmt.query(params_from_iter(values.into_iter().map(|(_, value)| value)))?;
            let inserted = match rows.next()? {
                Some(row) => Some(R::from_row(row)?),
                None => None,
            };
            inserted.ok_or_else(|| {
                QueryError::InvalidData(format!("insert into `{}` returned no row", table.name()))
            })
        });
        observe("insert_one", table.name(), started_at, result)
    }

    fn fetch_all<R: Record>(&self, table: &R::Table) -> QueryResult<Vec<R>> {
        let started_at = Instant::now();
        let result = self.select_rows(table, None);
        observe("fetch_all", table.name(), started_at, result)
    }

    fn fetch<R: Record>(&self, table: &R::Table, condition: &Condition) -> QueryResult<Vec<R>> {
        let started_at = Instant::now();
        let result = self.select_rows(table, Some(condition));
        observe("fetch", table.name(), started_at, result)
    }

    fn fetch_optional<R: Record>(
        &self,
        table: &R::Table,
        condition: &Condition,
    ) -> QueryResult<Option<R>> {
        let started_at = Instant::now();
        let result = (|| -> QueryResult<Option<R>> {
            let sql = format!(
                "SELECT {} FROM {} WHERE {} LIMIT 2;",
                table.select_list(),
                table.quoted_name(),
                condition.sql()
            );
            let mut stmt = self.conn.prepare(&sql)?;
            let mut rows = stmt.query(params_from_iter(condition.params().iter()))?;

            let record = match rows.next()? {
                Some(row) => R::from_row(row)?,
                None => return Ok(None),
            };
            if rows.next()?.is_some() {
                return Err(QueryError::TooManyRows {
                    table: table.name(),
                });
            }
            Ok(Some(record))
        })();
        observe("fetch_optional", table.name(), started_at, result)
    }

    fn update_one<R: Record>(&self, table: &R::Table, record: &R) -> QueryResult<Option<R>> {
        let started_at = Instant::now();
        let result = self.within_savepoint(|| -> QueryResult<Option<R>> {
            let key = record
                .primary_key_value()
                .ok_or(QueryError::MissingPrimaryKey {
                    table: table.name(),
                })?;
            let key_column = table.primary_key();

            let assignments: Vec<_> = record
                .assigned_values()
                .into_iter()
                .filter(|(name, _)| *name != key_column.name())
                .collect();
            let set_clause = if assignments.is_empty() {
                format!("{0} = {0}", key_column.quoted())
            } else {
                assignments
                    .iter()
                    .map(|(name, _)| format!("{} = ?", quote_ident(name)))
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            let sql = format!(
                "UPDATE {} SET {set_clause} WHERE {} = ? RETURNING {};",
                table.quoted_name(),
                key_column.quoted(),
                table.select_list()
            );

            let params = assignments
                .into_iter()
                .map(|(_, value)| value)
                .chain(std::iter::once(key));
            let mut stmt = self.conn.prepare(&sql)?;
            let mut rows = stmt.query(params_from_iter(params))?;
            let updated = match rows.next()? {
                Some(row) => Some(R::from_row(row)?),
                None => None,
            };
            Ok(updated)
        });
        observe("update_one", table.name(), started_at, result)
    }

    fn delete<T: Table>(&self, table: &T, condition: &Condition) -> QueryResult<usize> {
        let started_at = Instant::now();
        let sql = format!("DELETE FROM {} WHERE {};", table.quoted_name(), condition.sql());
        let result = self
            .conn
            .execute(&sql, params_from_iter(condition.params().iter()))
            .map_err(QueryError::from);
        observe("delete", table.name(), started_at, result)
    }

    fn table_columns(&self, table_name: &str) -> QueryResult<Vec<StoredColumn>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, type, \"notnull\", dflt_value IS NOT NULL, pk
             FROM pragma_table_info(?1) ORDER BY cid;",
        )?;
        let columns = stmt
            .query_map([table_name], |row| {
                Ok(StoredColumn {
                    name: row.get(0)?,
                    declared_type: row.get(1)?,
                    not_null: row.get(2)?,
                    has_default: row.get(3)?,
                    primary_key: row.get::<_, i64>(4)? > 0,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(columns)
    }

    fn schema_version(&self) -> QueryResult<u32> {
        let version = self
            .conn
            .query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
        Ok(version)
    }
}

fn observe<T>(
    op: &'static str,
    table: &str,
    started_at: Instant,
    result: QueryResult<T>,
) -> QueryResult<T> {
    match &result {
        Ok(_) => debug!(
            "event=query module=context op={op} table={table} status=ok duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=query module=context op={op} table={table} status=error duration_ms={} error={err}",
            started_at.elapsed().as_millis()
        ),
    }
    result
}
