//! Storage-level filter conditions.
//!
//! A `Condition` is a rendered SQL boolean fragment plus its bind values.
//! Values are always bound as anonymous `?` parameters, so fragments can be
//! combined in any order without renumbering.

use super::Column;
use rusqlite::types::Value;
use uuid::Uuid;

/// Rendered `WHERE` fragment and the values bound to its placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    sql: String,
    params: Vec<Value>,
}

impl Condition {
    /// Matches every row.
    pub fn all() -> Self {
        Self::raw("1 = 1")
    }

    fn raw(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    fn binary(column: &Column, operator: &str, value: Value) -> Self {
        Self {
            sql: format!("{} {operator} ?", column.quoted()),
            params: vec![value],
        }
    }

    pub fn and(self, other: Condition) -> Self {
        self.combine("AND", other)
    }

    pub fn or(self, other: Condition) -> Self {
        self.combine("OR", other)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Self {
            sql: format!("NOT ({})", self.sql),
            params: self.params,
        }
    }

    fn combine(mut self, keyword: &str, other: Condition) -> Self {
        self.sql = format!("({}) {keyword} ({})", self.sql, other.sql);
        self.params.extend(other.params);
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }
}

impl Column {
    pub fn eq(&self, value: impl SqlParam) -> Condition {
        Condition::binary(self, "=", value.into_sql_value())
    }

    pub fn ne(&self, value: impl SqlParam) -> Condition {
        Condition::binary(self, "<>", value.into_sql_value())
    }

    /// SQL `LIKE` with `%`/`_` wildcards as supplied by the caller.
    pub fn like(&self, pattern: impl SqlParam) -> Condition {
        Condition::binary(self, "LIKE", pattern.into_sql_value())
    }

    pub fn is_null(&self) -> Condition {
        Condition::raw(format!("{} IS NULL", self.quoted()))
    }

    pub fn is_not_null(&self) -> Condition {
        Condition::raw(format!("{} IS NOT NULL", self.quoted()))
    }

    /// Membership test. An empty list matches nothing.
    pub fn in_list<V: SqlParam>(&self, values: impl IntoIterator<Item = V>) -> Condition {
        let params: Vec<Value> = values.into_iter().map(SqlParam::into_sql_value).collect();
        if params.is_empty() {
            return Condition::raw("1 = 0");
        }

        let placeholders = vec!["?"; params.len()].join(", ");
        Condition {
            sql: format!("{} IN ({placeholders})", self.quoted()),
            params,
        }
    }
}

/// Conversion of a Rust scalar into a bind value.
pub trait SqlParam {
    fn into_sql_value(self) -> Value;
}

impl SqlParam for Value {
    fn into_sql_value(self) -> Value {
        self
    }
}

impl SqlParam for &str {
    fn into_sql_value(self) -> Value {
        Value::Text(self.to_string())
    }
}

impl SqlParam for String {
    fn into_sql_value(self) -> Value {
        Value::Text(self)
    }
}

impl SqlParam for &String {
    fn into_sql_value(self) -> Value {
        Value::Text(self.clone())
    }
}

impl SqlParam for Uuid {
    fn into_sql_value(self) -> Value {
        Value::Text(self.to_string())
    }
}

impl SqlParam for i64 {
    fn into_sql_value(self) -> Value {
        Value::Integer(self)
    }
}

impl SqlParam for bool {
    fn into_sql_value(self) -> Value {
        Value::Integer(i64::from(self))
    }
}

impl<T: SqlParam> SqlParam for Option<T> {
    fn into_sql_value(self) -> Value {
        self.map_or(Value::Null, SqlParam::into_sql_value)
    }
}
