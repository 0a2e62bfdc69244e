//! Row schema descriptors and table handles.
//!
//! # Responsibility
//! - Describe a table's name and column set as static, immutable values.
//! - Give predicates typed column handles to build storage-level conditions.
//!
//! # Invariants
//! - One table handle instance per entity type; never mutated after
//!   construction, so it may be shared freely across threads.
//! - Identifiers are always quoted when rendered into SQL.

pub mod condition;

pub use condition::{Condition, SqlParam};

/// Storage type of a column as declared by the migration layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// 128-bit identifier persisted as hyphenated lowercase text.
    Uuid,
    Text,
    Integer,
}

impl ColumnType {
    /// Whether a column declared as `declared` in storage hands back values
    /// of this type, following SQLite's type affinity rules.
    pub fn accepts_declared(self, declared: &str) -> bool {
        let declared = declared.to_ascii_uppercase();
        let integer_affinity = declared.contains("INT");
        let text_affinity = !integer_affinity
            && ["CHAR", "CLOB", "TEXT"]
                .iter()
                .any(|marker| declared.contains(marker));
        match self {
            ColumnType::Uuid | ColumnType::Text => text_affinity,
            ColumnType::Integer => integer_affinity,
        }
    }
}

/// One column of a table handle.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    name: &'static str,
    sql_type: ColumnType,
    nullable: bool,
    primary_key: bool,
    has_default: bool,
}

impl Column {
    /// Declares a nullable column without a storage default.
    pub const fn new(name: &'static str, sql_type: ColumnType) -> Self {
        Self {
            name,
            sql_type,
            nullable: true,
            primary_key: false,
            has_default: false,
        }
    }

    /// Marks the column `NOT NULL`.
    pub const fn required(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Marks the column as the table's primary key (implies `NOT NULL`).
    pub const fn key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    /// Marks the column as filled by storage when an insert leaves it unset.
    pub const fn generated(mut self) -> Self {
        self.has_default = true;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn sql_type(&self) -> ColumnType {
        self.sql_type
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    pub fn has_default(&self) -> bool {
        self.has_default
    }

    pub(crate) fn quoted(&self) -> String {
        quote_ident(self.name)
    }
}

/// Static descriptor of one table: its name and column set.
///
/// Implementors are expected to live in a `static` and be handed to
/// predicates by reference, e.g. `|t: &AccountTable| t.user_name.eq("Simon")`.
pub trait Table: Send + Sync + 'static {
    /// Unquoted table name.
    fn name(&self) -> &'static str;

    /// Every column, in declaration order.
    fn columns(&self) -> Vec<&Column>;

    /// The single-column primary key.
    fn primary_key(&self) -> &Column;

    fn quoted_name(&self) -> String {
        quote_ident(self.name())
    }

    /// Comma-separated, quoted column list in declaration order.
    fn select_list(&self) -> String {
        self.columns()
            .iter()
            .map(|column| column.quoted())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
