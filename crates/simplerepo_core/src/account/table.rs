//! `account` table handle and its record type.

use super::model::AccountId;
use crate::context::QueryError;
use crate::record::Record;
use crate::schema::{Column, ColumnType, SqlParam, Table};
use rusqlite::types::Value;
use rusqlite::Row;
use uuid::Uuid;

/// Column handles of the `account` table.
#[derive(Debug)]
pub struct AccountTable {
    pub id: Column,
    pub user_name: Column,
    pub email_address: Column,
}

/// The one `account` table handle.
pub static ACCOUNT: AccountTable = AccountTable {
    id: Column::new("id", ColumnType::Uuid).key().generated(),
    user_name: Column::new("user_name", ColumnType::Text).required(),
    email_address: Column::new("email_address", ColumnType::Text).required(),
};

impl Table for AccountTable {
    fn name(&self) -> &'static str {
        "account"
    }

    fn columns(&self) -> Vec<&Column> {
        vec![&self.id, &self.user_name, &self.email_address]
    }

    fn primary_key(&self) -> &Column {
        &self.id
    }
}

/// Row of the `account` table. `id == None` means "let storage generate it".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountRecord {
    pub id: Option<AccountId>,
    pub user_name: Option<String>,
    pub email_address: Option<String>,
}

impl Record for AccountRecord {
    type Table = AccountTable;

    fn assigned_values(&self) -> Vec<(&'static str, Value)> {
        let mut values = Vec::with_capacity(3);
        if let Some(id) = self.id {
            values.push((ACCOUNT.id.name(), id.into_sql_value()));
        }
        values.push((
            ACCOUNT.user_name.name(),
            self.user_name.clone().into_sql_value(),
        ));
        values.push((
            ACCOUNT.email_address.name(),
            self.email_address.clone().into_sql_value(),
        ));
        values
    }

    fn primary_key_value(&self) -> Option<Value> {
        self.id.map(SqlParam::into_sql_value)
    }

    fn from_row(row: &Row<'_>) -> Result<Self, QueryError> {
        let id_text: String = row.get(ACCOUNT.id.name())?;
        let id = Uuid::parse_str(&id_text).map_err(|_| {
            QueryError::InvalidData(format!("invalid uuid value `{id_text}` in account.id"))
        })?;

        Ok(Self {
            id: Some(id),
            user_name: row.get(ACCOUNT.user_name.name())?,
            email_address: row.get(ACCOUNT.email_address.name())?,
        })
    }
}
