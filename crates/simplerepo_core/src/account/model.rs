//! Account domain object.
//!
//! # Invariants
//! - `id` is `None` until first persistence and, once assigned, never changes
//!   for the lifetime of the instance.
//! - Scalar fields are mutated only through setters.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Stable identifier of an account.
pub type AccountId = Uuid;

/// Raised when a caller tries to replace an already-assigned account id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("account id is already assigned to {current}")]
pub struct IdAlreadyAssigned {
    pub current: AccountId,
}

/// In-memory representation of one account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountDto {
    id: Option<AccountId>,
    user_name: Option<String>,
    email_address: Option<String>,
}

impl AccountDto {
    /// Creates an account whose id will be generated by storage on insert.
    pub fn new(user_name: impl Into<String>, email_address: impl Into<String>) -> Self {
        Self {
            id: None,
            user_name: Some(user_name.into()),
            email_address: Some(email_address.into()),
        }
    }

    /// Creates an account with a caller-assigned id.
    pub fn with_id(
        id: AccountId,
        user_name: impl Into<String>,
        email_address: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(id),
            ..Self::new(user_name, email_address)
        }
    }

    pub(crate) fn from_parts(
        id: Option<AccountId>,
        user_name: Option<String>,
        email_address: Option<String>,
    ) -> Self {
        Self {
            id,
            user_name,
            email_address,
        }
    }

    pub fn id(&self) -> Option<AccountId> {
        self.id
    }

    /// Assigns the id if none is set yet. Re-assigning the same value is a no-op.
    pub fn assign_id(&mut self, id: AccountId) -> Result<(), IdAlreadyAssigned> {
        match self.id {
            Some(current) if current != id => Err(IdAlreadyAssigned { current }),
            _ => {
                self.id = Some(id);
                Ok(())
            }
        }
    }

    pub fn user_name(&self) -> Option<&str> {
        self.user_name.as_deref()
    }

    pub fn set_user_name(&mut self, user_name: impl Into<String>) {
        self.user_name = Some(user_name.into());
    }

    pub fn email_address(&self) -> Option<&str> {
        self.email_address.as_deref()
    }

    pub fn set_email_address(&mut self, email_address: impl Into<String>) {
        self.email_address = Some(email_address.into());
    }
}

#[cfg(test)]
mod tests {
    use super::{AccountDto, IdAlreadyAssigned};
    use uuid::Uuid;

    #[test]
    fn new_account_has_no_id() {
        let account = AccountDto::new("Simon", "simon@x.com");
        assert_eq!(account.id(), None);
        assert_eq!(account.user_name(), Some("Simon"));
        assert_eq!(account.email_address(), Some("simon@x.com"));
    }

    #[test]
    fn assigned_id_cannot_be_replaced() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let mut account = AccountDto::new("Lukas", "lukas@x.com");

        account.assign_id(first).unwrap();
        account.assign_id(first).unwrap();
        let err = account.assign_id(second).unwrap_err();

        assert_eq!(err, IdAlreadyAssigned { current: first });
        assert_eq!(account.id(), Some(first));
    }

    #[test]
    fn setters_replace_scalar_fields() {
        let mut account = AccountDto::default();
        account.set_user_name("Simon");
        account.set_email_address("simon@x.com");
        assert_eq!(account.user_name(), Some("Simon"));
        assert_eq!(account.email_address(), Some("simon@x.com"));
    }

    #[test]
    fn serializes_with_snake_case_fields() {
        let id = Uuid::parse_str("00000000-0000-4000-8000-000000000001").unwrap();
        let account = AccountDto::with_id(id, "Simon", "simon@x.com");
        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["id"], "00000000-0000-4000-8000-000000000001");
        assert_eq!(json["user_name"], "Simon");
        assert_eq!(json["email_address"], "simon@x.com");
    }
}
