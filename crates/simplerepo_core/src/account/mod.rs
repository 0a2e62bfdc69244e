//! Account entity: domain object, table handle, mapping and repository.
//!
//! # Invariants
//! - `ACCOUNT` is the only `account` table handle; every repository instance
//!   shares it.
//! - Email addresses are unique in storage.

mod model;
mod repo;
mod table;

pub use model::{AccountDto, AccountId, IdAlreadyAssigned};
pub use repo::{AccountMapper, AccountRepository};
pub use table::{AccountRecord, AccountTable, ACCOUNT};
