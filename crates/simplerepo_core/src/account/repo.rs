//! Account mapping contract and entity-specific repository.

use super::model::{AccountDto, AccountId};
use super::table::{AccountRecord, AccountTable, ACCOUNT};
use crate::context::QueryContext;
use crate::record::RecordMapper;
use crate::repo::{RepoResult, SimpleRepository};

/// Maps `AccountDto` to and from `AccountRecord`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccountMapper;

impl RecordMapper for AccountMapper {
    type Dto = AccountDto;
    type Table = AccountTable;
    type Record = AccountRecord;

    fn table(&self) -> &'static AccountTable {
        &ACCOUNT
    }

    fn to_record(&self, dto: &AccountDto) -> AccountRecord {
        AccountRecord {
            id: dto.id(),
            user_name: dto.user_name().map(str::to_owned),
            email_address: dto.email_address().map(str::to_owned),
        }
    }

    fn from_record(&self, record: AccountRecord) -> AccountDto {
        AccountDto::from_parts(record.id, record.user_name, record.email_address)
    }
}

/// Account persistence API over any query context.
pub struct AccountRepository<'ctx, C: QueryContext> {
    inner: SimpleRepository<'ctx, C, AccountMapper>,
}

impl<'ctx, C: QueryContext> AccountRepository<'ctx, C> {
    pub fn new(ctx: &'ctx C) -> Self {
        Self {
            inner: SimpleRepository::new(ctx, AccountMapper),
        }
    }

    /// Constructs a repository after checking the connection is migrated and
    /// the `account` table has every expected column.
    pub fn try_new(ctx: &'ctx C) -> RepoResult<Self> {
        Ok(Self {
            inner: SimpleRepository::try_new(ctx, AccountMapper)?,
        })
    }

    /// Inserts a new account and returns it with its stored id.
    pub fn save_account(&self, account: &AccountDto) -> RepoResult<AccountDto> {
        self.inner.create_one(account)
    }

    /// Lists every account in storage order.
    pub fn get_accounts(&self) -> RepoResult<Vec<AccountDto>> {
        self.inner.read_all()
    }

    pub fn find_account(&self, id: AccountId) -> RepoResult<Option<AccountDto>> {
        self.inner.read_one(|t| t.id.eq(id))
    }

    /// Email addresses are unique in storage, so at most one row can match.
    pub fn find_account_by_email(&self, email_address: &str) -> RepoResult<Option<AccountDto>> {
        self.inner.read_one(|t| t.email_address.eq(email_address))
    }

    pub fn find_accounts_by_user_name(&self, user_name: &str) -> RepoResult<Vec<AccountDto>> {
        self.inner.read_many(|t| t.user_name.eq(user_name))
    }

    /// Overwrites the stored account carrying `account.id()`.
    pub fn update_account(&self, account: &AccountDto) -> RepoResult<AccountDto> {
        self.inner.update_one(account)
    }

    /// Returns whether a row was removed.
    pub fn delete_account(&self, id: AccountId) -> RepoResult<bool> {
        Ok(self.inner.delete_many(|t| t.id.eq(id))? > 0)
    }

    pub fn delete_accounts_by_user_name(&self, user_name: &str) -> RepoResult<usize> {
        self.inner.delete_many(|t| t.user_name.eq(user_name))
    }

    /// The generic repository, for queries without a named method.
    pub fn generic(&self) -> &SimpleRepository<'ctx, C, AccountMapper> {
        &self.inner
    }
}
