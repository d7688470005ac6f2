//! Abstract data access for the ledger.
//!
//! The engine never talks to a database directly; it goes through
//! [`LedgerStore`], which a storage binding implements (SQLite in the
//! application crate, [`crate::MemoryStore`] here). Implementations must
//! make each call atomic: `create_group` adds the creator's membership in
//! the same unit of work, `create_expense_with_shares` persists the expense
//! and every share all-or-nothing, and `delete_expense_cascade` never
//! leaves orphan shares behind.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    Expense, ExpenseShare, Group, Member, NewExpense, NewGroup, NewMember, NewSettlement, NewShare,
    NewUser, Settlement, User,
};

/// Errors surfaced by a [`LedgerStore`] implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        StoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        StoreError::Backend(Box::new(err))
    }
}

#[async_trait]
pub trait LedgerStore: Send + Sync {
    // User operations
    async fn get_user(&self, id: &str) -> Result<Option<User>, StoreError>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;
    async fn update_user(&self, id: &str, display_name: &str) -> Result<User, StoreError>;

    // Group operations
    /// Creates the group and adds the creator as its first member, atomically.
    async fn create_group(&self, group: NewGroup) -> Result<Group, StoreError>;
    async fn get_group(&self, id: i64) -> Result<Option<Group>, StoreError>;
    async fn get_group_by_code(&self, code: &str) -> Result<Option<Group>, StoreError>;
    async fn get_user_groups(&self, user_id: &str) -> Result<Vec<Group>, StoreError>;

    // Membership operations
    /// Rejects a duplicate (group, user) pair with [`StoreError::Conflict`].
    async fn add_member(&self, member: NewMember) -> Result<Member, StoreError>;
    async fn get_members(&self, group_id: i64) -> Result<Vec<Member>, StoreError>;
    async fn is_member(&self, user_id: &str, group_id: i64) -> Result<bool, StoreError>;

    // Expense operations
    /// Persists the expense and all its shares as one unit; if any share
    /// write fails the expense must not remain visible.
    async fn create_expense_with_shares(
        &self,
        expense: NewExpense,
        shares: Vec<NewShare>,
    ) -> Result<Expense, StoreError>;
    async fn get_expense(&self, id: i64) -> Result<Option<Expense>, StoreError>;
    async fn get_expense_shares(&self, expense_id: i64) -> Result<Vec<ExpenseShare>, StoreError>;
    async fn get_group_expenses(&self, group_id: i64) -> Result<Vec<Expense>, StoreError>;
    async fn get_user_expenses(&self, user_id: &str) -> Result<Vec<Expense>, StoreError>;
    /// Retitles an expense. Amounts are immutable here: changing an amount
    /// without its shares would break the share-sum invariant.
    async fn update_expense(&self, id: i64, title: &str) -> Result<Expense, StoreError>;
    /// Deletes the expense and all its shares; [`StoreError::NotFound`] for
    /// an unknown id.
    async fn delete_expense_cascade(&self, id: i64) -> Result<(), StoreError>;

    // Settlement operations
    async fn create_settlement(&self, settlement: NewSettlement)
        -> Result<Settlement, StoreError>;
    async fn get_group_settlements(&self, group_id: i64) -> Result<Vec<Settlement>, StoreError>;
    async fn get_user_settlements(&self, user_id: &str) -> Result<Vec<Settlement>, StoreError>;
}
