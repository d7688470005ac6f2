//! Divvy Core Library
//!
//! Shared types and ledger logic for Divvy applications.
//!
//! The engine turns a stream of recorded expenses, per-person shares and
//! settlement payments into net balances and a transfer plan that clears a
//! group. Storage is abstract: the [`Ledger`] engine works against any
//! [`LedgerStore`] implementation.

pub mod ledger;
pub mod memory;
pub mod models;
pub mod money;
pub mod store;

pub use ledger::{Ledger, LedgerError};
pub use memory::MemoryStore;
pub use models::{
    equal_split, Expense, ExpenseShare, Group, GroupType, Member, NewExpense, NewGroup, NewMember,
    NewSettlement, NewShare, NewUser, Settlement, SplitType, Transfer, User,
};
pub use money::round2;
pub use store::{LedgerStore, StoreError};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
