//! The ledger engine: expense recording, balance calculation and debt
//! minimization over an abstract [`LedgerStore`].
//!
//! The engine holds no state of its own. Balances are recomputed from the
//! full recorded history on every call, so a read always reflects the
//! latest facts in the store.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{
    Expense, NewExpense, NewSettlement, NewShare, Settlement, Transfer,
};
use crate::money::round2;
use crate::store::{LedgerStore, StoreError};

/// Errors surfaced by the ledger engine.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("share total {actual} does not match expense amount {expected}")]
    ShareMismatch { expected: Decimal, actual: Decimal },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The ledger and settlement engine, generic over its storage.
pub struct Ledger<S> {
    store: S,
}

impl<S: LedgerStore> Ledger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Access the underlying store for the plain CRUD operations (users,
    /// groups, memberships) that carry no ledger invariants.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validate and persist an expense together with its shares.
    ///
    /// Shares are rounded to 2 decimal places and must sum exactly to the
    /// rounded expense amount; a mismatch is rejected with both totals and
    /// nothing is persisted. The expense and its shares are written as one
    /// unit through the store.
    pub async fn record_expense(
        &self,
        expense: NewExpense,
        shares: Vec<NewShare>,
    ) -> Result<Expense, LedgerError> {
        if expense.amount <= Decimal::ZERO {
            return Err(LedgerError::Validation(
                "expense amount must be positive".to_string(),
            ));
        }
        if shares.is_empty() {
            return Err(LedgerError::Validation(
                "an expense needs at least one share".to_string(),
            ));
        }
        if !self.store.is_member(&expense.paid_by, expense.group_id).await? {
            return Err(LedgerError::Validation(format!(
                "payer {} is not a member of group {}",
                expense.paid_by, expense.group_id
            )));
        }

        let mut rounded: Vec<NewShare> = Vec::with_capacity(shares.len());
        for share in shares {
            let amount = round2(share.amount);
            if amount < Decimal::ZERO {
                return Err(LedgerError::Validation(format!(
                    "share for {} must not be negative",
                    share.user_id
                )));
            }
            if !self.store.is_member(&share.user_id, expense.group_id).await? {
                return Err(LedgerError::Validation(format!(
                    "share user {} is not a member of group {}",
                    share.user_id, expense.group_id
                )));
            }
            rounded.push(NewShare::new(share.user_id, amount));
        }

        let expected = round2(expense.amount);
        let actual = round2(rounded.iter().map(|s| s.amount).sum());
        if actual != expected {
            return Err(LedgerError::ShareMismatch { expected, actual });
        }

        let expense = NewExpense {
            amount: expected,
            ..expense
        };
        Ok(self.store.create_expense_with_shares(expense, rounded).await?)
    }

    /// Delete an expense and all of its shares.
    pub async fn delete_expense(&self, expense_id: i64) -> Result<(), LedgerError> {
        Ok(self.store.delete_expense_cascade(expense_id).await?)
    }

    /// Record a real-world payment between two members of a group.
    pub async fn record_settlement(
        &self,
        settlement: NewSettlement,
    ) -> Result<Settlement, LedgerError> {
        if settlement.amount <= Decimal::ZERO {
            return Err(LedgerError::Validation(
                "settlement amount must be positive".to_string(),
            ));
        }
        if settlement.from_user_id == settlement.to_user_id {
            return Err(LedgerError::Validation(
                "settlement payer and payee must differ".to_string(),
            ));
        }
        for user_id in [&settlement.from_user_id, &settlement.to_user_id] {
            if !self.store.is_member(user_id, settlement.group_id).await? {
                return Err(LedgerError::Validation(format!(
                    "{} is not a member of group {}",
                    user_id, settlement.group_id
                )));
            }
        }
        let settlement = NewSettlement {
            amount: round2(settlement.amount),
            ..settlement
        };
        Ok(self.store.create_settlement(settlement).await?)
    }

    /// A user's net position in one group.
    ///
    /// Positive means the user is owed money, negative means the user owes.
    /// Computed from the full history on every call; an unknown user or
    /// group simply has nothing attributed to it and comes back as zero.
    pub async fn balance_in_group(
        &self,
        user_id: &str,
        group_id: i64,
    ) -> Result<Decimal, LedgerError> {
        let mut balance = Decimal::ZERO;

        for expense in self.store.get_group_expenses(group_id).await? {
            if expense.paid_by == user_id {
                balance += expense.amount;
            }
            let shares = self.store.get_expense_shares(expense.id).await?;
            if let Some(share) = shares.iter().find(|s| s.user_id == user_id) {
                balance -= share.amount;
            }
        }

        for settlement in self.store.get_group_settlements(group_id).await? {
            if settlement.from_user_id == user_id {
                balance -= settlement.amount;
            }
            if settlement.to_user_id == user_id {
                balance += settlement.amount;
            }
        }

        Ok(round2(balance))
    }

    /// A user's aggregate position across all groups they belong to.
    pub async fn total_balance(&self, user_id: &str) -> Result<Decimal, LedgerError> {
        let mut total = Decimal::ZERO;
        for group in self.store.get_user_groups(user_id).await? {
            total += self.balance_in_group(user_id, group.id).await?;
        }
        Ok(round2(total))
    }

    /// Compute a transfer plan that clears every member's balance.
    ///
    /// Greedy matching of the largest creditor against the largest debtor:
    /// not guaranteed to be the theoretical minimum number of transfers,
    /// but terminates in at most members - 1 of them and fully clears the
    /// group. Ties keep the store's member order, so the plan is
    /// deterministic for a given history.
    pub async fn settle_group(&self, group_id: i64) -> Result<Vec<Transfer>, LedgerError> {
        let members = self.store.get_members(group_id).await?;

        let mut creditors: Vec<(String, Decimal)> = Vec::new();
        let mut debtors: Vec<(String, Decimal)> = Vec::new();
        for member in &members {
            let balance = self.balance_in_group(&member.user_id, group_id).await?;
            if balance > Decimal::ZERO {
                creditors.push((member.user_id.clone(), balance));
            } else if balance < Decimal::ZERO {
                debtors.push((member.user_id.clone(), -balance));
            }
        }

        creditors.sort_by(|a, b| b.1.cmp(&a.1));
        debtors.sort_by(|a, b| b.1.cmp(&a.1));

        let mut transfers = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < creditors.len() && j < debtors.len() {
            let amount = creditors[i].1.min(debtors[j].1);
            transfers.push(Transfer {
                from_user_id: debtors[j].0.clone(),
                to_user_id: creditors[i].0.clone(),
                amount,
            });
            creditors[i].1 -= amount;
            debtors[j].1 -= amount;
            if creditors[i].1.is_zero() {
                i += 1;
            }
            if debtors[j].1.is_zero() {
                j += 1;
            }
        }

        Ok(transfers)
    }
}
