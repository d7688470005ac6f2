//! In-memory [`LedgerStore`] implementation.
//!
//! Keeps every entity in id-keyed maps behind one mutex, with monotonically
//! increasing counters standing in for database row ids. Iteration order is
//! id order, so listings come back in insertion order. Useful on its own
//! for ephemeral setups and as the test harness for the engine.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::models::{
    Expense, ExpenseShare, Group, Member, NewExpense, NewGroup, NewMember, NewSettlement, NewShare,
    NewUser, Settlement, User,
};
use crate::store::{LedgerStore, StoreError};

#[derive(Default)]
struct Inner {
    users: BTreeMap<String, User>,
    groups: BTreeMap<i64, Group>,
    members: BTreeMap<i64, Member>,
    expenses: BTreeMap<i64, Expense>,
    shares: BTreeMap<i64, ExpenseShare>,
    settlements: BTreeMap<i64, Settlement>,

    next_group_id: i64,
    next_member_id: i64,
    next_expense_id: i64,
    next_share_id: i64,
    next_settlement_id: i64,
}

impl Inner {
    fn new() -> Self {
        Self {
            next_group_id: 1,
            next_member_id: 1,
            next_expense_id: 1,
            next_share_id: 1,
            next_settlement_id: 1,
            ..Default::default()
        }
    }

    fn add_member(&mut self, member: NewMember) -> Result<Member, StoreError> {
        let duplicate = self
            .members
            .values()
            .any(|m| m.group_id == member.group_id && m.user_id == member.user_id);
        if duplicate {
            return Err(StoreError::Conflict(format!(
                "user {} is already a member of group {}",
                member.user_id, member.group_id
            )));
        }
        let id = self.next_member_id;
        self.next_member_id += 1;
        let member = Member {
            id,
            group_id: member.group_id,
            user_id: member.user_id,
            joined_at: Utc::now(),
        };
        self.members.insert(id, member.clone());
        Ok(member)
    }
}

pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::new()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // Keep serving after a panicked writer; the maps are still valid.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn get_user(&self, id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.lock().users.get(id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut inner = self.lock();
        if inner.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict(format!(
                "email {} is already registered",
                user.email
            )));
        }
        let user = User {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
            photo_url: user.photo_url,
            created_at: Utc::now(),
        };
        inner.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: &str, display_name: &str) -> Result<User, StoreError> {
        let mut inner = self.lock();
        let user = inner
            .users
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found("user", id))?;
        user.display_name = display_name.to_string();
        Ok(user.clone())
    }

    async fn create_group(&self, group: NewGroup) -> Result<Group, StoreError> {
        let mut inner = self.lock();
        if inner.groups.values().any(|g| g.code == group.code) {
            return Err(StoreError::Conflict(format!(
                "group code {} is already in use",
                group.code
            )));
        }
        let id = inner.next_group_id;
        inner.next_group_id += 1;
        let group = Group {
            id,
            name: group.name,
            group_type: group.group_type,
            code: group.code,
            created_by: group.created_by,
            created_at: Utc::now(),
        };
        inner.groups.insert(id, group.clone());
        inner.add_member(NewMember::new(id, group.created_by.clone()))?;
        Ok(group)
    }

    async fn get_group(&self, id: i64) -> Result<Option<Group>, StoreError> {
        Ok(self.lock().groups.get(&id).cloned())
    }

    async fn get_group_by_code(&self, code: &str) -> Result<Option<Group>, StoreError> {
        Ok(self
            .lock()
            .groups
            .values()
            .find(|g| g.code == code)
            .cloned())
    }

    async fn get_user_groups(&self, user_id: &str) -> Result<Vec<Group>, StoreError> {
        let inner = self.lock();
        Ok(inner
            .members
            .values()
            .filter(|m| m.user_id == user_id)
            .filter_map(|m| inner.groups.get(&m.group_id).cloned())
            .collect())
    }

    async fn add_member(&self, member: NewMember) -> Result<Member, StoreError> {
        self.lock().add_member(member)
    }

    async fn get_members(&self, group_id: i64) -> Result<Vec<Member>, StoreError> {
        Ok(self
            .lock()
            .members
            .values()
            .filter(|m| m.group_id == group_id)
            .cloned()
            .collect())
    }

    async fn is_member(&self, user_id: &str, group_id: i64) -> Result<bool, StoreError> {
        Ok(self
            .lock()
            .members
            .values()
            .any(|m| m.group_id == group_id && m.user_id == user_id))
    }

    async fn create_expense_with_shares(
        &self,
        expense: NewExpense,
        shares: Vec<NewShare>,
    ) -> Result<Expense, StoreError> {
        let mut inner = self.lock();
        let id = inner.next_expense_id;
        inner.next_expense_id += 1;
        let expense = Expense {
            id,
            group_id: expense.group_id,
            title: expense.title,
            amount: expense.amount,
            paid_by: expense.paid_by,
            split_type: expense.split_type,
            created_by: expense.created_by,
            created_at: Utc::now(),
        };
        inner.expenses.insert(id, expense.clone());
        for share in shares {
            let share_id = inner.next_share_id;
            inner.next_share_id += 1;
            inner.shares.insert(
                share_id,
                ExpenseShare {
                    id: share_id,
                    expense_id: id,
                    user_id: share.user_id,
                    amount: share.amount,
                },
            );
        }
        Ok(expense)
    }

    async fn get_expense(&self, id: i64) -> Result<Option<Expense>, StoreError> {
        Ok(self.lock().expenses.get(&id).cloned())
    }

    async fn get_expense_shares(&self, expense_id: i64) -> Result<Vec<ExpenseShare>, StoreError> {
        Ok(self
            .lock()
            .shares
            .values()
            .filter(|s| s.expense_id == expense_id)
            .cloned()
            .collect())
    }

    async fn get_group_expenses(&self, group_id: i64) -> Result<Vec<Expense>, StoreError> {
        Ok(self
            .lock()
            .expenses
            .values()
            .filter(|e| e.group_id == group_id)
            .cloned()
            .collect())
    }

    async fn get_user_expenses(&self, user_id: &str) -> Result<Vec<Expense>, StoreError> {
        let inner = self.lock();
        let group_ids: Vec<i64> = inner
            .members
            .values()
            .filter(|m| m.user_id == user_id)
            .map(|m| m.group_id)
            .collect();
        Ok(inner
            .expenses
            .values()
            .filter(|e| group_ids.contains(&e.group_id))
            .cloned()
            .collect())
    }

    async fn update_expense(&self, id: i64, title: &str) -> Result<Expense, StoreError> {
        let mut inner = self.lock();
        let expense = inner
            .expenses
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("expense", id))?;
        expense.title = title.to_string();
        Ok(expense.clone())
    }

    async fn delete_expense_cascade(&self, id: i64) -> Result<(), StoreError> {
        let mut inner = self.lock();
        if inner.expenses.remove(&id).is_none() {
            return Err(StoreError::not_found("expense", id));
        }
        inner.shares.retain(|_, s| s.expense_id != id);
        Ok(())
    }

    async fn create_settlement(
        &self,
        settlement: NewSettlement,
    ) -> Result<Settlement, StoreError> {
        let mut inner = self.lock();
        let id = inner.next_settlement_id;
        inner.next_settlement_id += 1;
        let settlement = Settlement {
            id,
            group_id: settlement.group_id,
            from_user_id: settlement.from_user_id,
            to_user_id: settlement.to_user_id,
            amount: settlement.amount,
            note: settlement.note,
            created_at: Utc::now(),
        };
        inner.settlements.insert(id, settlement.clone());
        Ok(settlement)
    }

    async fn get_group_settlements(&self, group_id: i64) -> Result<Vec<Settlement>, StoreError> {
        Ok(self
            .lock()
            .settlements
            .values()
            .filter(|s| s.group_id == group_id)
            .cloned()
            .collect())
    }

    async fn get_user_settlements(&self, user_id: &str) -> Result<Vec<Settlement>, StoreError> {
        Ok(self
            .lock()
            .settlements
            .values()
            .filter(|s| s.from_user_id == user_id || s.to_user_id == user_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GroupType;
    use rust_decimal_macros::dec;

    async fn seed_group(store: &MemoryStore) -> Group {
        store
            .create_user(NewUser::new("u1", "ada@example.com", "Ada"))
            .await
            .unwrap();
        store
            .create_group(NewGroup::new("Flat", GroupType::Home, "ABC123", "u1"))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_group_adds_creator_membership() {
        let store = MemoryStore::new();
        let group = seed_group(&store).await;

        assert!(store.is_member("u1", group.id).await.unwrap());
        let members = store.get_members(group.id).await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].user_id, "u1");
    }

    #[tokio::test]
    async fn test_duplicate_member_rejected() {
        let store = MemoryStore::new();
        let group = seed_group(&store).await;

        let err = store
            .add_member(NewMember::new(group.id, "u1"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryStore::new();
        store
            .create_user(NewUser::new("u1", "ada@example.com", "Ada"))
            .await
            .unwrap();
        let err = store
            .create_user(NewUser::new("u2", "ada@example.com", "Other Ada"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_duplicate_group_code_rejected() {
        let store = MemoryStore::new();
        seed_group(&store).await;
        let err = store
            .create_group(NewGroup::new("Other", GroupType::Trip, "ABC123", "u1"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_expense_cascade_delete_removes_shares() {
        let store = MemoryStore::new();
        let group = seed_group(&store).await;

        let expense = store
            .create_expense_with_shares(
                NewExpense::new(group.id, "Groceries", dec!(30.00), "u1", "u1"),
                vec![NewShare::new("u1", dec!(30.00))],
            )
            .await
            .unwrap();

        assert_eq!(store.get_expense_shares(expense.id).await.unwrap().len(), 1);
        store.delete_expense_cascade(expense.id).await.unwrap();
        assert!(store.get_expense(expense.id).await.unwrap().is_none());
        assert!(store.get_expense_shares(expense.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_unknown_expense_is_not_found() {
        let store = MemoryStore::new();
        let err = store.delete_expense_cascade(99).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_get_user_expenses_spans_groups() {
        let store = MemoryStore::new();
        let group = seed_group(&store).await;
        let other = store
            .create_group(NewGroup::new("Trip", GroupType::Trip, "TRIP01", "u1"))
            .await
            .unwrap();

        for (g, title) in [(group.id, "Rent"), (other.id, "Hotel")] {
            store
                .create_expense_with_shares(
                    NewExpense::new(g, title, dec!(10.00), "u1", "u1"),
                    vec![NewShare::new("u1", dec!(10.00))],
                )
                .await
                .unwrap();
        }

        let expenses = store.get_user_expenses("u1").await.unwrap();
        assert_eq!(expenses.len(), 2);
    }

    #[tokio::test]
    async fn test_update_expense_retitles_only() {
        let store = MemoryStore::new();
        let group = seed_group(&store).await;
        let expense = store
            .create_expense_with_shares(
                NewExpense::new(group.id, "Groseries", dec!(12.00), "u1", "u1"),
                vec![NewShare::new("u1", dec!(12.00))],
            )
            .await
            .unwrap();

        let updated = store.update_expense(expense.id, "Groceries").await.unwrap();
        assert_eq!(updated.title, "Groceries");
        assert_eq!(updated.amount, dec!(12.00));
    }
}
