use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::database::models::{Budget, Expense, User};
use crate::database::store::{BudgetPatch, ExpenseChanges, Store, StoreError};

/// In-memory persistence gateway. Backs the integration tests and local
/// experiments; carries exactly the same per-owner uniqueness policy as
/// the Postgres implementation.
#[derive(Default)]
pub struct MemStore {
    users: RwLock<HashMap<String, User>>,
    budgets: RwLock<Vec<Budget>>,
    expenses: RwLock<Vec<Expense>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemStore {
    async fn find_user_by_account(&self, account: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(account).cloned())
    }

    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.account) {
            return Err(StoreError::Duplicate(user.account.clone()));
        }
        users.insert(user.account.clone(), user.clone());
        Ok(())
    }

    async fn budgets_for_owner(&self, owner: &str) -> Result<Vec<Budget>, StoreError> {
        Ok(self
            .budgets
            .read()
            .await
            .iter()
            .filter(|b| b.owner_account == owner)
            .cloned()
            .collect())
    }

    async fn insert_budget(&self, budget: &Budget) -> Result<(), StoreError> {
        let mut budgets = self.budgets.write().await;
        if budgets
            .iter()
            .any(|b| b.owner_account == budget.owner_account && b.id == budget.id)
        {
            return Err(StoreError::Duplicate(budget.id.clone()));
        }
        budgets.push(budget.clone());
        Ok(())
    }

    async fn update_budget(
        &self,
        owner: &str,
        budget_id: &str,
        patch: &BudgetPatch,
    ) -> Result<u64, StoreError> {
        if patch.is_noop() {
            return Ok(0);
        }
        let mut budgets = self.budgets.write().await;
        let mut updated = 0;
        if let Some(budget) = budgets
            .iter_mut()
            .find(|b| b.owner_account == owner && b.id == budget_id)
        {
            if let Some(name) = &patch.name {
                budget.name = name.clone();
            }
            if let Some(max) = patch.max {
                budget.max = max;
            }
            updated = 1;
        }
        Ok(updated)
    }

    async fn delete_budget(&self, owner: &str, budget_id: &str) -> Result<u64, StoreError> {
        let mut budgets = self.budgets.write().await;
        let before = budgets.len();
        budgets.retain(|b| !(b.owner_account == owner && b.id == budget_id));
        Ok((before - budgets.len()) as u64)
    }

    async fn expenses_for_owner(&self, owner: &str) -> Result<Vec<Expense>, StoreError> {
        Ok(self
            .expenses
            .read()
            .await
            .iter()
            .filter(|e| e.owner_account == owner)
            .cloned()
            .collect())
    }

    async fn insert_expense(&self, expense: &Expense) -> Result<(), StoreError> {
        let mut expenses = self.expenses.write().await;
        if expenses
            .iter()
            .any(|e| e.owner_account == expense.owner_account && e.id == expense.id)
        {
            return Err(StoreError::Duplicate(expense.id.clone()));
        }
        expenses.push(expense.clone());
        Ok(())
    }

    async fn update_expense(
        &self,
        owner: &str,
        expense_id: &str,
        changes: &ExpenseChanges,
    ) -> Result<u64, StoreError> {
        let mut expenses = self.expenses.write().await;
        let mut updated = 0;
        if let Some(expense) = expenses
            .iter_mut()
            .find(|e| e.owner_account == owner && e.id == expense_id)
        {
            expense.budget_id = changes.budget_id.clone();
            expense.description = changes.description.clone();
            expense.amount = changes.amount;
            updated = 1;
        }
        Ok(updated)
    }

    async fn delete_expense(&self, owner: &str, expense_id: &str) -> Result<u64, StoreError> {
        let mut expenses = self.expenses.write().await;
        let before = expenses.len();
        expenses.retain(|e| !(e.owner_account == owner && e.id == expense_id));
        Ok((before - expenses.len()) as u64)
    }

    async fn delete_expenses_for_budget(
        &self,
        owner: &str,
        budget_id: &str,
    ) -> Result<u64, StoreError> {
        let mut expenses = self.expenses.write().await;
        let before = expenses.len();
        expenses.retain(|e| !(e.owner_account == owner && e.budget_id == budget_id));
        Ok((before - expenses.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn budget(owner: &str, id: &str) -> Budget {
        Budget {
            id: id.into(),
            name: id.into(),
            max: 100,
            owner_account: owner.into(),
        }
    }

    fn expense(owner: &str, id: &str, budget_id: &str) -> Expense {
        Expense {
            id: id.into(),
            budget_id: budget_id.into(),
            description: "desc".into(),
            amount: 10,
            date: 1_700_000_000,
            owner_account: owner.into(),
        }
    }

    #[tokio::test]
    async fn queries_never_cross_owner_scopes() {
        let store = MemStore::new();
        store.insert_budget(&budget("alice", "food")).await.unwrap();
        store.insert_budget(&budget("bob", "food")).await.unwrap();
        store.insert_expense(&expense("alice", "e1", "food")).await.unwrap();
        store.insert_expense(&expense("bob", "e2", "food")).await.unwrap();

        let budgets = store.budgets_for_owner("alice").await.unwrap();
        assert!(budgets.iter().all(|b| b.owner_account == "alice"));
        assert_eq!(budgets.len(), 1);

        let expenses = store.expenses_for_owner("bob").await.unwrap();
        assert!(expenses.iter().all(|e| e.owner_account == "bob"));
        assert_eq!(expenses.len(), 1);

        // a delete scoped to the wrong owner touches nothing
        assert_eq!(store.delete_expense("alice", "e2").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn duplicate_ids_are_rejected_within_owner_scope() {
        let store = MemStore::new();
        store.insert_budget(&budget("alice", "food")).await.unwrap();
        let err = store.insert_budget(&budget("alice", "food")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));

        // same id under another owner is fine
        store.insert_budget(&budget("bob", "food")).await.unwrap();
    }

    #[tokio::test]
    async fn cascade_removes_only_matching_expenses() {
        let store = MemStore::new();
        store.insert_expense(&expense("alice", "e1", "food")).await.unwrap();
        store.insert_expense(&expense("alice", "e2", "food")).await.unwrap();
        store.insert_expense(&expense("alice", "e3", "rent")).await.unwrap();
        store.insert_expense(&expense("bob", "e4", "food")).await.unwrap();

        let removed = store.delete_expenses_for_budget("alice", "food").await.unwrap();
        assert_eq!(removed, 2);

        let remaining = store.expenses_for_owner("alice").await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, "e3");
        assert_eq!(store.expenses_for_owner("bob").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn noop_patch_changes_nothing() {
        let store = MemStore::new();
        store.insert_budget(&budget("alice", "food")).await.unwrap();

        let updated = store
            .update_budget("alice", "food", &BudgetPatch::default())
            .await
            .unwrap();
        assert_eq!(updated, 0);

        let stored = &store.budgets_for_owner("alice").await.unwrap()[0];
        assert_eq!(stored.name, "food");
        assert_eq!(stored.max, 100);
    }
}
