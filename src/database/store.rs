use async_trait::async_trait;
use thiserror::Error;

use crate::database::models::{Budget, Expense, User};

/// Errors from the persistence gateway
#[derive(Debug, Error)]
pub enum StoreError {
    /// Caller-supplied id collides with an existing document in the same
    /// owner scope. Handlers report this in-band, not as a 500.
    #[error("Duplicate id: {0}")]
    Duplicate(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Optional-field patch for budget updates. `None` means "don't change".
#[derive(Debug, Clone, Default)]
pub struct BudgetPatch {
    pub name: Option<String>,
    pub max: Option<i64>,
}

impl BudgetPatch {
    pub fn is_noop(&self) -> bool {
        self.name.is_none() && self.max.is_none()
    }
}

/// Full replacement of an expense's mutable fields.
#[derive(Debug, Clone)]
pub struct ExpenseChanges {
    pub budget_id: String,
    pub description: String,
    pub amount: i64,
}

/// Persistence gateway over the three collections (users, budgets,
/// expenses). Every budget/expense operation is scoped by the owner's
/// account in the query itself, so cross-account reads or writes are
/// impossible by construction.
#[async_trait]
pub trait Store: Send + Sync {
    // users
    async fn find_user_by_account(&self, account: &str) -> Result<Option<User>, StoreError>;
    async fn insert_user(&self, user: &User) -> Result<(), StoreError>;

    // budgets
    async fn budgets_for_owner(&self, owner: &str) -> Result<Vec<Budget>, StoreError>;
    async fn insert_budget(&self, budget: &Budget) -> Result<(), StoreError>;
    /// Returns the number of budgets updated (0 or 1).
    async fn update_budget(
        &self,
        owner: &str,
        budget_id: &str,
        patch: &BudgetPatch,
    ) -> Result<u64, StoreError>;
    /// Returns the number of budgets deleted (0 or 1).
    async fn delete_budget(&self, owner: &str, budget_id: &str) -> Result<u64, StoreError>;

    // expenses
    async fn expenses_for_owner(&self, owner: &str) -> Result<Vec<Expense>, StoreError>;
    async fn insert_expense(&self, expense: &Expense) -> Result<(), StoreError>;
    /// Returns the number of expenses updated (0 or 1).
    async fn update_expense(
        &self,
        owner: &str,
        expense_id: &str,
        changes: &ExpenseChanges,
    ) -> Result<u64, StoreError>;
    /// Returns the number of expenses deleted (0 or 1).
    async fn delete_expense(&self, owner: &str, expense_id: &str) -> Result<u64, StoreError>;
    /// Cascade leg of budget deletion: removes every expense referencing
    /// `budget_id` in the owner's scope and returns how many went away.
    async fn delete_expenses_for_budget(
        &self,
        owner: &str,
        budget_id: &str,
    ) -> Result<u64, StoreError>;
}
