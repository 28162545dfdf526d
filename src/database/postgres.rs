use std::time::Duration;

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::database::models::{Budget, Expense, User};
use crate::database::store::{BudgetPatch, ExpenseChanges, Store, StoreError};

/// sqlx-backed persistence gateway. One pool, three tables, exact-match
/// queries and scalar field updates only.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(url: &str, config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect(url)
            .await?;

        info!("connected to database");
        Ok(Self { pool })
    }

    /// Connect using the DATABASE_URL environment variable.
    pub async fn connect_from_env(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let url = std::env::var("DATABASE_URL")
            .map_err(|_| StoreError::QueryError("DATABASE_URL is not set".to_string()))?;
        Self::connect(&url, config).await
    }

    /// Create the backing tables if they do not exist yet. The composite
    /// (owner, id) primary keys are what enforces the per-owner id
    /// uniqueness policy.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                account          TEXT PRIMARY KEY,
                name             TEXT NOT NULL,
                password_digest  TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS budgets (
                owner_account  TEXT NOT NULL,
                id             TEXT NOT NULL,
                name           TEXT NOT NULL,
                "max"          BIGINT NOT NULL,
                PRIMARY KEY (owner_account, id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS expenses (
                owner_account  TEXT NOT NULL,
                id             TEXT NOT NULL,
                budget_id      TEXT NOT NULL,
                description    TEXT NOT NULL,
                amount         BIGINT NOT NULL,
                date           BIGINT NOT NULL,
                PRIMARY KEY (owner_account, id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn map_insert_err(err: sqlx::Error, id: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::Duplicate(id.to_string())
        }
        _ => StoreError::Sqlx(err),
    }
}

#[async_trait]
impl Store for PgStore {
    async fn find_user_by_account(&self, account: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT account, name, password_digest FROM users WHERE account = $1",
        )
        .bind(account)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO users (account, name, password_digest) VALUES ($1, $2, $3)")
            .bind(&user.account)
            .bind(&user.name)
            .bind(&user.password_digest)
            .execute(&self.pool)
            .await
            .map_err(|e| map_insert_err(e, &user.account))?;

        Ok(())
    }

    async fn budgets_for_owner(&self, owner: &str) -> Result<Vec<Budget>, StoreError> {
        let budgets = sqlx::query_as::<_, Budget>(
            r#"SELECT id, name, "max", owner_account FROM budgets WHERE owner_account = $1"#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(budgets)
    }

    async fn insert_budget(&self, budget: &Budget) -> Result<(), StoreError> {
        sqlx::query(
            r#"INSERT INTO budgets (owner_account, id, name, "max") VALUES ($1, $2, $3, $4)"#,
        )
        .bind(&budget.owner_account)
        .bind(&budget.id)
        .bind(&budget.name)
        .bind(budget.max)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_err(e, &budget.id))?;

        Ok(())
    }

    async fn update_budget(
        &self,
        owner: &str,
        budget_id: &str,
        patch: &BudgetPatch,
    ) -> Result<u64, StoreError> {
        let result = match (&patch.name, patch.max) {
            (None, None) => return Ok(0),
            (Some(name), None) => {
                sqlx::query("UPDATE budgets SET name = $3 WHERE owner_account = $1 AND id = $2")
                    .bind(owner)
                    .bind(budget_id)
                    .bind(name)
                    .execute(&self.pool)
                    .await?
            }
            (None, Some(max)) => {
                sqlx::query(r#"UPDATE budgets SET "max" = $3 WHERE owner_account = $1 AND id = $2"#)
                    .bind(owner)
                    .bind(budget_id)
                    .bind(max)
                    .execute(&self.pool)
                    .await?
            }
            (Some(name), Some(max)) => sqlx::query(
                r#"UPDATE budgets SET name = $3, "max" = $4 WHERE owner_account = $1 AND id = $2"#,
            )
            .bind(owner)
            .bind(budget_id)
            .bind(name)
            .bind(max)
            .execute(&self.pool)
            .await?,
        };

        Ok(result.rows_affected())
    }

    async fn delete_budget(&self, owner: &str, budget_id: &str) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM budgets WHERE owner_account = $1 AND id = $2")
            .bind(owner)
            .bind(budget_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn expenses_for_owner(&self, owner: &str) -> Result<Vec<Expense>, StoreError> {
        let expenses = sqlx::query_as::<_, Expense>(
            "SELECT id, budget_id, description, amount, date, owner_account
             FROM expenses WHERE owner_account = $1",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(expenses)
    }

    async fn insert_expense(&self, expense: &Expense) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO expenses (owner_account, id, budget_id, description, amount, date)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&expense.owner_account)
        .bind(&expense.id)
        .bind(&expense.budget_id)
        .bind(&expense.description)
        .bind(expense.amount)
        .bind(expense.date)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_err(e, &expense.id))?;

        Ok(())
    }

    async fn update_expense(
        &self,
        owner: &str,
        expense_id: &str,
        changes: &ExpenseChanges,
    ) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "UPDATE expenses SET budget_id = $3, description = $4, amount = $5
             WHERE owner_account = $1 AND id = $2",
        )
        .bind(owner)
        .bind(expense_id)
        .bind(&changes.budget_id)
        .bind(&changes.description)
        .bind(changes.amount)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete_expense(&self, owner: &str, expense_id: &str) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM expenses WHERE owner_account = $1 AND id = $2")
            .bind(owner)
            .bind(expense_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn delete_expenses_for_budget(
        &self,
        owner: &str,
        budget_id: &str,
    ) -> Result<u64, StoreError> {
        let result =
            sqlx::query("DELETE FROM expenses WHERE owner_account = $1 AND budget_id = $2")
                .bind(owner)
                .bind(budget_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected())
    }
}
