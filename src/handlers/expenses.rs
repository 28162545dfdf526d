//! Owner-scoped expense CRUD.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{debug, info};

use crate::auth::session;
use crate::database::models::Expense;
use crate::database::store::{ExpenseChanges, StoreError};
use crate::error::ApiError;
use crate::handlers::CrudResponse;
use crate::server::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateExpenseRequest {
    pub id: String,
    #[serde(rename = "budgetID")]
    pub budget_id: String,
    pub description: String,
    pub amount: i64,
    /// Epoch seconds.
    pub date: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateExpenseRequest {
    #[serde(rename = "newBudgetID")]
    pub new_budget_id: String,
    pub id: String,
    pub description: String,
    pub amount: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeleteExpenseRequest {
    #[serde(rename = "expenseID")]
    pub expense_id: String,
}

/// GET /getExpenses - every expense owned by the caller. Same lax
/// anonymous behavior as /getBudgets: no session means an empty array.
pub async fn get_expenses(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<Expense>>, ApiError> {
    let Some(account) = session::current_account(&session).await? else {
        return Ok(Json(Vec::new()));
    };
    let expenses = state.store.expenses_for_owner(&account).await?;
    Ok(Json(expenses))
}

/// POST /createExpense
pub async fn create_expense(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<CreateExpenseRequest>,
) -> Result<Json<CrudResponse>, ApiError> {
    let Ok(account) = session::authenticate(&session).await else {
        return Ok(Json(CrudResponse::login_required()));
    };

    if req.id.trim().is_empty() {
        return Ok(Json(CrudResponse::invalid("Expense id must not be empty")));
    }
    if req.budget_id.trim().is_empty() {
        return Ok(Json(CrudResponse::invalid(
            "Budget category must not be empty",
        )));
    }
    if req.description.trim().is_empty() {
        return Ok(Json(CrudResponse::invalid(
            "Expense description must not be empty",
        )));
    }
    if req.amount < 0 {
        return Ok(Json(CrudResponse::invalid(
            "Expense amount must be zero or greater",
        )));
    }

    let expense = Expense {
        id: req.id,
        budget_id: req.budget_id,
        description: req.description,
        amount: req.amount,
        date: req.date,
        owner_account: account,
    };
    match state.store.insert_expense(&expense).await {
        Ok(()) => {}
        Err(StoreError::Duplicate(_)) => {
            return Ok(Json(CrudResponse::invalid(
                "An expense with this id already exists",
            )));
        }
        Err(e) => return Err(e.into()),
    }

    info!(owner = %expense.owner_account, id = %expense.id, "expense created");
    Ok(Json(CrudResponse::ok("Expense created")))
}

/// POST /updateExpense
///
/// Unlike budget updates there is no partial-update branching: budget
/// category, description, and amount are replaced unconditionally, and
/// the amount must be strictly positive.
pub async fn update_expense(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<UpdateExpenseRequest>,
) -> Result<Json<CrudResponse>, ApiError> {
    let Ok(account) = session::authenticate(&session).await else {
        return Ok(Json(CrudResponse::login_required()));
    };

    if req.new_budget_id.trim().is_empty() {
        return Ok(Json(CrudResponse::invalid(
            "New budget category must not be empty",
        )));
    }
    if req.id.trim().is_empty() {
        return Ok(Json(CrudResponse::invalid("Expense id must not be empty")));
    }
    if req.description.trim().is_empty() {
        return Ok(Json(CrudResponse::invalid(
            "Expense description must not be empty",
        )));
    }
    if req.amount <= 0 {
        return Ok(Json(CrudResponse::invalid(
            "Expense amount must be greater than zero",
        )));
    }

    let changes = ExpenseChanges {
        budget_id: req.new_budget_id,
        description: req.description,
        amount: req.amount,
    };
    let updated = state
        .store
        .update_expense(&account, &req.id, &changes)
        .await?;
    debug!(owner = %account, id = %req.id, updated, "expense updated");

    Ok(Json(CrudResponse::ok("Expense updated")))
}

/// POST /deleteExpense
pub async fn delete_expense(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<DeleteExpenseRequest>,
) -> Result<Json<CrudResponse>, ApiError> {
    let Ok(account) = session::authenticate(&session).await else {
        return Ok(Json(CrudResponse::login_required()));
    };

    if req.expense_id.trim().is_empty() {
        return Ok(Json(CrudResponse::invalid("Expense id must not be empty")));
    }

    let removed = state.store.delete_expense(&account, &req.expense_id).await?;
    info!(owner = %account, id = %req.expense_id, removed, "expense deleted");

    Ok(Json(CrudResponse::ok("Expense deleted")))
}
