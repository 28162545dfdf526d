//! Owner-scoped budget CRUD.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{debug, info};

use crate::auth::session;
use crate::database::models::{Budget, RESERVED_BUDGET_NAME};
use crate::database::store::{BudgetPatch, StoreError};
use crate::error::ApiError;
use crate::handlers::CrudResponse;
use crate::server::AppState;
use crate::validation::char_count;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateBudgetRequest {
    pub id: String,
    pub name: String,
    pub max: i64,
}

/// Optional-field patch: an absent `name` or `max` means "don't change".
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateBudgetRequest {
    #[serde(rename = "budgetID")]
    pub budget_id: String,
    pub name: Option<String>,
    pub max: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeleteBudgetRequest {
    #[serde(rename = "budgetID")]
    pub budget_id: String,
}

/// GET /getBudgets - every budget owned by the caller. An anonymous
/// caller gets an empty array, not a login-required signal; the read
/// path is deliberately laxer than the mutations.
pub async fn get_budgets(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<Budget>>, ApiError> {
    let Some(account) = session::current_account(&session).await? else {
        return Ok(Json(Vec::new()));
    };
    let budgets = state.store.budgets_for_owner(&account).await?;
    Ok(Json(budgets))
}

/// POST /createBudget
pub async fn create_budget(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<CreateBudgetRequest>,
) -> Result<Json<CrudResponse>, ApiError> {
    let Ok(account) = session::authenticate(&session).await else {
        return Ok(Json(CrudResponse::login_required()));
    };

    if req.id.trim().is_empty() {
        return Ok(Json(CrudResponse::invalid("Budget id must not be empty")));
    }
    if req.name.trim().is_empty() {
        return Ok(Json(CrudResponse::invalid("Budget name must not be empty")));
    }
    if char_count(req.name.trim()) > 12 {
        return Ok(Json(CrudResponse::invalid(
            "Budget name must be at most 12 characters",
        )));
    }
    if req.max < 0 {
        return Ok(Json(CrudResponse::invalid(
            "Budget cap must be zero or greater",
        )));
    }

    let budget = Budget {
        id: req.id,
        name: req.name,
        max: req.max,
        owner_account: account,
    };
    match state.store.insert_budget(&budget).await {
        Ok(()) => {}
        Err(StoreError::Duplicate(_)) => {
            return Ok(Json(CrudResponse::invalid(
                "A budget with this id already exists",
            )));
        }
        Err(e) => return Err(e.into()),
    }

    info!(owner = %budget.owner_account, id = %budget.id, "budget created");
    Ok(Json(CrudResponse::ok("Budget created")))
}

/// POST /updateBudget
///
/// Partial update: an omitted field is left alone, both omitted is a
/// no-op. The reserved name check guards the synthetic "Total" row the
/// front end renders.
pub async fn update_budget(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<UpdateBudgetRequest>,
) -> Result<Json<CrudResponse>, ApiError> {
    let Ok(account) = session::authenticate(&session).await else {
        return Ok(Json(CrudResponse::login_required()));
    };

    if req.budget_id.trim().is_empty() {
        return Ok(Json(CrudResponse::invalid("Budget id must not be empty")));
    }

    // An empty-after-trim name means "leave the name alone".
    let name = req
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    if let Some(name) = &name {
        if char_count(name) > 12 {
            return Ok(Json(CrudResponse::invalid(
                "Budget name must be at most 12 characters",
            )));
        }
        if name == RESERVED_BUDGET_NAME {
            return Ok(Json(CrudResponse::invalid(
                "Budget name \"Total\" is reserved",
            )));
        }
    }
    if let Some(max) = req.max {
        if max < 0 {
            return Ok(Json(CrudResponse::invalid(
                "Budget cap must be zero or greater",
            )));
        }
    }

    let patch = BudgetPatch { name, max: req.max };
    if patch.is_noop() {
        debug!(owner = %account, id = %req.budget_id, "nothing to update");
    } else {
        let updated = state
            .store
            .update_budget(&account, &req.budget_id, &patch)
            .await?;
        debug!(owner = %account, id = %req.budget_id, updated, "budget updated");
    }

    Ok(Json(CrudResponse::ok("Budget updated")))
}

/// POST /deleteBudget
///
/// Cascade: the budget's expenses go first, then the budget itself. The
/// two legs are not atomic; a retry after partial failure re-runs a
/// now-empty cascade and then the budget delete, so the call is
/// retry-safe. Deleting zero documents is not an error.
pub async fn delete_budget(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<DeleteBudgetRequest>,
) -> Result<Json<CrudResponse>, ApiError> {
    let Ok(account) = session::authenticate(&session).await else {
        return Ok(Json(CrudResponse::login_required()));
    };

    if req.budget_id.trim().is_empty() {
        return Ok(Json(CrudResponse::invalid("Budget id must not be empty")));
    }

    let removed_expenses = state
        .store
        .delete_expenses_for_budget(&account, &req.budget_id)
        .await?;
    let removed_budgets = state.store.delete_budget(&account, &req.budget_id).await?;
    info!(
        owner = %account,
        id = %req.budget_id,
        removed_expenses,
        removed_budgets,
        "budget deleted"
    );

    Ok(Json(CrudResponse::ok("Budget deleted")))
}
