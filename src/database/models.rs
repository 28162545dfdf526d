use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Account record. The password digest never leaves the backend, so this
/// type is deliberately not serializable.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub account: String,
    pub name: String,
    pub password_digest: String,
}

/// A named spending category with a cap, owned by one user.
///
/// `id` is caller-supplied and unique per owner. Every user gets a default
/// budget `{id: "Other", name: "Other", max: 0}` at sign-up.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub name: String,
    pub max: i64,
    pub owner_account: String,
}

/// A dated monetary line item attributed to one budget and one user.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    #[serde(rename = "budgetID")]
    pub budget_id: String,
    pub description: String,
    pub amount: i64,
    /// Epoch seconds.
    pub date: i64,
    pub owner_account: String,
}

/// Reserved budget name: the front end renders a synthetic "Total" row, so
/// no stored budget may claim it.
pub const RESERVED_BUDGET_NAME: &str = "Total";

/// Default budget created alongside every new user.
pub const DEFAULT_BUDGET_ID: &str = "Other";
