//! Sign-up, sign-in, and session inspection endpoints.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{info, warn};

use crate::auth::{password, session};
use crate::database::models::{Budget, User, DEFAULT_BUDGET_ID};
use crate::database::store::StoreError;
use crate::error::ApiError;
use crate::server::AppState;
use crate::validation::{char_count, has_lower_upper_digit, is_ascii_alphanumeric};

#[derive(Debug, Default, Serialize)]
pub struct IsLoggedInResponse {
    #[serde(rename = "isLoggedIn")]
    pub is_logged_in: bool,
    #[serde(rename = "userName")]
    pub user_name: String,
}

#[derive(Debug, Serialize)]
pub struct SignUpResponse {
    #[serde(rename = "type")]
    pub success: bool,
    pub target: String,
    pub msg: String,
}

impl SignUpResponse {
    fn fail(target: &str, msg: &str) -> Self {
        Self {
            success: false,
            target: target.to_string(),
            msg: msg.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SignInResponse {
    #[serde(rename = "type")]
    pub success: bool,
    pub target: String,
    pub name: String,
    pub msg: String,
}

impl SignInResponse {
    fn fail(target: &str, msg: &str) -> Self {
        Self {
            success: false,
            target: target.to_string(),
            name: String::new(),
            msg: msg.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SignUpRequest {
    pub name: String,
    pub account: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SignInRequest {
    pub account: String,
    pub password: String,
    /// "Remember me": issue a persistent session instead of a
    /// browser-session cookie.
    pub check: bool,
}

/// GET / - liveness probe that also exercises the session layer.
pub async fn home(session: Session) -> Result<Json<&'static str>, ApiError> {
    session.insert("probe", "ok").await?;
    Ok(Json("Hello World"))
}

/// GET /isLoggedIn - report whether the caller has a live session.
///
/// A session naming an account with no matching user (dangling session)
/// reads as "not logged in" rather than an error.
pub async fn is_logged_in(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<IsLoggedInResponse>, ApiError> {
    let mut response = IsLoggedInResponse::default();

    if let Some(account) = session::current_account(&session).await? {
        if let Some(user) = state.store.find_user_by_account(&account).await? {
            response = IsLoggedInResponse {
                is_logged_in: true,
                user_name: user.name,
            };
        }
    }

    Ok(Json(response))
}

/// POST /signUp - create an account plus its default budget.
///
/// Validation short-circuits: the first failing rule names the offending
/// field and nothing is persisted.
pub async fn sign_up(
    State(state): State<AppState>,
    Json(req): Json<SignUpRequest>,
) -> Result<Json<SignUpResponse>, ApiError> {
    if req.name.is_empty() {
        return Ok(Json(SignUpResponse::fail("name", "Name must not be empty")));
    }
    if char_count(&req.name) > 10 {
        return Ok(Json(SignUpResponse::fail(
            "name",
            "Name must be at most 10 characters",
        )));
    }

    if req.account.is_empty() {
        return Ok(Json(SignUpResponse::fail(
            "account",
            "Account must not be empty",
        )));
    }
    if state
        .store
        .find_user_by_account(&req.account)
        .await?
        .is_some()
    {
        return Ok(Json(SignUpResponse::fail(
            "account",
            "Account is already taken, please choose another",
        )));
    }

    if let Some(response) = check_password_rules(&req.password) {
        return Ok(Json(response));
    }

    let digest = password::hash_password(&req.password)
        .map_err(|e| ApiError::InternalServerError(format!("password hashing failed: {}", e)))?;

    let user = User {
        account: req.account.clone(),
        name: req.name.clone(),
        password_digest: digest,
    };
    match state.store.insert_user(&user).await {
        Ok(()) => {}
        // Lost a race for the account name after the lookup above.
        Err(StoreError::Duplicate(_)) => {
            return Ok(Json(SignUpResponse::fail(
                "account",
                "Account is already taken, please choose another",
            )));
        }
        Err(e) => return Err(e.into()),
    }
    info!(account = %req.account, "new user signed up");

    // Default budget is best-effort: the sign-up already succeeded.
    let default_budget = Budget {
        id: DEFAULT_BUDGET_ID.to_string(),
        name: DEFAULT_BUDGET_ID.to_string(),
        max: 0,
        owner_account: req.account.clone(),
    };
    if let Err(err) = state.store.insert_budget(&default_budget).await {
        warn!(account = %req.account, "failed to insert default budget: {}", err);
    }

    Ok(Json(SignUpResponse {
        success: true,
        target: String::new(),
        msg: "success".to_string(),
    }))
}

fn check_password_rules(password: &str) -> Option<SignUpResponse> {
    if password.is_empty() {
        return Some(SignUpResponse::fail(
            "password",
            "Password must not be empty",
        ));
    }
    if !is_ascii_alphanumeric(password) {
        return Some(SignUpResponse::fail(
            "password",
            "Password may only contain letters and digits",
        ));
    }
    if !has_lower_upper_digit(password) {
        return Some(SignUpResponse::fail(
            "password",
            "Password must contain a lowercase letter, an uppercase letter, and a digit",
        ));
    }
    None
}

/// POST /signIn - verify credentials and open a session.
pub async fn sign_in(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<SignInRequest>,
) -> Result<Json<SignInResponse>, ApiError> {
    if req.account.is_empty() {
        return Ok(Json(SignInResponse::fail(
            "account",
            "Account must not be empty",
        )));
    }

    // "Not found" is a field-level outcome; other store failures are fatal.
    let Some(user) = state.store.find_user_by_account(&req.account).await? else {
        return Ok(Json(SignInResponse::fail(
            "account",
            "Account not found, please try again",
        )));
    };

    if let Some(failure) = check_password_rules(&req.password) {
        return Ok(Json(SignInResponse::fail("password", &failure.msg)));
    }

    if !password::verify_password(&req.password, &user.password_digest) {
        return Ok(Json(SignInResponse::fail("password", "Incorrect password")));
    }

    session::establish(&session, &req.account, req.check).await?;
    info!(account = %req.account, remember = req.check, "user signed in");

    Ok(Json(SignInResponse {
        success: true,
        target: String::new(),
        name: user.name,
        msg: "sign-in successful".to_string(),
    }))
}

/// GET /logOut - clear the session and expire the cookie. A caller with
/// no session is a no-op.
pub async fn log_out(session: Session) -> Result<(), ApiError> {
    if session::current_account(&session).await?.is_none() {
        return Ok(());
    }
    session::clear(&session).await?;
    info!("user logged out");
    Ok(())
}
