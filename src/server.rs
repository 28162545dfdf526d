//! Router and middleware assembly.
//!
//! Everything a request passes through is wired here: the signed-cookie
//! session layer, the credentialed CORS allow-list, request tracing, and
//! the thirteen routes.

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tower_sessions::cookie::{Key, SameSite};
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::auth::session::SESSION_COOKIE;
use crate::config::AppConfig;
use crate::database::store::Store;
use crate::handlers::{auth, budgets, expenses};

/// Shared handler state: the persistence gateway behind its contract, so
/// the Postgres and in-memory implementations are interchangeable.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
}

pub fn app(state: AppState, config: &AppConfig) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE)
        // Key::from demands at least 64 bytes of key material; the config
        // guarantees that for its defaults and documents it for overrides.
        .with_signed(Key::from(config.session.secret.as_bytes()))
        .with_same_site(SameSite::Lax)
        // The reference front end talks to this API over plain http.
        .with_secure(false)
        // Browser-session cookie unless sign-in asks to be remembered.
        .with_expiry(Expiry::OnSessionEnd);

    let origins: Vec<HeaderValue> = config
        .server
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        // The front end sends credentialed fetches so the SID cookie rides along.
        .allow_credentials(true);

    Router::new()
        .route("/", get(auth::home))
        .route("/isLoggedIn", get(auth::is_logged_in))
        .route("/signUp", post(auth::sign_up))
        .route("/signIn", post(auth::sign_in))
        .route("/logOut", get(auth::log_out))
        .route("/getBudgets", get(budgets::get_budgets))
        .route("/getExpenses", get(expenses::get_expenses))
        .route("/createBudget", post(budgets::create_budget))
        .route("/createExpense", post(expenses::create_expense))
        .route("/updateBudget", post(budgets::update_budget))
        .route("/updateExpense", post(expenses::update_expense))
        .route("/deleteBudget", post(budgets::delete_budget))
        .route("/deleteExpense", post(expenses::delete_expense))
        .layer(session_layer)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
