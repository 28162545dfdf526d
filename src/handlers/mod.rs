pub mod auth;
pub mod budgets;
pub mod expenses;

use serde::Serialize;

/// Shared response for every budget/expense mutation endpoint.
///
/// Errors are reported in-band with a 200: `logIn: false` tells the front
/// end the session is gone and the user must sign in again; validation
/// failures keep `logIn: true` and carry their reason in `msg`.
#[derive(Debug, Serialize)]
pub struct CrudResponse {
    #[serde(rename = "logIn")]
    pub log_in: bool,
    pub msg: String,
}

impl CrudResponse {
    pub fn login_required() -> Self {
        Self {
            log_in: false,
            msg: "Session expired, please sign in again".to_string(),
        }
    }

    pub fn ok(msg: &str) -> Self {
        Self {
            log_in: true,
            msg: msg.to_string(),
        }
    }

    pub fn invalid(msg: &str) -> Self {
        Self {
            log_in: true,
            msg: msg.to_string(),
        }
    }
}
