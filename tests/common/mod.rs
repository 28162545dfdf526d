use std::sync::Arc;

use anyhow::Result;
use serde_json::{json, Value};

use budget_api_rust::config;
use budget_api_rust::database::MemStore;
use budget_api_rust::server::{app, AppState};

pub struct TestServer {
    pub base_url: String,
}

/// Spawn an in-process server on an ephemeral port, backed by a fresh
/// in-memory store so tests stay isolated from each other.
pub async fn spawn_server() -> Result<TestServer> {
    let state = AppState {
        store: Arc::new(MemStore::new()),
    };
    let router = app(state, config::config());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let base_url = format!("http://{}", listener.local_addr()?);

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });

    Ok(TestServer { base_url })
}

/// Client with a cookie store, so the SID cookie carries across calls.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("reqwest client")
}

/// Register an account and sign in with it, leaving the client's cookie
/// jar holding a live session.
#[allow(dead_code)]
pub async fn sign_up_and_in(
    client: &reqwest::Client,
    base_url: &str,
    name: &str,
    account: &str,
) -> Result<()> {
    let res: Value = client
        .post(format!("{}/signUp", base_url))
        .json(&json!({ "name": name, "account": account, "password": "Abc123" }))
        .send()
        .await?
        .json()
        .await?;
    anyhow::ensure!(res["type"] == true, "sign-up failed: {}", res);

    let res: Value = client
        .post(format!("{}/signIn", base_url))
        .json(&json!({ "account": account, "password": "Abc123", "check": false }))
        .send()
        .await?
        .json()
        .await?;
    anyhow::ensure!(res["type"] == true, "sign-in failed: {}", res);

    Ok(())
}
