mod common;

use anyhow::Result;
use serde_json::{json, Value};

#[tokio::test]
async fn home_responds_and_sets_a_session() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = common::client();

    let res = client.get(format!("{}/", server.base_url)).send().await?;
    assert!(res.status().is_success());
    assert!(res.headers().contains_key("set-cookie"), "expected a SID cookie");

    let body: Value = res.json().await?;
    assert_eq!(body, "Hello World");
    Ok(())
}

#[tokio::test]
async fn sign_up_validates_fields_in_order() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = common::client();
    let url = format!("{}/signUp", server.base_url);

    let cases = [
        (json!({ "name": "", "account": "a1", "password": "Abc123" }), "name"),
        (json!({ "name": "abcdefghijk", "account": "a1", "password": "Abc123" }), "name"),
        (json!({ "name": "alice", "account": "", "password": "Abc123" }), "account"),
        (json!({ "name": "alice", "account": "a1", "password": "" }), "password"),
        (json!({ "name": "alice", "account": "a1", "password": "Abc 123" }), "password"),
        (json!({ "name": "alice", "account": "a1", "password": "abc" }), "password"),
        (json!({ "name": "alice", "account": "a1", "password": "abc123" }), "password"),
    ];

    for (body, target) in cases {
        let res: Value = client.post(&url).json(&body).send().await?.json().await?;
        assert_eq!(res["type"], false, "body {} should fail", body);
        assert_eq!(res["target"], target, "body {}", body);
    }

    // a compliant password passes every rule
    let res: Value = client
        .post(&url)
        .json(&json!({ "name": "alice", "account": "a1", "password": "Abc123" }))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(res["type"], true);
    assert_eq!(res["msg"], "success");
    Ok(())
}

#[tokio::test]
async fn second_sign_up_for_same_account_is_rejected() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = common::client();
    let url = format!("{}/signUp", server.base_url);
    let body = json!({ "name": "alice", "account": "a1", "password": "Abc123" });

    let res: Value = client.post(&url).json(&body).send().await?.json().await?;
    assert_eq!(res["type"], true);

    let res: Value = client.post(&url).json(&body).send().await?.json().await?;
    assert_eq!(res["type"], false);
    assert_eq!(res["target"], "account");

    // the original credentials still work, so only the first user exists
    let res: Value = client
        .post(format!("{}/signIn", server.base_url))
        .json(&json!({ "account": "a1", "password": "Abc123" }))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(res["type"], true);
    Ok(())
}

#[tokio::test]
async fn sign_in_reports_unknown_account_and_wrong_password() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = common::client();

    let res: Value = client
        .post(format!("{}/signIn", server.base_url))
        .json(&json!({ "account": "ghost", "password": "Abc123" }))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(res["type"], false);
    assert_eq!(res["target"], "account");

    client
        .post(format!("{}/signUp", server.base_url))
        .json(&json!({ "name": "alice", "account": "a1", "password": "Abc123" }))
        .send()
        .await?;

    let res: Value = client
        .post(format!("{}/signIn", server.base_url))
        .json(&json!({ "account": "a1", "password": "Abc124" }))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(res["type"], false);
    assert_eq!(res["target"], "password");
    Ok(())
}

#[tokio::test]
async fn session_lifecycle_sign_in_then_log_out() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = common::client();

    // anonymous caller is not logged in
    let res: Value = client
        .get(format!("{}/isLoggedIn", server.base_url))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(res["isLoggedIn"], false);

    common::sign_up_and_in(&client, &server.base_url, "alice", "a1").await?;

    let res: Value = client
        .get(format!("{}/isLoggedIn", server.base_url))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(res["isLoggedIn"], true);
    assert_eq!(res["userName"], "alice");

    let res = client
        .get(format!("{}/logOut", server.base_url))
        .send()
        .await?;
    assert!(res.status().is_success());

    let res: Value = client
        .get(format!("{}/isLoggedIn", server.base_url))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(res["isLoggedIn"], false);
    Ok(())
}

#[tokio::test]
async fn remember_me_issues_a_persistent_cookie() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = common::client();

    client
        .post(format!("{}/signUp", server.base_url))
        .json(&json!({ "name": "alice", "account": "a1", "password": "Abc123" }))
        .send()
        .await?;

    let res = client
        .post(format!("{}/signIn", server.base_url))
        .json(&json!({ "account": "a1", "password": "Abc123", "check": true }))
        .send()
        .await?;
    let cookie = res
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();
    // a persistent session carries an expiry; a browser-session cookie has none
    assert!(
        cookie.contains("expires=") || cookie.contains("max-age="),
        "expected persistent cookie, got: {}",
        cookie
    );

    let body: Value = res.json().await?;
    assert_eq!(body["type"], true);
    assert_eq!(body["name"], "alice");
    Ok(())
}

#[tokio::test]
async fn log_out_without_a_session_is_a_no_op() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = common::client();

    let res = client
        .get(format!("{}/logOut", server.base_url))
        .send()
        .await?;
    assert!(res.status().is_success());
    Ok(())
}
