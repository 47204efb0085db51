mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

/// Full session lifecycle: login sets a cookie, the user endpoint resolves
/// it, logout kills the server-side session and the old token stops working.
#[tokio::test]
async fn login_session_logout_round_trip() -> Result<()> {
    let app = common::spawn_app().await?;

    let res = app
        .client
        .post(app.url("/auth/login/"))
        .json(&json!({ "username": "alice", "password": "secret" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    // Keep the raw token so we can replay it after logout
    let set_cookie = res
        .headers()
        .get(reqwest::header::SET_COOKIE)
        .expect("login sets the session cookie")
        .to_str()?
        .to_string();
    let token = set_cookie
        .split(';')
        .next()
        .unwrap()
        .trim_start_matches("sessionid=")
        .to_string();
    assert!(!token.is_empty());

    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Successfully logged in");
    assert_eq!(body["user"]["username"], "alice");
    assert_eq!(body["user"]["email"], "alice@example.com");
    assert_eq!(body["user"]["is_staff"], true);
    assert!(body["user"]["id"].is_i64());

    let res = app.client.get(app.url("/auth/user/")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["username"], "alice");
    assert_eq!(body["email"], "alice@example.com");
    assert_eq!(body["is_staff"], true);
    assert!(body["id"].is_i64());

    let res = app.client.post(app.url("/auth/logout/")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Successfully logged out");

    // The same token is dead now, cookie or bearer
    let res = app
        .client
        .get(app.url("/auth/user/"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // A second logout with the stale token also fails
    let res = app
        .client
        .post(app.url("/auth/logout/"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

/// Wrong password and unknown username must be indistinguishable.
#[tokio::test]
async fn invalid_credentials_share_one_error_body() -> Result<()> {
    let app = common::spawn_app().await?;

    let wrong_password = app
        .client
        .post(app.url("/auth/login/"))
        .json(&json!({ "username": "alice", "password": "wrong" }))
        .send()
        .await?;
    let unknown_user = app
        .client
        .post(app.url("/auth/login/"))
        .json(&json!({ "username": "nosuchuser", "password": "x" }))
        .send()
        .await?;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);

    let a: Value = wrong_password.json().await?;
    let b: Value = unknown_user.json().await?;
    assert_eq!(a, json!({ "error": "Invalid credentials" }));
    assert_eq!(a, b);
    Ok(())
}

#[tokio::test]
async fn login_requires_both_fields() -> Result<()> {
    let app = common::spawn_app().await?;

    for payload in [
        json!({}),
        json!({ "username": "alice" }),
        json!({ "password": "secret" }),
    ] {
        let res = app
            .client
            .post(app.url("/auth/login/"))
            .json(&payload)
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "payload: {}", payload);
        let body: Value = res.json().await?;
        assert_eq!(body["error"], "Please provide both username and password");
    }
    Ok(())
}

#[tokio::test]
async fn user_endpoint_requires_a_session() -> Result<()> {
    let app = common::spawn_app().await?;

    let res = app.client.get(app.url("/auth/user/")).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await?;
    assert!(body["error"].is_string());

    let res = app
        .client
        .get(app.url("/auth/user/"))
        .bearer_auth("not-a-real-token")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn health_endpoint_is_public() -> Result<()> {
    let app = common::spawn_app().await?;

    let res = app.client.get(app.url("/health")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}
