#![allow(dead_code)]

use anyhow::{ensure, Context, Result};
use axum::{extract::Request, ServiceExt};
use serde_json::{json, Value};

use storefront_api::app::app;
use storefront_api::session::Sessions;
use storefront_api::state::AppState;
use storefront_api::store::Store;

pub struct TestApp {
    pub base_url: String,
    pub client: reqwest::Client,
    /// Direct handle on the same store the server uses, for asserting that
    /// rejected requests left no trace.
    pub store: Store,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Boot the full router on an OS-assigned port with a fresh in-memory store
/// and one seeded account (alice / secret).
pub async fn spawn_app() -> Result<TestApp> {
    let store = Store::connect("sqlite::memory:", 1)
        .await
        .context("open store")?;
    store.bootstrap().await.context("bootstrap tables")?;
    store
        .ensure_user("alice", "alice@example.com", "secret", true)
        .await
        .context("seed user")?;

    let state = AppState::new(store.clone(), Sessions::new());
    let service = app(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("bind test port")?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        axum::serve(listener, ServiceExt::<Request>::into_make_service(service))
            .await
            .expect("test server");
    });

    let client = reqwest::Client::builder().cookie_store(true).build()?;
    Ok(TestApp {
        base_url: format!("http://{}", addr),
        client,
        store,
    })
}

/// Log the seeded account in; the session cookie lands in the client jar.
pub async fn login(app: &TestApp) -> Result<()> {
    let res = app
        .client
        .post(app.url("/auth/login/"))
        .json(&json!({ "username": "alice", "password": "secret" }))
        .send()
        .await?;
    ensure!(res.status() == 200, "login failed: {}", res.status());
    Ok(())
}

/// Create a product through the API and return its wire form.
pub async fn create_product(app: &TestApp, name: &str, price: &str, stock: i64) -> Result<Value> {
    let res = app
        .client
        .post(app.url("/productos/"))
        .json(&json!({
            "name": name,
            "price": price,
            "description": format!("{} description", name),
            "stock": stock,
        }))
        .send()
        .await?;
    ensure!(
        res.status() == 201,
        "create product failed: {}",
        res.status()
    );
    Ok(res.json().await?)
}

/// Create a sale referencing `product_id` and return its wire form.
pub async fn create_sale(
    app: &TestApp,
    name: &str,
    product_id: i64,
    quantity: i64,
) -> Result<Value> {
    let res = app
        .client
        .post(app.url("/ventas/"))
        .json(&json!({
            "name": name,
            "product_id": product_id,
            "quantity": quantity,
            "date": "2026-08-06",
        }))
        .send()
        .await?;
    ensure!(res.status() == 201, "create sale failed: {}", res.status());
    Ok(res.json().await?)
}
