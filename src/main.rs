use anyhow::Context;
use axum::{extract::Request, ServiceExt};

use storefront_api::app::app;
use storefront_api::config;
use storefront_api::session::Sessions;
use storefront_api::state::AppState;
use storefront_api::store::Store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, PORT, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront_api=info,tower_http=info".into()),
        )
        .init();

    let config = config::config();
    tracing::info!("starting storefront API in {:?} mode", config.environment);

    let store = Store::connect(&config.database.url, config.database.max_connections)
        .await
        .context("failed to open the store")?;
    store
        .bootstrap()
        .await
        .context("failed to provision tables")?;

    if let Some(admin) = config.security.seed_admin() {
        store
            .ensure_user(&admin.username, &admin.email, &admin.password, true)
            .await
            .context("failed to seed admin user")?;
        tracing::info!(username = %admin.username, "seeded admin user");
    }

    let state = AppState::new(store, Sessions::new());
    let service = app(state);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("listening on http://{}", bind_addr);

    axum::serve(listener, ServiceExt::<Request>::into_make_service(service))
        .await
        .context("server error")?;
    Ok(())
}
