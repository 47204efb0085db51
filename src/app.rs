use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    middleware::from_fn_with_state,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tower::Layer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::trace::TraceLayer;

use crate::config;
use crate::entity::{JobPosting, NewsItem, Product, Sale, Service};
use crate::handlers::{auth, resource};
use crate::middleware::require_session;
use crate::state::AppState;
use crate::store::Resource;

/// Full application service. Clients use Django-style trailing slashes;
/// normalization folds both spellings onto the same routes.
pub fn app(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(auth_routes(state.clone()))
        .merge(entity_routes(state.clone()))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_routes(state: AppState) -> Router<AppState> {
    // login is the only route reachable without a session
    let protected = Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/auth/user", get(auth::user_info))
        .route_layer(from_fn_with_state(state, require_session));

    Router::new()
        .route("/auth/login", post(auth::login))
        .merge(protected)
}

fn entity_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(resource_routes::<Product>("/productos"))
        .merge(resource_routes::<Service>("/servicios"))
        .merge(resource_routes::<NewsItem>("/noticias"))
        .merge(resource_routes::<JobPosting>("/trabajos"))
        .merge(resource_routes::<Sale>("/ventas"))
        .route_layer(from_fn_with_state(state, require_session))
}

/// Standard verb set for one resource: list + create on the collection path,
/// retrieve + update + delete on the item path.
fn resource_routes<R: Resource>(path: &str) -> Router<AppState> {
    Router::new()
        .route(path, get(resource::index::<R>).post(resource::create::<R>))
        .route(
            &format!("{}/:id", path),
            get(resource::retrieve::<R>)
                .put(resource::update::<R>)
                .patch(resource::update::<R>)
                .delete(resource::destroy::<R>),
        )
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match state.store().ping().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ok" }))),
        Err(err) => {
            tracing::error!("health check failed: {}", err);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "error": "storage unavailable" })),
            )
        }
    }
}

fn cors_layer() -> CorsLayer {
    let origins: Vec<HeaderValue> = config::config()
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    // The browser frontend sends the session cookie cross-origin, so origins
    // are enumerated rather than wildcarded.
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}
