//! Generic CRUD handlers: one set of functions serves every resource, bound
//! per entity by the router.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};
use serde_json::Value;

use crate::error::ApiError;
use crate::state::AppState;
use crate::store::Resource;

/// GET on the collection path: every record, in insertion order.
pub async fn index<R: Resource>(
    State(state): State<AppState>,
) -> Result<Json<Vec<R::Wire>>, ApiError> {
    Ok(Json(R::list(state.store()).await?))
}

/// POST on the collection path: validate, insert, echo with assigned id.
pub async fn create<R: Resource>(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<R::Wire>), ApiError> {
    let Json(payload) = payload?;
    let created = R::create(state.store(), payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET on the item path.
pub async fn retrieve<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<R::Wire>, ApiError> {
    Ok(Json(R::retrieve(state.store(), id).await?))
}

/// PUT/PATCH on the item path. Both verbs take the same partial payload;
/// provided fields are re-validated and written, the rest stay put.
pub async fn update<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<R::Wire>, ApiError> {
    let Json(payload) = payload?;
    Ok(Json(R::update(state.store(), id, payload).await?))
}

/// DELETE on the item path.
pub async fn destroy<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    R::delete(state.store(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
