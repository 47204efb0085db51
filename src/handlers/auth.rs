use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{AppendHeaders, IntoResponse, Json},
    Extension,
};
use serde_json::{json, Value};

use crate::entity::user::UserSummary;
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::session::{self, SESSION_COOKIE};
use crate::state::AppState;

/// POST /auth/login/ - establish a session from username/password credentials.
///
/// The response sets the session cookie; the body carries only a message and
/// the user summary, never the token or anything derived from the password.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    let username = payload.get("username").and_then(Value::as_str);
    let password = payload.get("password").and_then(Value::as_str);
    let (Some(username), Some(password)) = (username, password) else {
        return Err(ApiError::bad_request(
            "Please provide both username and password",
        ));
    };

    let user = session::authenticate(state.store(), username, password)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    let token = state.sessions().create(user.id).await;
    tracing::info!(username = %user.username, "session opened");

    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, token
    );
    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(json!({
            "message": "Successfully logged in",
            "user": user.summary(),
        })),
    ))
}

/// POST /auth/logout/ - invalidate the current session server-side.
///
/// Replaying the same token afterwards fails the session check with 401.
pub async fn logout(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.sessions().destroy(&current.token).await {
        return Err(ApiError::unauthorized("Not authenticated"));
    }
    tracing::info!(username = %current.user.username, "session closed");

    let cookie = format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        SESSION_COOKIE
    );
    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(json!({ "message": "Successfully logged out" })),
    ))
}

/// GET /auth/user/ - summary of the authenticated user.
pub async fn user_info(Extension(current): Extension<CurrentUser>) -> Json<UserSummary> {
    Json(current.user)
}
