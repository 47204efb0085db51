use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::entity::user::UserSummary;
use crate::error::ApiError;
use crate::session::{self, SESSION_COOKIE};
use crate::state::AppState;

/// Authenticated request context resolved from the session token.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub user: UserSummary,
    pub token: String,
}

/// Session middleware: resolves the token, loads the account it stands for
/// and injects [`CurrentUser`] into the request.
///
/// Requests without a valid session are rejected here, before the handler
/// (and therefore before any entity access) runs.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_session_token(request.headers())
        .ok_or_else(|| ApiError::unauthorized("Not authenticated"))?;

    let user = session::current_user(state.store(), state.sessions(), &token)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::unauthorized("Not authenticated"))?;

    request.extensions_mut().insert(CurrentUser {
        user: user.summary(),
        token,
    });

    Ok(next.run(request).await)
}

/// Pull the session token from `Authorization: Bearer` or the session cookie.
fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        if let Some(token) = value.strip_prefix("Bearer ") {
            if !token.trim().is_empty() {
                return Some(token.trim().to_string());
            }
        }
    }

    let cookies = headers.get(header::COOKIE).and_then(|v| v.to_str().ok())?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE && !value.is_empty()).then(|| value.to_string())
    })
}
