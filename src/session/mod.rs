use std::collections::HashMap;
use std::sync::Arc;

use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::entity::user::User;
use crate::store::{Store, StoreError};

/// Cookie carrying the session token for browser clients.
pub const SESSION_COOKIE: &str = "sessionid";

/// Server-side session registry: opaque token -> user id.
///
/// The token is the only thing a client ever holds; everything it stands for
/// stays in this map.
#[derive(Clone, Default)]
pub struct Sessions {
    inner: Arc<RwLock<HashMap<String, i64>>>,
}

impl Sessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh token bound to `user_id`.
    pub async fn create(&self, user_id: i64) -> String {
        let token = Uuid::new_v4().simple().to_string();
        self.inner.write().await.insert(token.clone(), user_id);
        token
    }

    pub async fn resolve(&self, token: &str) -> Option<i64> {
        self.inner.read().await.get(token).copied()
    }

    /// Invalidate `token`. Returns false when the token was not active, so a
    /// repeated logout surfaces as an auth failure.
    pub async fn destroy(&self, token: &str) -> bool {
        self.inner.write().await.remove(token).is_some()
    }
}

/// Check `username`/`password` against the identity store.
///
/// Unknown usernames and wrong passwords are indistinguishable to the caller.
pub async fn authenticate(
    store: &Store,
    username: &str,
    password: &str,
) -> Result<Option<User>, StoreError> {
    let Some(user) = store.user_by_username(username).await? else {
        return Ok(None);
    };
    if verify_password(password, &user.password_hash) {
        Ok(Some(user))
    } else {
        Ok(None)
    }
}

/// Resolve a token to the user it stands for, reading the identity store for
/// fresh account details.
pub async fn current_user(
    store: &Store,
    sessions: &Sessions,
    token: &str,
) -> Result<Option<User>, StoreError> {
    let Some(user_id) = sessions.resolve(token).await else {
        return Ok(None);
    };
    store.user_by_id(user_id).await
}

/// Salted SHA-256 credential, stored as `salt$hexdigest`.
pub fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    format!("{}${}", salt, digest(&salt, password))
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt, expected)) = stored.split_once('$') else {
        return false;
    };
    digest(salt, password) == expected
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b"$");
    hasher.update(password.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect()
}
