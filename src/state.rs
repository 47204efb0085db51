use crate::session::Sessions;
use crate::store::Store;

/// Shared application state handed to every handler and middleware layer.
///
/// Request identity is never ambient: handlers that need the current user
/// receive it as an extension injected by the session middleware.
#[derive(Clone)]
pub struct AppState {
    store: Store,
    sessions: Sessions,
}

impl AppState {
    pub fn new(store: Store, sessions: Sessions) -> Self {
        Self { store, sessions }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn sessions(&self) -> &Sessions {
        &self.sessions
    }
}
