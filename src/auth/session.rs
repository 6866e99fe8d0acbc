//! Signed-in state as observed from the external identity provider

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// What the identity provider currently knows about the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// The provider has not finished loading its token cache
    Loading,
    SignedIn,
    SignedOut,
}

impl SessionState {
    pub fn is_loaded(&self) -> bool {
        !matches!(self, SessionState::Loading)
    }

    pub fn is_signed_in(&self) -> bool {
        matches!(self, SessionState::SignedIn)
    }
}

/// The seam to the identity provider. Token storage and refresh live behind it.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn session_state(&self) -> SessionState;
}

/// A provider whose state is set by the application, e.g. after a login call
#[derive(Debug, Clone)]
pub struct LocalSession {
    state: Arc<RwLock<SessionState>>,
}

impl LocalSession {
    pub fn new(state: SessionState) -> Self {
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    pub fn set(&self, state: SessionState) {
        match self.state.write() {
            Ok(mut current) => *current = state,
            Err(poisoned) => *poisoned.into_inner() = state,
        }
    }

    pub fn get(&self) -> SessionState {
        match self.state.read() {
            Ok(current) => *current,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

impl Default for LocalSession {
    fn default() -> Self {
        Self::new(SessionState::Loading)
    }
}

#[async_trait]
impl SessionProvider for LocalSession {
    async fn session_state(&self) -> SessionState {
        self.get()
    }
}
