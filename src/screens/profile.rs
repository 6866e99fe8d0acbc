use crate::auth::{AccountUser, Auth, LocalSession, SessionState};
use crate::navigation::Route;
use crate::photos::PinImage;
use crate::query::QueryClient;

use super::Alert;

/// Profile tab: who is signed in, and signing out
pub struct ProfileScreen {
    auth: Auth,
    queries: QueryClient<PinImage>,
    session: Option<LocalSession>,
    user: Option<AccountUser>,
}

impl ProfileScreen {
    pub fn new(auth: Auth, queries: QueryClient<PinImage>, user: Option<AccountUser>) -> Self {
        Self {
            auth,
            queries,
            session: None,
            user,
        }
    }

    /// Mark the session signed out after logging out
    pub fn with_session(mut self, session: LocalSession) -> Self {
        self.session = Some(session);
        self
    }

    pub fn display_name(&self) -> String {
        self.user
            .as_ref()
            .map(AccountUser::display_name)
            .unwrap_or_default()
    }

    /// `@username`, or nothing for an unknown account
    pub fn handle(&self) -> Option<String> {
        self.user
            .as_ref()
            .filter(|u| !u.username.is_empty())
            .map(|u| format!("@{}", u.username))
    }

    /// Log out, drop every cached page and return to sign in
    pub async fn sign_out(&mut self) -> Result<Route, Alert> {
        self.auth
            .logout()
            .await
            .map_err(|err| Alert::from_error("Logout Failed", &err, "Error"))?;

        self.queries.clear();
        self.user = None;
        if let Some(session) = &self.session {
            session.set(SessionState::SignedOut);
        }
        Ok(Route::SignIn)
    }
}
