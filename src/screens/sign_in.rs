use std::collections::BTreeSet;

use crate::auth::{AccountUser, Auth, LocalSession, SessionState};
use crate::forms::{FormErrors, SignInForm};
use crate::navigation::Route;

use super::{Alert, SubmitError};

/// Email and password sign in
pub struct SignInScreen {
    auth: Auth,
    session: Option<LocalSession>,
    pub form: SignInForm,
    touched: BTreeSet<&'static str>,
    pending: bool,
    user: Option<AccountUser>,
}

impl SignInScreen {
    pub fn new(auth: Auth) -> Self {
        Self {
            auth,
            session: None,
            form: SignInForm::default(),
            touched: BTreeSet::new(),
            pending: false,
            user: None,
        }
    }

    /// Mark the session signed in after a successful login
    pub fn with_session(mut self, session: LocalSession) -> Self {
        self.session = Some(session);
        self
    }

    /// Fields show their errors once they lose focus
    pub fn blur(&mut self, field: &str) {
        if let Some(name) = SignInForm::FIELDS.iter().find(|f| **f == field) {
            self.touched.insert(*name);
        }
    }

    /// Errors of the fields the user has already left
    pub fn visible_errors(&self) -> FormErrors {
        let all = self.form.check();
        let mut visible = FormErrors::default();
        for field in &self.touched {
            if let Some(message) = all.get(field) {
                visible = visible.with(field, message);
            }
        }
        visible
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// The continue button is disabled while invalid or submitting
    pub fn can_submit(&self) -> bool {
        !self.pending && self.form.is_valid()
    }

    pub fn button_label(&self) -> &'static str {
        if self.pending {
            "Signing in..."
        } else {
            "Continue"
        }
    }

    /// The account returned by the last successful login
    pub fn user(&self) -> Option<&AccountUser> {
        self.user.as_ref()
    }

    pub async fn submit(&mut self) -> Result<Route, SubmitError> {
        self.touched.extend(SignInForm::FIELDS);
        let errors = self.form.check();
        if !errors.is_empty() {
            return Err(SubmitError::Invalid(errors));
        }

        let request = self.form.to_request();
        self.pending = true;
        let result = self.auth.login(&request.email, &request.password).await;
        self.pending = false;

        match result {
            Ok(response) => {
                self.user = response.user;
                if let Some(session) = &self.session {
                    session.set(SessionState::SignedIn);
                }
                self.form = SignInForm::default();
                self.touched.clear();
                Ok(Route::HOME)
            }
            Err(err) => Err(SubmitError::Alert(Alert::from_error(
                "Login Failed",
                &err,
                "Invalid credentials",
            ))),
        }
    }
}
