use crate::auth::{Auth, RegisterRequest, VerifyOtpRequest};
use crate::forms::{OtpForm, SignUpForm};
use crate::navigation::Route;

use super::{Alert, SubmitError};

/// Two-step registration: account details, then the emailed OTP
pub struct SignUpScreen {
    auth: Auth,
    pub form: SignUpForm,
    pub otp: OtpForm,
    pending_verification: bool,
    loading: bool,
    registration: Option<RegisterRequest>,
}

impl SignUpScreen {
    pub fn new(auth: Auth) -> Self {
        Self {
            auth,
            form: SignUpForm::default(),
            otp: OtpForm::default(),
            pending_verification: false,
            loading: false,
            registration: None,
        }
    }

    /// Whether the OTP step is showing
    pub fn is_pending_verification(&self) -> bool {
        self.pending_verification
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn button_label(&self) -> &'static str {
        match (self.pending_verification, self.loading) {
            (false, false) => "Continue",
            (false, true) => "Sending OTP...",
            (true, false) => "Verify",
            (true, true) => "Verifying...",
        }
    }

    /// Validate the details and ask the backend to email an OTP
    pub async fn send_otp(&mut self) -> Result<Alert, SubmitError> {
        let errors = self.form.check();
        if !errors.is_empty() {
            return Err(SubmitError::Invalid(errors));
        }

        let request = self.form.to_request();
        self.loading = true;
        let result = self.auth.send_register_otp(&request).await;
        self.loading = false;

        match result {
            Ok(response) if response.is_sent() => {
                self.pending_verification = true;
                self.registration = Some(request);
                Ok(Alert::new("OTP sent", "Check your email for the OTP code."))
            }
            Ok(_) => Err(SubmitError::Alert(Alert::new(
                "Sign up failed",
                "The server did not confirm the OTP was sent",
            ))),
            Err(err) => Err(SubmitError::Alert(Alert::from_error(
                "Sign up failed",
                &err,
                "Error",
            ))),
        }
    }

    /// Submit the OTP; a verified account goes on to sign in
    pub async fn verify(&mut self) -> Result<Route, SubmitError> {
        let registration = match (&self.registration, self.pending_verification) {
            (Some(registration), true) => registration,
            _ => {
                return Err(SubmitError::Alert(Alert::new(
                    "Verification failed",
                    "Request an OTP first",
                )))
            }
        };

        let errors = self.otp.check();
        if !errors.is_empty() {
            return Err(SubmitError::Invalid(errors));
        }

        let request = VerifyOtpRequest::from_registration(registration, &self.otp.otp);
        self.loading = true;
        let result = self.auth.verify_register_otp(&request).await;
        self.loading = false;

        match result {
            Ok(_) => {
                *self = Self::new(self.auth.clone());
                Ok(Route::SignIn)
            }
            Err(err) => Err(SubmitError::Alert(Alert::from_error(
                "Verification failed",
                &err,
                "Error",
            ))),
        }
    }

    /// Leave the OTP step to correct the details
    pub fn back_to_details(&mut self) {
        self.pending_verification = false;
        self.registration = None;
        self.otp = OtpForm::default();
    }
}
