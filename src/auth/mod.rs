//! Authentication against the pinboard backend

mod session;
mod types;

use reqwest::Client;

use crate::error::Error;
use crate::fetch::ApiClient;

pub use session::*;
pub use types::*;

/// Client for the backend's `/auth` endpoints.
///
/// Each method maps onto one REST call. Nothing is retried and nothing is
/// cached locally; the backend sets session cookies that the identity
/// provider owns.
#[derive(Debug, Clone)]
pub struct Auth {
    api: ApiClient,
}

impl Auth {
    /// Create a new Auth client
    pub fn new(api_url: &str, client: Client) -> Self {
        Self {
            api: ApiClient::new(api_url, client),
        }
    }

    /// Sign in with email and password
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, Error> {
        let body = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };

        let result = self
            .api
            .post("/auth/login")
            .json(&body)?
            .execute::<LoginResponse>()
            .await?;

        log::info!("Signed in {}", body.email);
        Ok(result)
    }

    /// Sign out the current user
    pub async fn logout(&self) -> Result<MessageResponse, Error> {
        let result = self
            .api
            .post("/auth/logout")
            .execute::<MessageResponse>()
            .await?;

        log::info!("Signed out");
        Ok(result)
    }

    /// Start a registration; the backend emails a one-time password
    pub async fn send_register_otp(&self, request: &RegisterRequest) -> Result<OtpResponse, Error> {
        let result = self
            .api
            .post("/auth/register")
            .json(request)?
            .execute::<OtpResponse>()
            .await?;

        log::info!("Registration OTP requested for {}", request.email);
        Ok(result)
    }

    /// Finish a registration with the emailed one-time password
    pub async fn verify_register_otp(
        &self,
        request: &VerifyOtpRequest,
    ) -> Result<VerifyOtpResponse, Error> {
        let result = self
            .api
            .post("/auth/verify_otp")
            .json(request)?
            .execute::<VerifyOtpResponse>()
            .await?;

        log::info!("Registration verified for {}", request.email);
        Ok(result)
    }
}
