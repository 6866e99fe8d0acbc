//! Request and response bodies of the backend auth endpoints

use serde::{Deserialize, Serialize};

/// Body of `POST /auth/login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `POST /auth/register`, which emails an OTP
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub confirm_password: String,
}

/// Body of `POST /auth/verify_otp`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub otp: String,
}

impl VerifyOtpRequest {
    /// Pair a pending registration with the OTP the user received
    pub fn from_registration(registration: &RegisterRequest, otp: &str) -> Self {
        Self {
            email: registration.email.clone(),
            username: registration.username.clone(),
            first_name: registration.first_name.clone(),
            last_name: registration.last_name.clone(),
            password: registration.password.clone(),
            otp: otp.trim().to_string(),
        }
    }
}

/// Account data returned by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AccountUser {
    #[serde(default)]
    pub user_id: Option<String>,
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub is_verified: Option<bool>,
}

impl AccountUser {
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

/// Response of `POST /auth/login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: Option<AccountUser>,
}

/// Response of `POST /auth/register`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpResponse {
    pub message: Option<String>,
    /// Only present on development backends
    #[serde(default)]
    pub otp: Option<String>,
}

impl OtpResponse {
    /// The backend signals success through a `message` field
    pub fn is_sent(&self) -> bool {
        self.message.as_deref().map_or(false, |m| !m.is_empty())
    }
}

/// Response of `POST /auth/verify_otp`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyOtpResponse {
    pub message: String,
    pub user: Option<AccountUser>,
}

/// Any response that only carries a message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}
