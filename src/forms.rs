//! Client-side validation of the auth forms
//!
//! Invalid forms never reach the network. Messages match what the screens
//! display under each field.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use validator::{Validate, ValidationErrors};

use crate::auth::{LoginRequest, RegisterRequest};

pub const PASSWORD_MIN_LENGTH: usize = 6;
const PASSWORD_SPECIALS: &str = "@$!%*?&";

/// Local part, domain, and a top-level domain of at least two letters
static SIGN_IN_EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").expect("valid email pattern")
});

/// First error message per field, keyed by field name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormErrors {
    errors: BTreeMap<String, String>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// The message of the first field in declaration order, for alerts
    pub fn first_message(&self, order: &[&str]) -> Option<&str> {
        order.iter().find_map(|field| self.get(field))
    }

    /// Builder form of recording an error
    pub fn with(mut self, field: &str, message: &str) -> Self {
        self.add(field, message);
        self
    }

    fn add(&mut self, field: &str, message: &str) {
        self.errors
            .entry(field.to_string())
            .or_insert_with(|| message.to_string());
    }

    fn require(&mut self, field: &str, value: &str, message: &str) -> bool {
        if value.trim().is_empty() {
            self.add(field, message);
            false
        } else {
            true
        }
    }

    fn merge(&mut self, result: Result<(), ValidationErrors>) {
        if let Err(errors) = result {
            for (field, list) in errors.field_errors() {
                if let Some(first) = list.first() {
                    let message = first
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| first.code.to_string());
                    self.add(&field.to_string(), &message);
                }
            }
        }
    }
}

/// Email and password for signing in
#[derive(Debug, Clone, Default, Validate)]
pub struct SignInForm {
    #[validate(regex(path = *SIGN_IN_EMAIL, message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

impl SignInForm {
    pub const FIELDS: [&'static str; 2] = ["email", "password"];

    pub fn check(&self) -> FormErrors {
        let mut errors = FormErrors::default();
        errors.require("email", &self.email, "Email is required");
        errors.require("password", &self.password, "Password is required");
        errors.merge(self.validate());
        errors
    }

    pub fn is_valid(&self) -> bool {
        self.check().is_empty()
    }

    pub fn to_request(&self) -> LoginRequest {
        LoginRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        }
    }
}

/// Account details collected before the OTP is sent
#[derive(Debug, Clone, Default, Validate)]
pub struct SignUpForm {
    #[validate(email(message = "Invalid email address."))]
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    pub confirm_password: String,
}

impl SignUpForm {
    pub const FIELDS: [&'static str; 6] = [
        "email",
        "username",
        "first_name",
        "last_name",
        "password",
        "confirm_password",
    ];

    pub fn check(&self) -> FormErrors {
        let mut errors = FormErrors::default();
        errors.require("email", &self.email, "Email is required");

        if errors.require("username", &self.username, "Username is required")
            && !is_valid_username(self.username.trim())
        {
            errors.add(
                "username",
                "Username must be alphanumeric or contain underscores only.",
            );
        }

        if errors.require("first_name", &self.first_name, "First name is required")
            && !is_alphabetic(self.first_name.trim())
        {
            errors.add(
                "first_name",
                "First name must contain only alphabetic characters.",
            );
        }

        if errors.require("last_name", &self.last_name, "Last name is required")
            && !is_alphabetic(self.last_name.trim())
        {
            errors.add(
                "last_name",
                "Last name must contain only alphabetic characters.",
            );
        }

        errors.require("password", &self.password, "Password is required");
        errors.merge(self.validate());
        if errors.get("password").is_none() && !is_strong_password(&self.password) {
            errors.add(
                "password",
                "Password must contain at least one uppercase letter, one special character, one number, and no spaces.",
            );
        }

        if errors.require(
            "confirm_password",
            &self.confirm_password,
            "Please confirm your password",
        ) && self.password != self.confirm_password
        {
            errors.add("confirm_password", "Passwords do not match.");
        }

        errors
    }

    pub fn is_valid(&self) -> bool {
        self.check().is_empty()
    }

    pub fn to_request(&self) -> RegisterRequest {
        RegisterRequest {
            email: self.email.trim().to_string(),
            username: self.username.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            password: self.password.clone(),
            confirm_password: self.confirm_password.clone(),
        }
    }
}

/// The emailed code entered on the verification step
#[derive(Debug, Clone, Default)]
pub struct OtpForm {
    pub otp: String,
}

impl OtpForm {
    pub fn check(&self) -> FormErrors {
        let mut errors = FormErrors::default();
        if errors.require("otp", &self.otp, "OTP is required")
            && !self.otp.trim().chars().all(|c| c.is_ascii_alphanumeric())
        {
            errors.add("otp", "OTP must contain only letters and digits");
        }
        errors
    }

    pub fn is_valid(&self) -> bool {
        self.check().is_empty()
    }
}

fn is_valid_username(username: &str) -> bool {
    !username.is_empty()
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_alphabetic(value: &str) -> bool {
    !value.is_empty() && value.chars().all(char::is_alphabetic)
}

fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= PASSWORD_MIN_LENGTH
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(c))
        && !password.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign_up() -> SignUpForm {
        SignUpForm {
            email: "ada@gmail.com".to_string(),
            username: "ada_l".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            password: "Secret1!".to_string(),
            confirm_password: "Secret1!".to_string(),
        }
    }

    #[test]
    fn sign_in_requires_both_fields() {
        let errors = SignInForm::default().check();
        assert_eq!(errors.get("email"), Some("Email is required"));
        assert_eq!(errors.get("password"), Some("Password is required"));
    }

    #[test]
    fn sign_in_rejects_short_password() {
        let form = SignInForm {
            email: "ada@example.com".to_string(),
            password: "12345".to_string(),
        };
        let errors = form.check();
        assert_eq!(
            errors.get("password"),
            Some("Password must be at least 6 characters")
        );
        assert!(errors.get("email").is_none());
        assert!(!form.is_valid());
    }

    #[test]
    fn sign_in_rejects_malformed_email() {
        let form = SignInForm {
            email: "not-an-email".to_string(),
            password: "123456".to_string(),
        };
        assert_eq!(
            form.check().get("email"),
            Some("Please enter a valid email address")
        );

        let without_tld = SignInForm {
            email: "ada@gmail".to_string(),
            password: "123456".to_string(),
        };
        assert!(!without_tld.is_valid());
        assert_eq!(
            without_tld.check().get("email"),
            Some("Please enter a valid email address")
        );

        let valid = SignInForm {
            email: "Ada.Lovelace+pins@Example.CO".to_string(),
            password: "123456".to_string(),
        };
        assert!(valid.is_valid());
    }

    #[test]
    fn sign_up_accepts_complete_form() {
        assert!(sign_up().is_valid());
        let request = sign_up().to_request();
        assert_eq!(request.username, "ada_l");
        assert_eq!(request.confirm_password, "Secret1!");
    }

    #[test]
    fn sign_up_checks_username_and_names() {
        let mut form = sign_up();
        form.username = "ada lovelace".to_string();
        form.first_name = "Ada2".to_string();
        let errors = form.check();
        assert_eq!(
            errors.get("username"),
            Some("Username must be alphanumeric or contain underscores only.")
        );
        assert_eq!(
            errors.get("first_name"),
            Some("First name must contain only alphabetic characters.")
        );
        assert_eq!(
            errors.first_message(&SignUpForm::FIELDS),
            Some("Username must be alphanumeric or contain underscores only.")
        );
    }

    #[test]
    fn sign_up_checks_password_rules() {
        let mut form = sign_up();
        form.password = "secret1".to_string();
        form.confirm_password = "secret1".to_string();
        assert!(form
            .check()
            .get("password")
            .unwrap()
            .starts_with("Password must contain"));

        let mut form = sign_up();
        form.confirm_password = "Secret2!".to_string();
        assert_eq!(
            form.check().get("confirm_password"),
            Some("Passwords do not match.")
        );
    }

    #[test]
    fn otp_is_required() {
        assert_eq!(OtpForm::default().check().get("otp"), Some("OTP is required"));
        assert!(OtpForm { otp: " 123456 ".to_string() }.is_valid());
    }
}
