use serde::{Deserialize, Deserializer, Serialize};

use crate::web::middleware::i18n::current_locale;
use crate::web::validation::{is_valid_email, FieldErrors, Validate};

pub mod plan_models;
pub mod user_models;

pub use user_models::*;

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.name.trim().is_empty() {
            errors.add("name", t!("validation.required", locale = &current_locale()));
        }
        if !is_valid_email(&self.email) {
            errors.add("email", t!("validation.invalid_email", locale = &current_locale()));
        }
        if self.password.chars().count() < 8 {
            errors.add("password", t!("validation.password_too_short", locale = &current_locale()));
        }
        errors.into_result()
    }
}

/// Email/password pair, used both for signing in and for linking the broker account.
#[derive(Debug, Serialize, Deserialize)]
pub struct EmailPasswordRequest {
    pub email: String,
    pub password: String,
}

impl Validate for EmailPasswordRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if !is_valid_email(&self.email) {
            errors.add("email", t!("validation.invalid_email", locale = &current_locale()));
        }
        if self.password.is_empty() {
            errors.add("password", t!("validation.required", locale = &current_locale()));
        }
        errors.into_result()
    }
}

pub type LoginRequest = EmailPasswordRequest;
pub type AuthenticateRequest = EmailPasswordRequest;

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthenticateResponse {
    pub balance: f64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub user_id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user_id: String,
    pub name: String,
}

// JWT Claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // email
    pub user_id: String,
    pub exp: usize,
}

/// Struct to hold authenticated user details, to be passed as a request extension.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: String,
    pub email: String,
}

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
/// Use together with `#[serde(default)]`.
pub fn deserialize_nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
