use axum::{extract::rejection::JsonRejection, Json};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::web::error::AppError;
use crate::web::middleware::i18n::current_locale;

/// Field name → user-facing message. Field names follow the JSON payload.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message for `field`, keeping the first one reported.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.0.keys().map(String::as_str).collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

pub trait Validate {
    fn validate(&self) -> Result<(), FieldErrors>;
}

/// Unwraps a JSON body extracted as `Result<Json<T>, JsonRejection>` and runs
/// its validation. Malformed bodies become 400s instead of axum's 422.
pub fn parse_json<T: Validate>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    let Json(value) = payload.map_err(|rejection| AppError::InvalidInput(rejection.body_text()))?;
    value.validate()?;
    Ok(value)
}

pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

/// Checks that an amount is a finite, strictly positive number.
pub fn check_positive(errors: &mut FieldErrors, field: &str, value: f64) {
    if !value.is_finite() || value <= 0.0 {
        errors.add(field, t!("validation.invalid_value", locale = &current_locale()));
    }
}
