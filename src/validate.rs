//! Request validation: a `Json` extractor that also runs the declarative
//! field rules on the payload, plus the custom field validators shared by
//! the auth and profile schemas.
//!
//! An unparseable body is a 400; a parseable body that breaks a field rule
//! is a 422 listing every violated field.

use axum::async_trait;
use axum::extract::{FromRequest, Request};
use axum::Json;
use lazy_static::lazy_static;
use regex::Regex;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError};

use crate::error::ApiError;

pub struct ValidJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidJson(value))
    }
}

lazy_static! {
    static ref USERNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_-]+$").unwrap();
}

pub fn username_charset(username: &str) -> Result<(), ValidationError> {
    if USERNAME_RE.is_match(username) {
        return Ok(());
    }
    let mut err = ValidationError::new("username_charset");
    err.message =
        Some("Username must contain only letters, numbers, underscores, and hyphens.".into());
    Err(err)
}

pub fn password_strength(password: &str) -> Result<(), ValidationError> {
    if !password.chars().any(|c| c.is_ascii_digit()) {
        let mut err = ValidationError::new("password_digit");
        err.message = Some("Password must contain at least one digit.".into());
        return Err(err);
    }
    if !password.chars().any(|c| c.is_alphabetic()) {
        let mut err = ValidationError::new("password_letter");
        err.message = Some("Password must contain at least one letter.".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_accepts_allowed_charset() {
        assert!(username_charset("alice_01-x").is_ok());
    }

    #[test]
    fn username_rejects_spaces_and_symbols() {
        assert!(username_charset("alice smith").is_err());
        assert!(username_charset("alice!").is_err());
    }

    #[test]
    fn password_needs_a_digit() {
        let err = password_strength("onlyletters").unwrap_err();
        assert_eq!(err.code, "password_digit");
    }

    #[test]
    fn password_needs_a_letter() {
        let err = password_strength("12345678").unwrap_err();
        assert_eq!(err.code, "password_letter");
    }

    #[test]
    fn password_with_both_passes() {
        assert!(password_strength("passw0rd").is_ok());
    }
}
