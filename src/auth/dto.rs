use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::JwtKeys;
use crate::users::dto::{Sex, UserResponse};

/// Request body for user registration.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "Email must be a valid address."))]
    pub email: String,
    #[validate(
        length(min = 3, max = 100, message = "Username must be 3 to 100 characters long."),
        custom = "crate::validate::username_charset"
    )]
    pub username: String,
    #[validate(
        length(min = 8, message = "Password must contain at least 8 characters."),
        custom = "crate::validate::password_strength"
    )]
    pub password: String,
    #[validate(length(min = 1, max = 255, message = "Full name must be 1 to 255 characters long."))]
    pub full_name: String,
    pub sex: Sex,
    #[validate(length(max = 50, message = "Phone number must be at most 50 characters long."))]
    pub phone_number: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Address line 1 must be 1 to 255 characters long."))]
    pub address_line_1: String,
    #[validate(length(max = 255, message = "Address line 2 must be at most 255 characters long."))]
    pub address_line_2: Option<String>,
    #[validate(length(min = 1, max = 100, message = "City must be 1 to 100 characters long."))]
    pub city: String,
    #[validate(length(min = 1, max = 10, message = "State/province code must be 1 to 10 characters long."))]
    pub state_province_code: String,
    #[validate(length(equal = 2, message = "Country code must be ISO 3166-1 alpha-2."))]
    pub country_code: String,
    #[validate(length(min = 1, max = 20, message = "Postal code must be 1 to 20 characters long."))]
    pub postal_code: String,
}

/// Request body for login. The identifier may be an email or a username.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Login must not be empty."))]
    pub login: String,
    #[validate(length(min = 1, message = "Password must not be empty."))]
    pub password: String,
}

/// Response returned after login and refresh.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub user: UserResponse,
}

impl TokenResponse {
    pub fn new(access_token: String, keys: &JwtKeys, user: UserResponse) -> Self {
        Self {
            access_token,
            token_type: "bearer",
            expires_in: keys.expires_in_secs(),
            user,
        }
    }
}
