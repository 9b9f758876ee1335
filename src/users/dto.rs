use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use validator::Validate;

use crate::users::repo::{ProfileChanges, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sex {
    Male,
    Female,
    Other,
}

impl Sex {
    pub fn as_str(self) -> &'static str {
        match self {
            Sex::Male => "MALE",
            Sex::Female => "FEMALE",
            Sex::Other => "OTHER",
        }
    }
}

/// Public view of a user. Password material is not part of this type, so it
/// cannot end up in a response by accident.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub full_name: String,
    pub sex: String,
    pub phone_number: Option<String>,
    pub address_line_1: String,
    pub address_line_2: Option<String>,
    pub city: String,
    pub state_province_code: String,
    pub country_code: String,
    pub postal_code: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            full_name: user.full_name,
            sex: user.sex,
            phone_number: user.phone_number,
            address_line_1: user.address_line_1,
            address_line_2: user.address_line_2,
            city: user.city,
            state_province_code: user.state_province_code,
            country_code: user.country_code,
            postal_code: user.postal_code,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Sparse profile patch: every field optional, omitted fields untouched.
/// The state/province bound here is stricter than at registration, matching
/// the published API.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateRequest {
    #[validate(length(min = 1, max = 255, message = "Full name must be 1 to 255 characters long."))]
    pub full_name: Option<String>,
    pub sex: Option<Sex>,
    #[validate(length(max = 50, message = "Phone number must be at most 50 characters long."))]
    pub phone_number: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Address line 1 must be 1 to 255 characters long."))]
    pub address_line_1: Option<String>,
    #[validate(length(max = 255, message = "Address line 2 must be at most 255 characters long."))]
    pub address_line_2: Option<String>,
    #[validate(length(min = 1, max = 100, message = "City must be 1 to 100 characters long."))]
    pub city: Option<String>,
    #[validate(length(equal = 2, message = "State/province code must be exactly 2 characters."))]
    pub state_province_code: Option<String>,
    #[validate(length(equal = 2, message = "Country code must be ISO 3166-1 alpha-2."))]
    pub country_code: Option<String>,
    #[validate(length(min = 1, max = 20, message = "Postal code must be 1 to 20 characters long."))]
    pub postal_code: Option<String>,
}

impl From<ProfileUpdateRequest> for ProfileChanges {
    fn from(patch: ProfileUpdateRequest) -> Self {
        Self {
            full_name: patch.full_name,
            sex: patch.sex.map(|s| s.as_str().to_string()),
            phone_number: patch.phone_number,
            address_line_1: patch.address_line_1,
            address_line_2: patch.address_line_2,
            city: patch.city,
            state_province_code: patch.state_province_code,
            // stored upper-cased regardless of input case
            country_code: patch.country_code.map(|c| c.to_uppercase()),
            postal_code: patch.postal_code,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChangeRequest {
    #[validate(length(min = 1, message = "Current password must not be empty."))]
    pub current_password: String,
    #[validate(
        length(min = 8, message = "Password must contain at least 8 characters."),
        custom = "crate::validate::password_strength"
    )]
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_patch() -> ProfileUpdateRequest {
        serde_json::from_str("{}").expect("empty patch deserializes")
    }

    #[test]
    fn empty_patch_is_valid_and_changes_nothing() {
        let patch = empty_patch();
        assert!(patch.validate().is_ok());
        let changes = ProfileChanges::from(patch);
        assert!(changes.full_name.is_none());
        assert!(changes.country_code.is_none());
    }

    #[test]
    fn country_code_is_uppercased() {
        let patch = ProfileUpdateRequest {
            country_code: Some("ca".into()),
            ..empty_patch()
        };
        let changes = ProfileChanges::from(patch);
        assert_eq!(changes.country_code.as_deref(), Some("CA"));
    }

    #[test]
    fn oversized_state_province_code_is_rejected() {
        let patch = ProfileUpdateRequest {
            state_province_code: Some("ABC".into()),
            ..empty_patch()
        };
        let errors = patch.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("state_province_code"));
    }

    #[test]
    fn sex_deserializes_from_wire_values() {
        let patch: ProfileUpdateRequest =
            serde_json::from_str(r#"{"sex": "FEMALE"}"#).expect("valid sex");
        assert_eq!(patch.sex, Some(Sex::Female));
        assert!(serde_json::from_str::<ProfileUpdateRequest>(r#"{"sex": "female"}"#).is_err());
    }

    #[test]
    fn new_password_needs_digit_and_letter() {
        let body = PasswordChangeRequest {
            current_password: "oldpass123".into(),
            new_password: "lettersonly".into(),
        };
        let errors = body.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("new_password"));

        let body = PasswordChangeRequest {
            current_password: "oldpass123".into(),
            new_password: "NewPass123".into(),
        };
        assert!(body.validate().is_ok());
    }

    #[test]
    fn user_response_never_carries_password_material() {
        let now = time::OffsetDateTime::UNIX_EPOCH;
        let response = UserResponse {
            id: 1,
            email: "existing@test.com".into(),
            username: "existinguser".into(),
            full_name: "Existing User".into(),
            sex: "MALE".into(),
            phone_number: None,
            address_line_1: "123 Test St".into(),
            address_line_2: None,
            city: "Test City".into(),
            state_province_code: "TC".into(),
            country_code: "US".into(),
            postal_code: "12345".into(),
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"fullName\":\"Existing User\""));
        assert!(json.contains("\"stateProvinceCode\":\"TC\""));
        assert!(json.contains("\"createdAt\""));
        assert!(!json.to_lowercase().contains("password"));
    }
}
