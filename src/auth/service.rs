//! Credential issuance and lifecycle: registration, login, password change.

use lazy_static::lazy_static;
use sqlx::PgPool;
use thiserror::Error;
use tracing::{info, warn};

use crate::auth::dto::RegisterRequest;
use crate::auth::jwt::JwtKeys;
use crate::auth::password::{hash_password, verify_password};
use crate::users::repo::{NewUser, User};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already registered")]
    DuplicateEmail,
    #[error("Username already taken")]
    DuplicateUsername,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

lazy_static! {
    // Verified against when a login identifier matches no user, so the
    // unknown-identifier path costs one argon2 verification like the
    // known-user path.
    static ref UNKNOWN_USER_HASH: String =
        hash_password("unknown-user-placeholder").expect("argon2 with default params");
}

pub async fn register(db: &PgPool, data: RegisterRequest) -> Result<User, AuthError> {
    if User::find_by_email(db, &data.email).await?.is_some() {
        warn!("registration with taken email");
        return Err(AuthError::DuplicateEmail);
    }
    if User::find_by_username(db, &data.username).await?.is_some() {
        warn!(username = %data.username, "registration with taken username");
        return Err(AuthError::DuplicateUsername);
    }

    let password_hash = hash_password(&data.password)?;
    let new = NewUser {
        email: data.email,
        username: data.username,
        password_hash,
        full_name: data.full_name,
        sex: data.sex.as_str().to_string(),
        phone_number: data.phone_number,
        address_line_1: data.address_line_1,
        address_line_2: data.address_line_2,
        city: data.city,
        state_province_code: data.state_province_code,
        country_code: data.country_code.to_uppercase(),
        postal_code: data.postal_code,
    };

    let user = User::create(db, &new).await.map_err(map_unique_violation)?;
    info!(user_id = user.id, username = %user.username, "user registered");
    Ok(user)
}

/// A concurrent registration can slip past the pre-checks; the database
/// constraint settles the race and its name says which field collided.
fn map_unique_violation(err: sqlx::Error) -> AuthError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") {
            let constraint = db_err.constraint().unwrap_or_default();
            if constraint.contains("email") {
                return AuthError::DuplicateEmail;
            }
            return AuthError::DuplicateUsername;
        }
    }
    AuthError::Other(err.into())
}

/// Unknown identifier and wrong password are deliberately indistinguishable
/// to the caller.
pub async fn login(
    db: &PgPool,
    keys: &JwtKeys,
    login: &str,
    password: &str,
) -> Result<(User, String), AuthError> {
    let Some(user) = User::find_by_login(db, login).await? else {
        let _ = verify_password(password, &UNKNOWN_USER_HASH);
        warn!("login with unknown identifier");
        return Err(AuthError::InvalidCredentials);
    };

    if !verify_password(password, &user.password_hash) {
        warn!(user_id = user.id, "login with wrong password");
        return Err(AuthError::InvalidCredentials);
    }

    let token = keys.sign(user.id)?;
    info!(user_id = user.id, "user logged in");
    Ok((user, token))
}

pub fn verify_user_password(user: &User, plain: &str) -> bool {
    verify_password(plain, &user.password_hash)
}

/// Replaces the stored hash. Previously issued tokens stay valid until they
/// expire; there is no revocation store.
pub async fn change_password(db: &PgPool, user: &User, new_plain: &str) -> Result<(), AuthError> {
    let password_hash = hash_password(new_plain)?;
    User::update_password(db, user.id, &password_hash).await?;
    info!(user_id = user.id, "password changed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn user_with_password(plain: &str) -> User {
        User {
            id: 1,
            email: "existing@test.com".into(),
            username: "existinguser".into(),
            password_hash: hash_password(plain).expect("hash"),
            full_name: "Existing User".into(),
            sex: "MALE".into(),
            phone_number: None,
            address_line_1: "123 Test St".into(),
            address_line_2: None,
            city: "Test City".into(),
            state_province_code: "TC".into(),
            country_code: "US".into(),
            postal_code: "12345".into(),
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn verify_user_password_matches_only_the_set_password() {
        let user = user_with_password("password123");
        assert!(verify_user_password(&user, "password123"));
        assert!(!verify_user_password(&user, "NewPass123"));
    }
}
