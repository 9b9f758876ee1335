use std::time::Duration;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, warn};

use crate::config::JwtConfig;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub exp: usize,
    pub iat: usize,
    pub iss: String,
    pub aud: String,
}

/// Why a presented token was rejected. Every variant maps to 401.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,
    #[error("Malformed token")]
    Malformed,
    #[error("Invalid token signature")]
    BadSignature,
    #[error("Missing Authorization header")]
    Missing,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::BadSignature,
            _ => TokenError::Malformed,
        }
    }
}

#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig {
            secret,
            issuer,
            audience,
            ttl_minutes,
        } = state.config.jwt.clone();
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            audience,
            ttl: Duration::from_secs((ttl_minutes as u64) * 60),
        }
    }
}

impl JwtKeys {
    pub fn sign(&self, user_id: i64) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            sub: user_id,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user_id, "jwt signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = %data.claims.sub, "jwt verified");
        Ok(data.claims)
    }

    pub fn expires_in_secs(&self) -> i64 {
        self.ttl.as_secs() as i64
    }
}

/// Extracts and validates the bearer token, yielding the subject user id.
pub struct AuthUser(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(TokenError::Missing)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .or_else(|| auth_header.strip_prefix("bearer "))
            .ok_or_else(|| ApiError::Unauthorized("Invalid Authorization header".into()))?;

        let claims = keys.verify(token).map_err(|e| {
            warn!(error = %e, "rejected bearer token");
            e
        })?;

        Ok(AuthUser(claims.sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Built directly rather than through `AppState::fake()`: the lazy pool
    // spawns maintenance tasks and needs a Tokio runtime these synchronous
    // tests do not have.
    fn make_keys() -> JwtKeys {
        keys_with_secret("test-secret")
    }

    fn keys_with_secret(secret: &str) -> JwtKeys {
        JwtKeys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            issuer: "test-issuer".into(),
            audience: "test-aud".into(),
            ttl: Duration::from_secs(300),
        }
    }

    #[test]
    fn sign_and_verify_roundtrip() {
        let keys = make_keys();
        let token = keys.sign(42).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.aud, "test-aud");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn verify_rejects_garbage_as_malformed() {
        let keys = make_keys();
        assert_eq!(keys.verify("not.a.jwt").unwrap_err(), TokenError::Malformed);
    }

    #[test]
    fn verify_rejects_token_signed_with_other_secret() {
        let keys = make_keys();
        let other = keys_with_secret("other-secret");
        let token = other.sign(42).expect("sign");
        assert_eq!(keys.verify(&token).unwrap_err(), TokenError::BadSignature);
    }

    #[test]
    fn verify_rejects_expired_token() {
        let keys = make_keys();
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = Claims {
            sub: 42,
            iat: (now - 7200) as usize,
            exp: (now - 3600) as usize,
            iss: "test-issuer".into(),
            aud: "test-aud".into(),
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).expect("encode");
        assert_eq!(keys.verify(&token).unwrap_err(), TokenError::Expired);
    }

    #[test]
    fn verify_rejects_wrong_issuer_or_audience() {
        let keys = make_keys();
        let mut foreign = keys_with_secret("test-secret");
        foreign.issuer = "someone-else".into();
        foreign.audience = "their-users".into();
        let token = foreign.sign(42).expect("sign");
        assert!(keys.verify(&token).is_err());
    }
}
