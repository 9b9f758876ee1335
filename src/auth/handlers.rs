use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::{info, instrument};

use crate::{
    auth::{
        dto::{LoginRequest, RegisterRequest, TokenResponse},
        jwt::{AuthUser, JwtKeys},
        service,
    },
    error::ApiError,
    state::AppState,
    users::{dto::UserResponse, repo::User},
    validate::ValidJson,
};

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = service::register(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let keys = JwtKeys::from_ref(&state);
    let (user, token) =
        service::login(&state.db, &keys, &payload.login, &payload.password).await?;
    Ok(Json(TokenResponse::new(token, &keys, user.into())))
}

/// Tokens are stateless, so logout is the client discarding its token; the
/// endpoint only confirms the caller was authenticated.
#[instrument]
pub async fn logout(AuthUser(user_id): AuthUser) -> Json<Value> {
    info!(user_id, "user logged out");
    Json(json!({ "message": "Logged out" }))
}

#[instrument(skip(state))]
pub async fn refresh(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<TokenResponse>, ApiError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User not found".into()))?;
    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id)?;
    info!(user_id, "token refreshed");
    Ok(Json(TokenResponse::new(token, &keys, user.into())))
}
