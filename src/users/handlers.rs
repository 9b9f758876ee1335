use axum::{extract::State, http::StatusCode, Json};
use tracing::{info, instrument, warn};

use crate::{
    auth::{jwt::AuthUser, service},
    error::ApiError,
    state::AppState,
    users::{
        dto::{PasswordChangeRequest, ProfileUpdateRequest, UserResponse},
        repo::{ProfileChanges, User},
    },
    validate::ValidJson,
};

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User not found".into()))?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, patch))]
pub async fn update_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ValidJson(patch): ValidJson<ProfileUpdateRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let changes = ProfileChanges::from(patch);
    let user = User::update_profile(&state.db, user_id, &changes)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User not found".into()))?;
    info!(user_id, "profile updated");
    Ok(Json(user.into()))
}

#[instrument(skip(state, body))]
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ValidJson(body): ValidJson<PasswordChangeRequest>,
) -> Result<StatusCode, ApiError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User not found".into()))?;

    if !service::verify_user_password(&user, &body.current_password) {
        warn!(user_id, "password change with wrong current password");
        return Err(ApiError::Forbidden("Invalid current password".into()));
    }

    service::change_password(&state.db, &user, &body.new_password).await?;
    Ok(StatusCode::NO_CONTENT)
}
