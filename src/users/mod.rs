use axum::{
    routing::{get, put},
    Router,
};

use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/me", get(handlers::get_me).put(handlers::update_me))
        .route("/users/me/password", put(handlers::change_password))
}
