use axum::{routing::post, Router};

use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod service;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .route("/auth/logout", post(handlers::logout))
        .route("/auth/refresh", post(handlers::refresh))
}
