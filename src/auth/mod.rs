use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

mod dto;
pub mod handlers;
pub mod password;
pub mod validate;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/guest", post(handlers::guest))
        .route("/logout", post(handlers::logout))
        .route("/availability", get(handlers::availability))
}
