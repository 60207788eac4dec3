use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

pub mod handlers;
pub mod templates;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::home))
        .route("/game", get(handlers::game))
        .route("/styles.css", get(handlers::styles))
        .route("/train", post(handlers::train))
}
