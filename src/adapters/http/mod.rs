pub mod routes;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};

use crate::adapters::http::state::HttpState;

pub fn router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(routes::home))
        .route("/api/config", get(routes::get_config))
        .route("/api/upload", post(routes::upload))
        .with_state(state)
}
