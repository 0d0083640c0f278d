use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

pub fn router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;
    Router::new()
        .route("/", get(handlers::index))
        .route("/save", post(handlers::save_form))
        .route("/api/save", post(handlers::save))
        .route("/api/log", get(handlers::get_log))
        .route("/api/stats", get(handlers::get_stats))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
