pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::screening::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/analyses",
            post(handlers::handle_analyze).get(handlers::handle_list),
        )
        .route("/api/v1/analyses/filter", get(handlers::handle_filter))
        .route("/api/v1/analyses/search", get(handlers::handle_search))
        .with_state(state)
}
