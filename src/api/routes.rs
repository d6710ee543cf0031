use axum::Router;
use axum::routing::{get, post, put};
use tower_http::trace::TraceLayer;

use crate::api::handlers;
use crate::api::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/table", post(handlers::create_table))
        .route("/table/{id}", put(handlers::update_table))
        .route("/table/{id}/row", post(handlers::add_row))
        .route("/table/{id}/rows", get(handlers::get_rows))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
