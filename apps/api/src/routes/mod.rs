pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use tower_http::catch_panic::CatchPanicLayer;

use crate::errors::handle_panic;
use crate::review::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/review", post(handlers::handle_review))
        // Path used by the original serverless deployment
        .route("/api/review", post(handlers::handle_review))
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
}
