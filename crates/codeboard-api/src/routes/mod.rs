//! Route definitions
//!
//! Board routes are mounted under /api.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{codes, health, users};
use crate::state::AppState;

/// Create the main API router (excluding health for separate middleware handling)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api", api_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_routes() -> Router<AppState> {
    Router::new().merge(code_routes()).merge(user_routes())
}

/// Code routes
fn code_routes() -> Router<AppState> {
    Router::new()
        .route("/codes", get(codes::list_codes).post(codes::post_code))
        .route("/codes/:code_id/claim", post(codes::claim_code))
}

/// User routes
fn user_routes() -> Router<AppState> {
    Router::new().route("/user/stats", get(users::get_stats))
}
