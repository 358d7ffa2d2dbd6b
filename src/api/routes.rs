use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::api::handlers::{
    tournaments::{get_tournament_detail, get_tournaments, health_check},
    AppState,
};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/tournaments", get(get_tournaments))
        .route("/api/tournaments/:id", get(get_tournament_detail))
        .route("/api/health", get(health_check))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
