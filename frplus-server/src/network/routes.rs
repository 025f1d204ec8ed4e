use super::handlers::{
    create_factory, health_check, list_factories, price_history, reset_data, seed_admin,
};
use super::state::SharedState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

pub fn api_router() -> Router<SharedState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/factories", get(list_factories).post(create_factory))
        .route("/api/clients/:id/price-history", get(price_history))
        .route("/api/admin/seed", post(seed_admin))
        .route("/api/admin/reset", post(reset_data))
}

/// API routes plus static pages for everything else
pub fn app(state: SharedState) -> Router {
    let static_dir = ServeDir::new(&state.config.static_dir);

    api_router()
        .fallback_service(static_dir)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
