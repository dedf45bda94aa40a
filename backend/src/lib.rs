pub mod assembler;
pub mod config;
pub mod error;
pub mod geo;
pub mod geocode;
pub mod gpx_export;
pub mod handlers;
pub mod models;
pub mod osrm;
pub mod road_routing;
pub mod waypoints;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::config::ServiceConfig;
use crate::geocode::Geocoder;
use crate::osrm::RoadRouter;

#[derive(Clone)]
pub struct AppState {
    pub router: Arc<dyn RoadRouter>,
    pub geocoder: Arc<dyn Geocoder>,
    pub config: ServiceConfig,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/routes/generate", post(handlers::generate_routes))
        .route("/api/routes/gpx", post(handlers::export_gpx))
        .route("/api/geocode", get(handlers::geocode))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
