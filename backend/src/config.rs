use std::{net::SocketAddr, time::Duration};

use clap::Parser;

use crate::road_routing::{DEFAULT_MAX_CONCURRENCY, RoutingOptions};

pub const DEFAULT_OSRM_URL: &str = "https://router.project-osrm.org";
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_MAX_ROUTES: usize = 10;
pub const DEFAULT_MAX_DISTANCE_KM: f64 = 200.0;

#[derive(Debug, Clone, Parser)]
#[command(
    author,
    version,
    about = "Generate randomized loop and point-to-point routes snapped to real roads"
)]
pub struct Args {
    /// Address the HTTP server listens on
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,

    /// Base URL of an OSRM-compatible routing service
    #[arg(long, env = "OSRM_URL", default_value = DEFAULT_OSRM_URL)]
    pub osrm_url: String,

    /// Base URL of a Nominatim geocoding service
    #[arg(long, env = "NOMINATIM_URL", default_value = DEFAULT_NOMINATIM_URL)]
    pub nominatim_url: String,

    /// Timeout for a single routing or geocoding call, in seconds
    #[arg(long, env = "ROUTER_TIMEOUT_SECS", default_value_t = 10)]
    pub router_timeout_secs: u64,

    /// Routing calls in flight at once per request
    #[arg(long, env = "ROUTER_MAX_CONCURRENCY", default_value_t = DEFAULT_MAX_CONCURRENCY)]
    pub max_concurrency: usize,

    /// Largest `numRoutes` a request may ask for
    #[arg(long, env = "MAX_ROUTES", default_value_t = DEFAULT_MAX_ROUTES)]
    pub max_routes: usize,

    /// Largest `distanceKm` a request may ask for
    #[arg(long, env = "MAX_DISTANCE_KM", default_value_t = DEFAULT_MAX_DISTANCE_KM)]
    pub max_distance_km: f64,
}

impl Args {
    pub fn router_timeout(&self) -> Duration {
        Duration::from_secs(self.router_timeout_secs.max(1))
    }

    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            routing: RoutingOptions {
                timeout: self.router_timeout(),
                max_concurrency: self.max_concurrency.max(1),
            },
            max_routes: self.max_routes,
            max_distance_km: self.max_distance_km,
        }
    }
}

/// Request limits and router settings shared by the handlers.
#[derive(Debug, Clone, Copy)]
pub struct ServiceConfig {
    pub routing: RoutingOptions,
    pub max_routes: usize,
    pub max_distance_km: f64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            routing: RoutingOptions::default(),
            max_routes: DEFAULT_MAX_ROUTES,
            max_distance_km: DEFAULT_MAX_DISTANCE_KM,
        }
    }
}
