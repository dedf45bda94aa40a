use std::time::Duration;

use futures::stream::{self, StreamExt};

use crate::{
    error::RouterError,
    models::{GeneratedRoute, TransportMode, routing_profile},
    osrm::{RoadPath, RoadRouter},
};

pub const DEFAULT_ROUTER_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

#[derive(Debug, Clone, Copy)]
pub struct RoutingOptions {
    /// Upper bound for a single router call.
    pub timeout: Duration,
    /// Router calls in flight at once for one batch.
    pub max_concurrency: usize,
}

impl Default for RoutingOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_ROUTER_TIMEOUT,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

/// Snap every candidate onto real roads.
///
/// One router call per route, at most `max_concurrency` in flight, results
/// reassembled in input order. A route whose call fails or times out is
/// returned unchanged and its siblings are unaffected.
pub async fn routed_paths(
    router: &dyn RoadRouter,
    routes: Vec<GeneratedRoute>,
    mode: TransportMode,
    options: RoutingOptions,
) -> Vec<GeneratedRoute> {
    let profile = routing_profile(mode);
    let total = routes.len();

    let routed: Vec<GeneratedRoute> = stream::iter(routes)
        .map(|route| route_one(router, route, profile, options.timeout))
        .buffered(options.max_concurrency.max(1))
        .collect()
        .await;

    let snapped = routed.iter().filter(|r| r.steps.is_some()).count();
    tracing::info!("road routing ({profile}): {snapped}/{total} route(s) snapped to roads");

    routed
}

async fn route_one(
    router: &dyn RoadRouter,
    route: GeneratedRoute,
    profile: &str,
    timeout: Duration,
) -> GeneratedRoute {
    let result = match tokio::time::timeout(timeout, router.route(&route.points, profile)).await {
        Ok(result) => result,
        Err(_) => Err(RouterError::Timeout(timeout)),
    };

    match result {
        Ok(path) => {
            tracing::debug!(
                "route {} snapped: {} points, {:.2} km",
                route.id,
                path.points.len(),
                path.distance_m / 1000.0
            );
            apply_road_path(route, path)
        }
        Err(err) => {
            tracing::warn!("route {} keeps its straight-line geometry: {err}", route.id);
            route
        }
    }
}

/// Replace a candidate's geometry with the router's path. `id`, `waypoints`
/// and `is_loop` are kept.
pub fn apply_road_path(route: GeneratedRoute, path: RoadPath) -> GeneratedRoute {
    GeneratedRoute {
        points: path.points,
        distance: path.distance_m / 1000.0,
        duration: Some(path.duration_s / 60.0),
        steps: Some(path.steps),
        ..route
    }
}
