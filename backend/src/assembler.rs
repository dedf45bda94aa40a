use rand::Rng;
use rayon::prelude::*;

use crate::{
    geo::{haversine_km, route_distance_km},
    models::{Coordinate, GeneratedRoute},
    waypoints::{loop_waypoints, random_waypoints},
};

/// Rough path length, in km, that one extra point-to-point waypoint adds.
const KM_PER_DETOUR_WAYPOINT: f64 = 2.0;

/// Waypoint count for a point-to-point route: one per ~2 km of slack between
/// the requested distance and the direct distance, never fewer than one.
pub fn point_to_point_waypoint_count(start: Coordinate, end: Coordinate, distance_km: f64) -> usize {
    let direct_distance = haversine_km(start, end);
    let extra_distance = distance_km - direct_distance;
    let count = (extra_distance / KM_PER_DETOUR_WAYPOINT).floor();
    if count.is_finite() && count > 1.0 {
        count as usize
    } else {
        1
    }
}

/// Build one candidate route from `rng`.
///
/// `id` doubles as the variation index for loop routes, so routes of the same
/// batch point in different directions.
pub fn assemble_route<R: Rng + ?Sized>(
    rng: &mut R,
    id: usize,
    start: Coordinate,
    end: Option<Coordinate>,
    distance_km: f64,
) -> GeneratedRoute {
    let (waypoints, points) = match end {
        None => {
            let waypoints = loop_waypoints(rng, start, distance_km, id);
            let points = close_path(start, &waypoints, start);
            (waypoints, points)
        }
        Some(end) => {
            let count = point_to_point_waypoint_count(start, end, distance_km);
            let waypoints = random_waypoints(rng, start, end, count);
            let points = close_path(start, &waypoints, end);
            (waypoints, points)
        }
    };

    let distance = route_distance_km(&points);
    GeneratedRoute {
        id,
        points,
        waypoints,
        is_loop: end.is_none(),
        distance,
        duration: None,
        steps: None,
    }
}

/// Generate `num_routes` independent straight-line candidates.
///
/// Loop routes when `end` is `None`, point-to-point otherwise. Each route
/// draws from the calling worker's thread-local RNG, so no two calls produce
/// the same batch. Distances only approximate `distance_km`; nothing corrects
/// them afterwards.
pub fn generate_routes(
    start: Coordinate,
    end: Option<Coordinate>,
    num_routes: usize,
    distance_km: f64,
) -> Vec<GeneratedRoute> {
    let routes: Vec<GeneratedRoute> = (0..num_routes)
        .into_par_iter()
        .map(|id| assemble_route(&mut rand::thread_rng(), id, start, end, distance_km))
        .collect();

    tracing::debug!(
        "generated {} {} candidate(s), straight-line distances {:?}",
        routes.len(),
        if end.is_none() { "loop" } else { "point-to-point" },
        routes.iter().map(|r| (r.distance * 100.0).round() / 100.0).collect::<Vec<_>>()
    );

    routes
}

fn close_path(start: Coordinate, waypoints: &[Coordinate], end: Coordinate) -> Vec<Coordinate> {
    let mut points = Vec::with_capacity(waypoints.len() + 2);
    points.push(start);
    points.extend_from_slice(waypoints);
    points.push(end);
    points
}
