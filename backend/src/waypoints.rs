use std::f64::consts::PI;

use rand::Rng;

use crate::models::Coordinate;

/// Max jitter, in degrees, applied to each axis of a point-to-point waypoint.
const POINT_JITTER_DEG: f64 = 0.005;
const MIN_LOOP_WAYPOINTS: usize = 3;
const MAX_LOOP_WAYPOINTS: usize = 5;
/// Polygon perimeters fall short of the circle they are inscribed in.
const LOOP_RADIUS_INFLATION: f64 = 1.5;
const LOOP_ANGLE_JITTER_RAD: f64 = 0.15;
const LOOP_RADIUS_JITTER: (f64, f64) = (0.8, 1.2);
const KM_PER_DEGREE: f64 = 111.0;

/// Scatter `count` waypoints inside the box spanned by `start` and `end`.
///
/// Each axis is sampled independently, then nudged by up to
/// [`POINT_JITTER_DEG`] so the waypoints never sit exactly on the start/end
/// interpolation.
pub fn random_waypoints<R: Rng + ?Sized>(
    rng: &mut R,
    start: Coordinate,
    end: Coordinate,
    count: usize,
) -> Vec<Coordinate> {
    (0..count)
        .map(|_| {
            let lat = start.lat + rng.gen::<f64>() * (end.lat - start.lat);
            let lon = start.lon + rng.gen::<f64>() * (end.lon - start.lon);
            Coordinate {
                lat: lat + rng.gen_range(-POINT_JITTER_DEG..=POINT_JITTER_DEG),
                lon: lon + rng.gen_range(-POINT_JITTER_DEG..=POINT_JITTER_DEG),
            }
        })
        .collect()
}

/// Number of loop waypoints used for a given variation index.
pub fn loop_waypoint_count(variation_index: usize) -> usize {
    MIN_LOOP_WAYPOINTS
        .saturating_add(variation_index)
        .clamp(MIN_LOOP_WAYPOINTS, MAX_LOOP_WAYPOINTS)
}

/// Radius, in kilometers, of the circle the loop waypoints are placed on.
pub fn loop_base_radius_km(target_distance_km: f64) -> f64 {
    target_distance_km / (2.0 * PI) * LOOP_RADIUS_INFLATION
}

/// Place loop waypoints roughly evenly around a circle centered on `start`.
///
/// # Algorithm
///
/// The target distance is treated as the circumference of a circle, giving a
/// base radius of `target / 2π`, inflated by 1.5×. Each variation index
/// rotates the whole polygon by 120° so sibling routes fan out:
///
/// ```text
/// angle_i  = i / n · 2π + variation · 2π/3 + U(-0.15, 0.15)
/// radius_i = base · U(0.8, 1.2)
/// lat_i    = start.lat + sin(angle_i) · radius_i / 111
/// lon_i    = start.lon + cos(angle_i) · radius_i / (111 · cos(start.lat))
/// ```
///
/// Latitude takes the sine and longitude the cosine, so index 0 of an
/// unrotated polygon points due east.
///
/// The degree/km conversion is a local flat-Earth approximation and only holds
/// for short loops away from the poles.
pub fn loop_waypoints<R: Rng + ?Sized>(
    rng: &mut R,
    start: Coordinate,
    target_distance_km: f64,
    variation_index: usize,
) -> Vec<Coordinate> {
    let num_waypoints = loop_waypoint_count(variation_index);
    let base_radius_km = loop_base_radius_km(target_distance_km);

    let lat_per_km = 1.0 / KM_PER_DEGREE;
    let lon_per_km = 1.0 / (KM_PER_DEGREE * start.lat.to_radians().cos());

    let direction_offset = variation_index as f64 * (2.0 * PI / 3.0);

    (0..num_waypoints)
        .map(|i| {
            let base_angle = (i as f64 / num_waypoints as f64) * 2.0 * PI + direction_offset;
            let angle =
                base_angle + rng.gen_range(-LOOP_ANGLE_JITTER_RAD..=LOOP_ANGLE_JITTER_RAD);
            let radius =
                base_radius_km * rng.gen_range(LOOP_RADIUS_JITTER.0..=LOOP_RADIUS_JITTER.1);

            Coordinate {
                lat: start.lat + angle.sin() * radius * lat_per_km,
                lon: start.lon + angle.cos() * radius * lon_per_km,
            }
        })
        .collect()
}
