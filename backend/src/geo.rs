use crate::models::Coordinate;

pub const EARTH_RADIUS_KM: f64 = 6_371.0;

/// Great-circle distance between two coordinates, in kilometers.
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let sin_dlat = (dlat / 2.0).sin();
    let sin_dlon = (dlon / 2.0).sin();

    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    // Rounding can push h a hair above 1 for antipodal pairs.
    2.0 * EARTH_RADIUS_KM * h.min(1.0).sqrt().asin()
}

/// Length of a polyline in kilometers; zero for fewer than two points.
pub fn route_distance_km(points: &[Coordinate]) -> f64 {
    points.windows(2).map(|w| haversine_km(w[0], w[1])).sum()
}
