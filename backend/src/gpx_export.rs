use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use geo_types::Point;
use gpx::{Gpx, GpxVersion, Track, TrackSegment, Waypoint};

use crate::error::ExportError;
use crate::models::{Coordinate, GeneratedRoute};

/// Encode a generated route as a base64 GPX 1.1 document with one track.
pub fn encode_route_as_gpx(route: &GeneratedRoute) -> Result<String, ExportError> {
    if route.points.is_empty() {
        return Err(ExportError::EmptyRoute);
    }

    let mut gpx = Gpx {
        version: GpxVersion::Gpx11,
        creator: Some("route_synth".into()),
        ..Default::default()
    };
    let kind = if route.is_loop { "loop" } else { "route" };
    let mut track = Track {
        name: Some(format!("{kind} {} ({:.1} km)", route.id, route.distance)),
        ..Default::default()
    };

    let mut segment = TrackSegment::new();
    segment.points.extend(route.points.iter().map(to_waypoint));
    track.segments.push(segment);
    gpx.tracks.push(track);

    let mut buffer = Vec::new();
    gpx::write(&gpx, &mut buffer)?;
    Ok(BASE64.encode(buffer))
}

fn to_waypoint(coord: &Coordinate) -> Waypoint {
    Waypoint::new(Point::new(coord.lon, coord.lat))
}
