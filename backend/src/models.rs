pub use shared::{
    Coordinate, GenerateRoutesRequest, GenerateRoutesResponse, GeneratedRoute, GeocodeResult,
    GpxExportResponse, RouteStep, TransportMode,
};

/// OSRM profile name for a transport mode.
pub fn routing_profile(mode: TransportMode) -> &'static str {
    match mode {
        TransportMode::Car => "driving",
        TransportMode::Bike => "cycling",
        TransportMode::Walk => "foot",
    }
}
