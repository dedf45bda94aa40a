use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};
use serde::Deserialize;

use crate::{
    AppState, assembler,
    config::ServiceConfig,
    error::ApiError,
    gpx_export::encode_route_as_gpx,
    models::{
        GenerateRoutesRequest, GenerateRoutesResponse, GeneratedRoute, GeocodeResult,
        GpxExportResponse,
    },
    road_routing::routed_paths,
};

/// POST /api/routes/generate - synthesize candidates and snap them to roads
pub async fn generate_routes(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRoutesRequest>, JsonRejection>,
) -> Result<Json<GenerateRoutesResponse>, ApiError> {
    let Json(req) = payload.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
    validate_request(&req, &state.config)?;

    tracing::info!(
        "Route request from {:?} to {:?}: {} route(s), {:.1} km, {:?}",
        req.start,
        req.end,
        req.num_routes,
        req.distance_km,
        req.mode
    );

    let GenerateRoutesRequest {
        start,
        end,
        mode,
        num_routes,
        distance_km,
    } = req;

    let candidates = tokio::task::spawn_blocking(move || {
        assembler::generate_routes(start, end, num_routes, distance_km)
    })
    .await
    .map_err(|err| ApiError::Internal(format!("route generation failed: {err}")))?;

    let routes = routed_paths(state.router.as_ref(), candidates, mode, state.config.routing).await;

    Ok(Json(GenerateRoutesResponse { routes, mode }))
}

/// Reject requests before any generation work starts.
///
/// A zero latitude or longitude counts as missing.
pub fn validate_request(req: &GenerateRoutesRequest, config: &ServiceConfig) -> Result<(), ApiError> {
    let start = req.start;
    if start.lat == 0.0 || start.lon == 0.0 || !start.is_finite() {
        return Err(ApiError::Validation(
            "Start coordinates (lat and lon) are required".to_string(),
        ));
    }
    if let Some(end) = req.end {
        if !end.is_finite() {
            return Err(ApiError::Validation(
                "End coordinates must be finite numbers".to_string(),
            ));
        }
    }
    if req.num_routes == 0 || req.num_routes > config.max_routes {
        return Err(ApiError::Validation(format!(
            "numRoutes must be between 1 and {}",
            config.max_routes
        )));
    }
    if !req.distance_km.is_finite()
        || req.distance_km <= 0.0
        || req.distance_km > config.max_distance_km
    {
        return Err(ApiError::Validation(format!(
            "distanceKm must be greater than 0 and at most {}",
            config.max_distance_km
        )));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct GeocodeQuery {
    #[serde(default)]
    pub q: String,
}

/// GET /api/geocode?q=... - best match for a free-text address
pub async fn geocode(
    State(state): State<AppState>,
    Query(query): Query<GeocodeQuery>,
) -> Result<Json<GeocodeResult>, ApiError> {
    let text = query.q.trim();
    if text.is_empty() {
        return Err(ApiError::Validation("Query parameter q is required".to_string()));
    }

    match state.geocoder.geocode(text).await? {
        Some(result) => Ok(Json(result)),
        None => Err(ApiError::NotFound(format!("No location found for '{text}'"))),
    }
}

/// POST /api/routes/gpx - export one generated route as GPX
pub async fn export_gpx(
    payload: Result<Json<GeneratedRoute>, JsonRejection>,
) -> Result<Json<GpxExportResponse>, ApiError> {
    let Json(route) = payload.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
    let gpx_base64 = encode_route_as_gpx(&route)?;
    Ok(Json(GpxExportResponse { gpx_base64 }))
}

/// GET /api/health
pub async fn health() -> &'static str {
    "ok"
}
