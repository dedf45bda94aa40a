use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{Body, to_bytes},
    http::Request,
};
use hyper::StatusCode;
use route_synth::{
    AppState,
    config::ServiceConfig,
    create_router,
    error::{GeocodeError, RouterError},
    geocode::Geocoder,
    models::{
        Coordinate, GenerateRoutesResponse, GeocodeResult, GpxExportResponse, RouteStep,
        TransportMode,
    },
    osrm::{RoadPath, RoadRouter},
};
use serde_json::{Value, json};
use tower::ServiceExt;

const STOCKHOLM: Coordinate = Coordinate {
    lat: 59.33,
    lon: 18.06,
};

/// Echoes the requested points back as the "road" geometry.
struct EchoRouter;

#[async_trait]
impl RoadRouter for EchoRouter {
    async fn route(&self, points: &[Coordinate], _profile: &str) -> Result<RoadPath, RouterError> {
        Ok(RoadPath {
            points: points.to_vec(),
            distance_m: 5000.0,
            duration_s: 3600.0,
            steps: vec![RouteStep {
                instruction: "Continue on road".into(),
                distance: 5000.0,
                duration: 3600.0,
            }],
        })
    }
}

struct DownRouter;

#[async_trait]
impl RoadRouter for DownRouter {
    async fn route(&self, _points: &[Coordinate], _profile: &str) -> Result<RoadPath, RouterError> {
        Err(RouterError::NoRoute)
    }
}

struct FixedGeocoder;

#[async_trait]
impl Geocoder for FixedGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<GeocodeResult>, GeocodeError> {
        if query.eq_ignore_ascii_case("stockholm") {
            Ok(Some(GeocodeResult {
                lat: STOCKHOLM.lat,
                lon: STOCKHOLM.lon,
                display_name: "Stockholm, Sverige".into(),
            }))
        } else {
            Ok(None)
        }
    }
}

fn test_app(router: Arc<dyn RoadRouter>) -> axum::Router {
    let state = AppState {
        router,
        geocoder: Arc::new(FixedGeocoder),
        config: ServiceConfig::default(),
    };
    create_router(state)
}

fn post_json(uri: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn read_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn loop_request_returns_routed_batch() {
    let app = test_app(Arc::new(EchoRouter));
    let payload = json!({
        "start": {"lat": 59.33, "lon": 18.06},
        "mode": "bike",
        "numRoutes": 2,
        "distanceKm": 4
    });

    let response = app.oneshot(post_json("/api/routes/generate", &payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: GenerateRoutesResponse = read_json(response).await;
    assert_eq!(body.mode, TransportMode::Bike);
    assert_eq!(body.routes.len(), 2);
    assert_eq!(body.routes[0].waypoints.len(), 3);
    assert_eq!(body.routes[1].waypoints.len(), 4);
    for (i, route) in body.routes.iter().enumerate() {
        assert_eq!(route.id, i);
        assert!(route.is_loop);
        assert_eq!(route.points.first(), Some(&STOCKHOLM));
        assert_eq!(route.points.last(), Some(&STOCKHOLM));
        assert_eq!(route.distance, 5.0);
        assert_eq!(route.duration, Some(60.0));
        assert_eq!(route.steps.as_ref().map(Vec::len), Some(1));
    }
}

#[tokio::test]
async fn defaults_apply_to_minimal_request() {
    let app = test_app(Arc::new(DownRouter));
    let payload = json!({"start": {"lat": 59.33, "lon": 18.06}});

    let response = app.oneshot(post_json("/api/routes/generate", &payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = read_json(response).await;
    assert_eq!(body["mode"], "walk");
    let routes = body["routes"].as_array().unwrap();
    assert_eq!(routes.len(), 3);
    for route in routes {
        assert_eq!(route["isLoop"], true);
        assert!(route.get("steps").is_none());
        assert!(route.get("duration").is_none());
    }
}

#[tokio::test]
async fn router_outage_keeps_straight_line_point_to_point_routes() {
    let app = test_app(Arc::new(DownRouter));
    let payload = json!({
        "start": {"lat": 59.33, "lon": 18.06},
        "end": {"lat": 59.35, "lon": 18.2},
        "mode": "car",
        "numRoutes": 3,
        "distanceKm": 15
    });

    let response = app.oneshot(post_json("/api/routes/generate", &payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: GenerateRoutesResponse = read_json(response).await;
    let end = Coordinate {
        lat: 59.35,
        lon: 18.2,
    };
    assert_eq!(body.routes.len(), 3);
    for route in &body.routes {
        assert!(!route.is_loop);
        assert_eq!(route.points.first(), Some(&STOCKHOLM));
        assert_eq!(route.points.last(), Some(&end));
        assert!(!route.waypoints.is_empty());
        assert!(route.steps.is_none());
        assert!(route.distance > 0.0);
    }
}

#[tokio::test]
async fn missing_start_is_rejected() {
    let app = test_app(Arc::new(EchoRouter));

    for payload in [
        json!({"numRoutes": 2}),
        json!({"start": {"lat": 59.33}}),
        json!({"start": {"lat": 0, "lon": 18.06}}),
        json!({"start": {"lat": 59.33, "lon": 0}}),
    ] {
        let response = app
            .clone()
            .oneshot(post_json("/api/routes/generate", &payload))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{payload}");

        let body: Value = read_json(response).await;
        assert!(!body["message"].as_str().unwrap().is_empty());
    }
}

#[tokio::test]
async fn out_of_range_route_count_is_rejected() {
    let app = test_app(Arc::new(EchoRouter));
    let payload = json!({"start": {"lat": 59.33, "lon": 18.06}, "numRoutes": 0});

    let response = app.oneshot(post_json("/api/routes/generate", &payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn gpx_export_round_trips_points() {
    let app = test_app(Arc::new(EchoRouter));
    let payload = json!({
        "id": 0,
        "points": [{"lat": 59.33, "lon": 18.06}, {"lat": 59.34, "lon": 18.07}, {"lat": 59.33, "lon": 18.06}],
        "waypoints": [{"lat": 59.34, "lon": 18.07}],
        "isLoop": true,
        "distance": 2.3
    });

    let response = app.oneshot(post_json("/api/routes/gpx", &payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: GpxExportResponse = read_json(response).await;
    assert!(!body.gpx_base64.is_empty());
}

#[tokio::test]
async fn geocode_endpoint() {
    let app = test_app(Arc::new(EchoRouter));

    let response = app.clone().oneshot(get("/api/geocode?q=Stockholm")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: GeocodeResult = read_json(response).await;
    assert_eq!(body.lat, 59.33);
    assert_eq!(body.display_name, "Stockholm, Sverige");

    let response = app.clone().oneshot(get("/api/geocode?q=Atlantis")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.oneshot(get("/api/geocode?q=%20")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_endpoint() {
    let app = test_app(Arc::new(EchoRouter));
    let response = app.oneshot(get("/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
