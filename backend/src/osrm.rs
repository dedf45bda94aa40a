use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::{
    error::RouterError,
    models::{Coordinate, RouteStep},
};

/// A road-following path as reported by the external router.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadPath {
    pub points: Vec<Coordinate>,
    pub distance_m: f64,
    pub duration_s: f64,
    pub steps: Vec<RouteStep>,
}

/// Turns an ordered list of coordinates into a road-following path.
///
/// Implementations report every failure as a [`RouterError`]; callers treat
/// all of them as soft failures.
///
/// # Example Implementations
/// - `OsrmClient`: HTTP client for an OSRM-compatible `/route/v1` API
/// - test doubles that answer from canned paths
#[async_trait]
pub trait RoadRouter: Send + Sync {
    /// `profile` is one of `driving`, `cycling` or `foot`.
    async fn route(&self, points: &[Coordinate], profile: &str) -> Result<RoadPath, RouterError>;
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    client: reqwest::Client,
    base_url: String,
}

impl OsrmClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RouterError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("route_synth/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn route_url(&self, points: &[Coordinate], profile: &str) -> String {
        format!(
            "{}/route/v1/{}/{}",
            self.base_url,
            profile,
            coordinate_string(points)
        )
    }
}

#[async_trait]
impl RoadRouter for OsrmClient {
    async fn route(&self, points: &[Coordinate], profile: &str) -> Result<RoadPath, RouterError> {
        let url = self.route_url(points, profile);
        tracing::debug!("requesting road path: {url}");

        // OSRM reports errors such as NoRoute with a 4xx status and a JSON body,
        // so the body is decoded regardless of the HTTP status.
        let response: OsrmResponse = self
            .client
            .get(&url)
            .query(&[
                ("overview", "full"),
                ("geometries", "geojson"),
                ("steps", "true"),
            ])
            .send()
            .await?
            .json()
            .await?;

        response.into_road_path()
    }
}

/// `lon,lat` pairs joined with `;`, the path segment OSRM expects.
pub fn coordinate_string(points: &[Coordinate]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.lon, p.lat))
        .collect::<Vec<_>>()
        .join(";")
}

#[derive(Debug, Deserialize)]
pub struct OsrmResponse {
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
pub struct OsrmRoute {
    pub distance: f64,
    pub duration: f64,
    pub geometry: OsrmGeometry,
    #[serde(default)]
    pub legs: Vec<OsrmLeg>,
}

#[derive(Debug, Deserialize)]
pub struct OsrmGeometry {
    /// `[lon, lat]` pairs.
    pub coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
pub struct OsrmLeg {
    #[serde(default)]
    pub steps: Vec<OsrmStep>,
}

#[derive(Debug, Deserialize)]
pub struct OsrmStep {
    pub distance: f64,
    pub duration: f64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub maneuver: Option<OsrmManeuver>,
}

#[derive(Debug, Deserialize)]
pub struct OsrmManeuver {
    #[serde(default)]
    pub instruction: Option<String>,
}

impl OsrmResponse {
    pub fn into_road_path(self) -> Result<RoadPath, RouterError> {
        if self.code != "Ok" {
            return Err(RouterError::Status {
                message: self.message.unwrap_or_default(),
                code: self.code,
            });
        }

        let route = self.routes.into_iter().next().ok_or(RouterError::NoRoute)?;
        let points: Vec<Coordinate> = route
            .geometry
            .coordinates
            .iter()
            .map(|[lon, lat]| Coordinate { lat: *lat, lon: *lon })
            .collect();
        if points.len() < 2 {
            return Err(RouterError::NoRoute);
        }

        let steps = route
            .legs
            .into_iter()
            .flat_map(|leg| leg.steps)
            .map(OsrmStep::into_route_step)
            .collect();

        Ok(RoadPath {
            points,
            distance_m: route.distance,
            duration_s: route.duration,
            steps,
        })
    }
}

impl OsrmStep {
    fn into_route_step(self) -> RouteStep {
        let instruction = self
            .maneuver
            .and_then(|m| m.instruction)
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| {
                let road = self
                    .name
                    .as_deref()
                    .filter(|name| !name.trim().is_empty())
                    .unwrap_or("road");
                format!("Continue on {road}")
            });

        RouteStep {
            instruction,
            distance: self.distance,
            duration: self.duration,
        }
    }
}
