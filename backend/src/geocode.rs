use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::{error::GeocodeError, models::GeocodeResult};

/// Resolves a free-text address to its best matching coordinate.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// `Ok(None)` when nothing matched.
    async fn geocode(&self, query: &str) -> Result<Option<GeocodeResult>, GeocodeError>;
}

/// Client for the Nominatim `/search` endpoint.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("route_synth/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: String,
}

impl TryFrom<NominatimPlace> for GeocodeResult {
    type Error = GeocodeError;

    fn try_from(place: NominatimPlace) -> Result<Self, Self::Error> {
        let parse = |value: &str| {
            value
                .parse::<f64>()
                .map_err(|_| GeocodeError::InvalidCoordinate(value.to_string()))
        };
        Ok(GeocodeResult {
            lat: parse(&place.lat)?,
            lon: parse(&place.lon)?,
            display_name: place.display_name,
        })
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    #[tracing::instrument(skip(self))]
    async fn geocode(&self, query: &str) -> Result<Option<GeocodeResult>, GeocodeError> {
        let places: Vec<NominatimPlace> = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        places.into_iter().next().map(GeocodeResult::try_from).transpose()
    }
}
