//! Location resolution: device position when available, a fixed place name otherwise.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;

use crate::{Coordinates, LocationError, LocationQuery};

pub const DEFAULT_FALLBACK_LOCATION: &str = "New York";
pub const IPAPI_URL: &str = "https://ipapi.co/json/";

/// A source of the current device position.
#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    async fn current_position(&self) -> Result<Coordinates, LocationError>;
}

/// Resolve the location for an activation.
///
/// `None` means no geolocation capability exists at all.
pub async fn resolve(geolocator: Option<&dyn Geolocator>, fallback: &str) -> LocationQuery {
    let Some(geolocator) = geolocator else {
        tracing::debug!("No geolocation capability, using {fallback}");
        return LocationQuery::by_name(fallback);
    };

    match geolocator.current_position().await {
        Ok(position) => {
            tracing::debug!(
                latitude = position.latitude,
                longitude = position.longitude,
                "Resolved device position"
            );
            LocationQuery::Coordinates(position)
        }
        Err(e) => {
            tracing::warn!("Location access denied, loading default city ({e})");
            LocationQuery::by_name(fallback)
        }
    }
}

/// Position given up front, e.g. from command-line flags.
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Coordinates);

#[async_trait]
impl Geolocator for FixedPosition {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        Ok(self.0)
    }
}

/// Approximates the device position from its public IP address.
#[derive(Debug, Clone)]
pub struct IpGeolocator {
    url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    latitude: Option<f64>,
    longitude: Option<f64>,
    #[serde(default)]
    error: bool,
    reason: Option<String>,
}

impl IpGeolocator {
    pub fn new() -> Self {
        Self::with_url(IPAPI_URL)
    }

    pub fn with_url(url: &str) -> Self {
        Self { url: url.to_string(), http: Client::new() }
    }
}

impl Default for IpGeolocator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Geolocator for IpGeolocator {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        let res = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| LocationError::Unavailable(e.to_string()))?;

        let status = res.status();
        if status == reqwest::StatusCode::FORBIDDEN || status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LocationError::Denied(format!("IP lookup refused with status {status}")));
        }
        if !status.is_success() {
            return Err(LocationError::Unavailable(format!("IP lookup failed with status {status}")));
        }

        let body: IpApiResponse =
            res.json().await.map_err(|e| LocationError::Unavailable(e.to_string()))?;

        if body.error {
            let reason = body.reason.unwrap_or_else(|| "unknown reason".to_string());
            return Err(LocationError::Denied(reason));
        }

        match (body.latitude, body.longitude) {
            (Some(lat), Some(lon)) => Ok(Coordinates::new(lat, lon)),
            _ => Err(LocationError::Unavailable("IP lookup returned no coordinates".into())),
        }
    }
}
