//! Device position sources for the bootstrap fetch.
//!
//! A [`Geolocator`] answers two questions: is a position source available at
//! all, and where are we right now. The position is read once per request;
//! there is no watch/subscription.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::{fmt::Debug, sync::Arc};
use tracing::{debug, info};

use crate::{config::GeolocationConfig, model::Coordinates};

pub const DEFAULT_IP_ENDPOINT: &str = "http://ip-api.com/json";

#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location unavailable: {0}")]
    Unavailable(String),
    #[error("Location lookup failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    /// Whether this platform can report a position at all.
    fn is_supported(&self) -> bool {
        true
    }

    /// Single-shot position request.
    async fn current_position(&self) -> Result<Coordinates, LocationError>;
}

/// Approximate position from the public IP address.
#[derive(Debug, Clone)]
pub struct IpGeolocator {
    endpoint: String,
    http: Client,
}

impl IpGeolocator {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            http: Client::new(),
        }
    }
}

impl Default for IpGeolocator {
    fn default() -> Self {
        Self::new(DEFAULT_IP_ENDPOINT)
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum IpApiResponse {
    Success {
        lat: f64,
        lon: f64,
        #[serde(default)]
        city: Option<String>,
    },
    Fail {
        #[serde(default)]
        message: Option<String>,
    },
}

#[async_trait]
impl Geolocator for IpGeolocator {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        debug!(endpoint = %self.endpoint, "requesting IP geolocation");

        let response = self
            .http
            .get(&self.endpoint)
            .send()
            .await?
            .error_for_status()?;

        match response.json::<IpApiResponse>().await? {
            IpApiResponse::Success { lat, lon, city } => {
                let city = city.as_deref().unwrap_or("?");
                info!(lat, lon, city, "located device");
                Ok(Coordinates::new(lat, lon))
            }
            IpApiResponse::Fail { message } => {
                let message = message.unwrap_or_else(|| "lookup failed".to_string());
                Err(LocationError::Unavailable(message))
            }
        }
    }
}

/// Always reports the same position.
#[derive(Debug, Clone, Copy)]
pub struct FixedGeolocator(pub Coordinates);

#[async_trait]
impl Geolocator for FixedGeolocator {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        Ok(self.0)
    }
}

/// No position source on this platform.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGeolocator;

#[async_trait]
impl Geolocator for DisabledGeolocator {
    fn is_supported(&self) -> bool {
        false
    }

    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        Err(LocationError::Unavailable("geolocation is disabled".to_string()))
    }
}

/// Construct the geolocator selected by `config`.
pub fn geolocator_from_config(config: &GeolocationConfig) -> Arc<dyn Geolocator> {
    match config {
        GeolocationConfig::Ip { endpoint } => {
            let endpoint = endpoint.as_deref().unwrap_or(DEFAULT_IP_ENDPOINT);
            Arc::new(IpGeolocator::new(endpoint))
        }
        GeolocationConfig::Fixed {
            latitude,
            longitude,
        } => Arc::new(FixedGeolocator(Coordinates::new(*latitude, *longitude))),
        GeolocationConfig::Off => Arc::new(DisabledGeolocator),
    }
}
