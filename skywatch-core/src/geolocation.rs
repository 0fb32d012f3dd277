//! One-shot position requests.
//!
//! A [`Geolocator`] answers a single "where am I" question. Implementations
//! never retry; callers decide what an error means for their display.

use std::{fmt::Debug, sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::{Config, error::GeolocationError, model::Coordinates};

#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    async fn locate(&self) -> Result<Coordinates, GeolocationError>;
}

/// Approximate position from the public IP address (ip-api response format).
#[derive(Debug, Clone)]
pub struct IpGeolocator {
    service_url: String,
    timeout: Duration,
    http: Client,
}

impl IpGeolocator {
    pub fn new(service_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            service_url: service_url.into(),
            timeout,
            http: Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
    message: Option<String>,
    city: Option<String>,
}

#[async_trait]
impl Geolocator for IpGeolocator {
    async fn locate(&self) -> Result<Coordinates, GeolocationError> {
        debug!(url = %self.service_url, "requesting IP geolocation");

        let res = self
            .http
            .get(&self.service_url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = res.status();
        if !status.is_success() {
            return Err(GeolocationError::Network(format!("service answered HTTP {status}")));
        }

        let body: IpApiResponse = res
            .json()
            .await
            .map_err(|err| GeolocationError::Network(format!("unreadable reply: {err}")))?;

        if body.status != "success" {
            let reason = body.message.unwrap_or_else(|| body.status.clone());
            return Err(GeolocationError::Denied(reason));
        }

        match (body.lat, body.lon) {
            (Some(lat), Some(lon)) => {
                info!(lat, lon, city = body.city.as_deref(), "geolocation resolved");
                Ok(Coordinates::new(lat, lon))
            }
            _ => Err(GeolocationError::Denied("response carried no coordinates".to_string())),
        }
    }
}

fn classify_transport_error(err: reqwest::Error) -> GeolocationError {
    if err.is_timeout() {
        GeolocationError::Timeout
    } else {
        GeolocationError::Network(err.to_string())
    }
}

/// Always answers with the same position.
#[derive(Debug, Clone, Copy)]
pub struct FixedGeolocator(pub Coordinates);

#[async_trait]
impl Geolocator for FixedGeolocator {
    async fn locate(&self) -> Result<Coordinates, GeolocationError> {
        Ok(self.0)
    }
}

/// Geolocation switched off and no fixed position configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGeolocator;

#[async_trait]
impl Geolocator for DisabledGeolocator {
    async fn locate(&self) -> Result<Coordinates, GeolocationError> {
        Err(GeolocationError::Unavailable(
            "geolocation is disabled and no location is configured".to_string(),
        ))
    }
}

/// A configured fixed location wins over IP lookup.
pub fn geolocator_from_config(config: &Config) -> Arc<dyn Geolocator> {
    if let Some(location) = config.location {
        return Arc::new(FixedGeolocator(location));
    }

    if config.geolocation.enabled {
        Arc::new(IpGeolocator::new(
            config.geolocation.service_url.clone(),
            Duration::from_secs(config.geolocation.timeout_secs),
        ))
    } else {
        Arc::new(DisabledGeolocator)
    }
}
