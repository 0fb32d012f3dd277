use thiserror::Error;

/// Failures of the one-shot position request.
#[derive(Debug, Error)]
pub enum GeolocationError {
    /// Geolocation is switched off and no position is configured.
    #[error("Geolocation not available: {0}")]
    Unavailable(String),

    /// The lookup service could not be reached or sent an unusable reply.
    #[error("Geolocation lookup failed: {0}")]
    Network(String),

    #[error("Geolocation request denied: {0}")]
    Denied(String),

    #[error("Geolocation request timed out")]
    Timeout,
}

/// Failures talking to the weather provider.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error(transparent)]
    Geolocation(#[from] GeolocationError),

    #[error("Weather request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Location not found: {0}")]
    NotFound(String),

    #[error("Weather request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse weather response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl WeatherError {
    pub fn is_geolocation_unavailable(&self) -> bool {
        matches!(self, WeatherError::Geolocation(GeolocationError::Unavailable(_)))
    }
}
