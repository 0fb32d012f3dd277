use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;

use crate::{
    Config,
    error::WeatherError,
    model::{Coordinates, CurrentConditions},
    provider::openweather::OpenWeatherProvider,
};

pub mod openweather;

/// Source of current weather and city-name suggestions.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn weather_by_coords(
        &self,
        coordinates: Coordinates,
    ) -> Result<CurrentConditions, WeatherError>;

    /// Exact-match lookup by city name.
    async fn weather_by_city(&self, city: &str) -> Result<CurrentConditions, WeatherError>;

    /// City names similar to `query`, most populous first.
    async fn suggest_cities(&self, query: &str) -> Result<Vec<String>, WeatherError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let api_key = config.api_key()?;

    let provider = OpenWeatherProvider::new(api_key.to_owned())
        .with_base_url(config.base_url())
        .with_provider_host(&config.provider_host)
        .with_suggestion_limit(config.suggestion_limit);

    Ok(Arc::new(provider))
}
