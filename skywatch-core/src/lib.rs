//! Core library for the `skywatch` weather client.
//!
//! This crate defines:
//! - Configuration handling
//! - Abstractions over the weather provider and the position source
//! - The location weather component (periodic refresh)
//! - The city search component (suggestions and lookups by name)
//!
//! It is used by `skywatch-cli`, but can also be reused by other front-ends.

pub mod config;
pub mod error;
pub mod geolocation;
pub mod icon;
pub mod location_weather;
pub mod model;
pub mod provider;
pub mod search;

pub use config::{Config, GeolocationConfig};
pub use error::{GeolocationError, WeatherError};
pub use geolocation::{Geolocator, geolocator_from_config};
pub use icon::{IconCategory, icon_for};
pub use location_weather::{Alerter, LocationWeather, LocationWeatherState};
pub use model::{
    Coordinates, CurrentConditions, SearchError, SuggestionList, WeatherDetail, WeatherHeadline,
    WeatherSnapshot,
};
pub use provider::{WeatherProvider, provider_from_config};
pub use search::{CityForecastSearch, SearchDisplay, SearchState, SearchTrigger};
