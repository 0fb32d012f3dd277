//! Scripted collaborators shared by the component tests.

#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    time::Duration,
};

use async_trait::async_trait;
use parking_lot::Mutex;
use skywatch_core::{
    Alerter, Coordinates, CurrentConditions, GeolocationError, Geolocator, WeatherError,
    WeatherProvider,
};

pub const HERE: Coordinates = Coordinates {
    latitude: 51.5085,
    longitude: -0.1257,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Coords(Coordinates),
    City(String),
    Suggest(String),
}

pub fn conditions(name: &str, temperature_c: f64) -> CurrentConditions {
    CurrentConditions {
        name: name.to_string(),
        country: "GB".to_string(),
        temperature_c,
        humidity: 64.0,
        condition_main: "Clouds".to_string(),
        description: "overcast clouds".to_string(),
        icon_code: "04d".to_string(),
        visibility: Some(10000.0),
        wind_speed: Some(3.6),
    }
}

/// Provider answering from in-memory tables and recording every call.
#[derive(Debug, Default)]
pub struct FakeProvider {
    calls: Mutex<Vec<Call>>,
    local_temps: Mutex<VecDeque<Option<f64>>>,
    cities: HashMap<String, f64>,
    city_delay: Duration,
    suggestions: HashMap<String, Vec<String>>,
    suggestion_delays: HashMap<String, Duration>,
    failing_suggestions: bool,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Temperatures returned by successive coordinate lookups; `None` fails.
    /// Once exhausted every lookup returns 20 °C.
    pub fn with_local_temps(self, temps: impl IntoIterator<Item = Option<f64>>) -> Self {
        *self.local_temps.lock() = temps.into_iter().collect();
        self
    }

    pub fn with_city(mut self, name: &str, temperature_c: f64) -> Self {
        self.cities.insert(name.to_string(), temperature_c);
        self
    }

    pub fn with_city_delay(mut self, delay: Duration) -> Self {
        self.city_delay = delay;
        self
    }

    pub fn with_suggestions(mut self, query: &str, names: &[&str]) -> Self {
        self.suggestions
            .insert(query.to_string(), names.iter().map(|n| n.to_string()).collect());
        self
    }

    pub fn with_suggestion_delay(mut self, query: &str, delay: Duration) -> Self {
        self.suggestion_delays.insert(query.to_string(), delay);
        self
    }

    pub fn with_failing_suggestions(mut self) -> Self {
        self.failing_suggestions = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn coords_calls(&self) -> usize {
        self.calls().iter().filter(|c| matches!(c, Call::Coords(_))).count()
    }

    pub fn suggest_calls(&self) -> usize {
        self.calls().iter().filter(|c| matches!(c, Call::Suggest(_))).count()
    }
}

#[async_trait]
impl WeatherProvider for FakeProvider {
    async fn weather_by_coords(
        &self,
        coordinates: Coordinates,
    ) -> Result<CurrentConditions, WeatherError> {
        self.calls.lock().push(Call::Coords(coordinates));

        let next = self.local_temps.lock().pop_front().unwrap_or(Some(20.0));
        match next {
            Some(temp) => Ok(conditions("London", temp)),
            None => Err(WeatherError::Status {
                status: 503,
                body: "scripted failure".to_string(),
            }),
        }
    }

    async fn weather_by_city(&self, city: &str) -> Result<CurrentConditions, WeatherError> {
        self.calls.lock().push(Call::City(city.to_string()));

        if !self.city_delay.is_zero() {
            tokio::time::sleep(self.city_delay).await;
        }

        self.cities
            .get(city)
            .map(|temp| conditions(city, *temp))
            .ok_or_else(|| WeatherError::NotFound("city not found".to_string()))
    }

    async fn suggest_cities(&self, query: &str) -> Result<Vec<String>, WeatherError> {
        self.calls.lock().push(Call::Suggest(query.to_string()));

        if let Some(delay) = self.suggestion_delays.get(query) {
            tokio::time::sleep(*delay).await;
        }

        if self.failing_suggestions {
            return Err(WeatherError::Status {
                status: 500,
                body: "scripted failure".to_string(),
            });
        }

        Ok(self.suggestions.get(query).cloned().unwrap_or_default())
    }
}

/// Position requests are always refused.
#[derive(Debug, Default)]
pub struct DeniedGeolocator;

#[async_trait]
impl Geolocator for DeniedGeolocator {
    async fn locate(&self) -> Result<Coordinates, GeolocationError> {
        Err(GeolocationError::Denied("User denied Geolocation".to_string()))
    }
}

/// Fails the first `failures` requests with a network error, then answers `HERE`.
#[derive(Debug, Default)]
pub struct FlakyGeolocator {
    remaining_failures: Mutex<usize>,
}

impl FlakyGeolocator {
    pub fn failing(failures: usize) -> Self {
        Self {
            remaining_failures: Mutex::new(failures),
        }
    }
}

#[async_trait]
impl Geolocator for FlakyGeolocator {
    async fn locate(&self) -> Result<Coordinates, GeolocationError> {
        let mut remaining = self.remaining_failures.lock();
        if *remaining > 0 {
            *remaining -= 1;
            return Err(GeolocationError::Network("connection refused".to_string()));
        }
        Ok(HERE)
    }
}

#[derive(Debug, Default)]
pub struct RecordingAlerter {
    messages: Mutex<Vec<String>>,
}

impl RecordingAlerter {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }
}

impl Alerter for RecordingAlerter {
    fn alert(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}
