use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::icon::{IconCategory, icon_for};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Provider payload for a single current-weather lookup, before any rounding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub name: String,
    pub country: String,
    pub temperature_c: f64,
    pub humidity: f64,
    pub condition_main: String,
    pub description: String,
    pub icon_code: String,
    pub visibility: Option<f64>,
    pub wind_speed: Option<f64>,
}

/// Complete weather state for one location, as shown by the location panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub city: String,
    pub country: String,
    pub temperature_c: i64,
    pub temperature_f: i64,
    pub humidity: i64,
    pub condition_main: String,
    pub icon: IconCategory,
    pub coordinates: Coordinates,
    pub fetched_at: DateTime<Utc>,
}

impl WeatherSnapshot {
    /// `coordinates` are the ones that were asked for, not the station's.
    pub fn from_conditions(conditions: &CurrentConditions, coordinates: Coordinates) -> Self {
        Self {
            city: conditions.name.clone(),
            country: conditions.country.clone(),
            temperature_c: round_half_up(conditions.temperature_c),
            temperature_f: celsius_to_fahrenheit(conditions.temperature_c),
            humidity: round_half_up(conditions.humidity),
            condition_main: conditions.condition_main.clone(),
            icon: icon_for(&conditions.condition_main),
            coordinates,
            fetched_at: Utc::now(),
        }
    }
}

/// Condition headline (icon plus description) shown above the search box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherHeadline {
    pub main: String,
    pub description: String,
}

impl WeatherHeadline {
    pub fn icon(&self) -> IconCategory {
        icon_for(&self.main)
    }
}

impl From<&CurrentConditions> for WeatherHeadline {
    fn from(conditions: &CurrentConditions) -> Self {
        Self {
            main: conditions.condition_main.clone(),
            description: conditions.description.clone(),
        }
    }
}

/// Detail panel for a city looked up by name. Numbers are rounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherDetail {
    pub name: String,
    pub country: String,
    pub icon_code: String,
    pub condition_main: String,
    pub description: String,
    pub temperature: i64,
    pub humidity: i64,
    pub visibility: i64,
    pub wind_speed: i64,
}

impl WeatherDetail {
    pub fn icon_url(&self) -> String {
        format!("https://openweathermap.org/img/wn/{}.png", self.icon_code)
    }

    pub fn headline(&self) -> WeatherHeadline {
        WeatherHeadline {
            main: self.condition_main.clone(),
            description: self.description.clone(),
        }
    }
}

impl From<&CurrentConditions> for WeatherDetail {
    fn from(conditions: &CurrentConditions) -> Self {
        Self {
            name: conditions.name.clone(),
            country: conditions.country.clone(),
            icon_code: conditions.icon_code.clone(),
            condition_main: conditions.condition_main.clone(),
            description: conditions.description.clone(),
            temperature: round_half_up(conditions.temperature_c),
            humidity: round_half_up(conditions.humidity),
            visibility: round_half_up(conditions.visibility.unwrap_or_default()),
            wind_speed: round_half_up(conditions.wind_speed.unwrap_or_default()),
        }
    }
}

/// Candidate city names for a partial query.
///
/// Names are unique (first occurrence wins) and keep the provider's order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionList(Vec<String>);

impl SuggestionList {
    pub fn from_names<I>(names: I, query: &str) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut seen = HashSet::new();
        let names = names
            .into_iter()
            .filter(|name| matches_prefix(name, query))
            .filter(|name| seen.insert(name.clone()))
            .collect();

        Self(names)
    }

    pub fn retain_prefix(&mut self, query: &str) {
        self.0.retain(|name| matches_prefix(name, query));
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn matches_prefix(name: &str, query: &str) -> bool {
    name.to_lowercase().starts_with(&query.to_lowercase())
}

/// A failed lookup by city name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchError {
    pub message: String,
    pub query: String,
}

impl SearchError {
    pub fn not_found(query: impl Into<String>) -> Self {
        Self {
            message: "Not Found".to_string(),
            query: query.into(),
        }
    }
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.query, self.message)
    }
}

/// Round half up (`2.5 -> 3`, `-2.5 -> -2`).
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

pub fn celsius_to_fahrenheit(celsius: f64) -> i64 {
    round_half_up(celsius * 1.8 + 32.0)
}
