use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::{
    config::{DEFAULT_BASE_URL, DEFAULT_PROVIDER_HOST, DEFAULT_SUGGESTION_LIMIT},
    error::WeatherError,
    model::{Coordinates, CurrentConditions},
};

use super::WeatherProvider;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    provider_host: String,
    suggestion_limit: u8,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            provider_host: DEFAULT_PROVIDER_HOST.to_string(),
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
            http: Client::new(),
        }
    }

    /// Base for the `weather` endpoint, e.g. `https://api.openweathermap.org/data/2.5/`.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        self.base_url = base_url;
        self
    }

    /// Host serving `/data/2.5/find`, e.g. `https://api.openweathermap.org`.
    pub fn with_provider_host(mut self, host: impl Into<String>) -> Self {
        self.provider_host = host.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_suggestion_limit(mut self, limit: u8) -> Self {
        self.suggestion_limit = limit;
        self
    }

    async fn fetch_current(
        &self,
        query: &[(&str, &str)],
    ) -> Result<CurrentConditions, WeatherError> {
        let url = format!("{}weather", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(query)
            .query(&[("units", "metric"), ("APPID", self.api_key.as_str())])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let body = read_success_body(res).await?;
        let parsed: OwCurrentResponse = serde_json::from_str(&body)?;

        Ok(parsed.into())
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn weather_by_coords(
        &self,
        coordinates: Coordinates,
    ) -> Result<CurrentConditions, WeatherError> {
        let lat = coordinates.latitude.to_string();
        let lon = coordinates.longitude.to_string();
        debug!(%lat, %lon, "requesting weather by coordinates");

        self.fetch_current(&[("lat", lat.as_str()), ("lon", lon.as_str())]).await
    }

    async fn weather_by_city(&self, city: &str) -> Result<CurrentConditions, WeatherError> {
        debug!(city, "requesting weather by city name");

        self.fetch_current(&[("q", city)]).await
    }

    async fn suggest_cities(&self, query: &str) -> Result<Vec<String>, WeatherError> {
        let url = format!("{}/data/2.5/find", self.provider_host);
        let limit = self.suggestion_limit.to_string();
        debug!(query, "requesting city suggestions");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", query),
                ("type", "like"),
                ("sort", "population"),
                ("cnt", limit.as_str()),
                ("appid", self.api_key.as_str()),
            ])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let body = read_success_body(res).await?;
        let parsed: OwFindResponse = serde_json::from_str(&body)?;

        Ok(parsed.list.into_iter().map(|entry| entry.name).collect())
    }
}

async fn read_success_body(res: reqwest::Response) -> Result<String, WeatherError> {
    let status = res.status();
    let body = res.text().await?;

    if status == StatusCode::NOT_FOUND {
        let message = serde_json::from_str::<OwErrorResponse>(&body)
            .map(|err| err.message)
            .unwrap_or_else(|_| truncate_body(&body));
        return Err(WeatherError::NotFound(message));
    }

    if !status.is_success() {
        return Err(WeatherError::Status {
            status: status.as_u16(),
            body: truncate_body(&body),
        });
    }

    Ok(body)
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    #[serde(default)]
    name: String,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    sys: Option<OwSys>,
    visibility: Option<f64>,
    wind: Option<OwWind>,
}

impl From<OwCurrentResponse> for CurrentConditions {
    fn from(parsed: OwCurrentResponse) -> Self {
        let (condition_main, description, icon_code) = parsed
            .weather
            .into_iter()
            .next()
            .map(|w| (w.main, w.description, w.icon))
            .unwrap_or_else(|| ("Unknown".to_string(), String::new(), String::new()));

        CurrentConditions {
            name: parsed.name,
            country: parsed.sys.and_then(|sys| sys.country).unwrap_or_default(),
            temperature_c: parsed.main.temp,
            humidity: parsed.main.humidity,
            condition_main,
            description,
            icon_code,
            visibility: parsed.visibility,
            wind_speed: parsed.wind.map(|w| w.speed),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwFindEntry {
    name: String,
}

#[derive(Debug, Deserialize)]
struct OwFindResponse {
    #[serde(default)]
    list: Vec<OwFindEntry>,
}

#[derive(Debug, Deserialize)]
struct OwErrorResponse {
    message: String,
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_response_maps_to_conditions() {
        let json = r#"{
            "coord": {"lon": -0.1257, "lat": 51.5085},
            "weather": [{"id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d"}],
            "main": {"temp": 23.4, "feels_like": 22.9, "humidity": 56},
            "visibility": 10000,
            "wind": {"speed": 4.12, "deg": 240},
            "dt": 1760900000,
            "sys": {"country": "GB"},
            "name": "London"
        }"#;

        let parsed: OwCurrentResponse = serde_json::from_str(json).expect("valid payload");
        let conditions = CurrentConditions::from(parsed);

        assert_eq!(conditions.name, "London");
        assert_eq!(conditions.country, "GB");
        assert_eq!(conditions.temperature_c, 23.4);
        assert_eq!(conditions.humidity, 56.0);
        assert_eq!(conditions.condition_main, "Clouds");
        assert_eq!(conditions.description, "broken clouds");
        assert_eq!(conditions.icon_code, "04d");
        assert_eq!(conditions.visibility, Some(10000.0));
        assert_eq!(conditions.wind_speed, Some(4.12));
    }

    #[test]
    fn missing_weather_entry_is_unknown_condition() {
        let json = r#"{"main": {"temp": 1.0, "humidity": 90}, "weather": []}"#;

        let parsed: OwCurrentResponse = serde_json::from_str(json).expect("valid payload");
        let conditions = CurrentConditions::from(parsed);

        assert_eq!(conditions.condition_main, "Unknown");
        assert_eq!(conditions.country, "");
        assert_eq!(conditions.wind_speed, None);
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let provider = OpenWeatherProvider::new("KEY".into())
            .with_base_url("http://localhost:8080/data/2.5")
            .with_provider_host("http://localhost:8080/");

        assert_eq!(provider.base_url, "http://localhost:8080/data/2.5/");
        assert_eq!(provider.provider_host, "http://localhost:8080");
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(300);
        let truncated = truncate_body(&long);

        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }
}
