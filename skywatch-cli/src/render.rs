//! Plain-text panels for the terminal.

use chrono::NaiveDate;
use skywatch_core::{
    IconCategory, SearchDisplay, SuggestionList, WeatherDetail, WeatherHeadline, WeatherSnapshot,
};

pub const LOADING: &str = "Detecting your location\n\
    Your current location will be displayed here\n\
    & used for calculating real time weather.";

pub fn icon_glyph(icon: IconCategory) -> &'static str {
    match icon {
        IconCategory::ClearDay => "☀",
        IconCategory::Cloudy => "☁",
        IconCategory::Rain => "🌧",
        IconCategory::Snow => "❄",
        IconCategory::Wind => "🌬",
        IconCategory::Sleet => "🌨",
        IconCategory::Fog => "🌫",
    }
}

/// e.g. `Sunday, 19 October 2026`.
pub fn date_line(date: NaiveDate) -> String {
    date.format("%A, %-d %B %Y").to_string()
}

pub fn snapshot_panel(snapshot: &WeatherSnapshot, today: NaiveDate) -> String {
    format!(
        "{city}\n{country}\n({coordinates})\n\n{glyph}  {main}\n{date}\n{c}°C ({f}°F)  Humidity {humidity}%",
        city = snapshot.city,
        country = snapshot.country,
        coordinates = snapshot.coordinates,
        glyph = icon_glyph(snapshot.icon),
        main = snapshot.condition_main,
        date = date_line(today),
        c = snapshot.temperature_c,
        f = snapshot.temperature_f,
        humidity = snapshot.humidity,
    )
}

pub fn headline(headline: &WeatherHeadline) -> String {
    format!("{}  {}", icon_glyph(headline.icon()), headline.description)
}

pub fn detail_panel(detail: &WeatherDetail) -> String {
    format!(
        "{name}, {country}\n\
         Temperature  {temp}°c ({main})\n\
         Humidity     {humidity}%\n\
         Visibility   {visibility} m\n\
         Wind Speed   {wind} m/s\n\
         Icon         {icon_url}",
        name = detail.name,
        country = detail.country,
        temp = detail.temperature,
        main = detail.condition_main,
        humidity = detail.humidity,
        visibility = detail.visibility,
        wind = detail.wind_speed,
        icon_url = detail.icon_url(),
    )
}

pub fn suggestions(list: &SuggestionList) -> String {
    if list.is_empty() {
        return "No matching cities".to_string();
    }

    list.iter().map(|name| format!("  {name}")).collect::<Vec<_>>().join("\n")
}

/// Result area of the search view; empty when there is nothing to show.
pub fn search_display(display: &SearchDisplay) -> String {
    match display {
        SearchDisplay::Empty => String::new(),
        SearchDisplay::Detail(detail) => detail_panel(detail),
        SearchDisplay::Error(error) => error.to_string(),
    }
}
