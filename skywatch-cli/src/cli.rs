use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{ArgAction, Parser, Subcommand};
use inquire::{
    Confirm, CustomType, CustomUserError, Password, PasswordDisplayMode, Select, Text,
    validator::Validation,
};
use skywatch_core::{
    Alerter, CityForecastSearch, Config, Coordinates, LocationWeather, LocationWeatherState,
    SearchTrigger, geolocator_from_config, location_weather::GEOLOCATION_UNAVAILABLE_ALERT,
    provider_from_config,
};
use tokio::sync::Notify;

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skywatch", version, about = "Weather for your location and any city")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and an optional fixed location.
    Configure,

    /// Show weather for the current location.
    Current {
        /// Keep running and refresh on the configured interval.
        #[arg(long)]
        watch: bool,

        /// Latitude to use instead of geolocation.
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Longitude to use instead of geolocation.
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,
    },

    /// Show the weather detail for a city.
    Show {
        /// City name, e.g. "Paris" or "Paris,FR".
        city: String,
    },

    /// List city names matching a partial query.
    Suggest {
        query: String,
    },

    /// Interactive city search with suggestions.
    Search {
        /// First query to run before prompting.
        query: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Current { watch, lat, lon } => {
                let mut config = Config::load()?;
                if let (Some(lat), Some(lon)) = (lat, lon) {
                    config.set_location(Some(Coordinates::new(lat, lon)));
                }
                current(&config, watch).await
            }
            Command::Show { city } => show(&Config::load()?, city).await,
            Command::Suggest { query } => suggest(&Config::load()?, query).await,
            Command::Search { query } => search(&Config::load()?, query).await,
        }
    }
}

/// Prints alerts to stderr and wakes whoever waits on `raised`.
#[derive(Debug, Default)]
struct TerminalAlerter {
    raised: Notify,
}

impl Alerter for TerminalAlerter {
    fn alert(&self, message: &str) {
        eprintln!("\n!! {message}\n");
        self.raised.notify_one();
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(api_key.trim().to_string());

    let fixed = Confirm::new("Use a fixed location instead of IP geolocation?")
        .with_default(config.location.is_some())
        .prompt()?;

    if fixed {
        let latitude = CustomType::<f64>::new("Latitude:")
            .with_validator(within(-90.0, 90.0))
            .prompt()?;
        let longitude = CustomType::<f64>::new("Longitude:")
            .with_validator(within(-180.0, 180.0))
            .prompt()?;
        config.set_location(Some(Coordinates::new(latitude, longitude)));
    } else {
        config.set_location(None);
    }

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

fn within(
    min: f64,
    max: f64,
) -> impl Fn(&f64) -> Result<Validation, CustomUserError> + Clone + 'static {
    move |value: &f64| {
        Ok(if (min..=max).contains(value) {
            Validation::Valid
        } else {
            Validation::Invalid(format!("Must be between {min} and {max}").into())
        })
    }
}

async fn current(config: &Config, watch: bool) -> Result<()> {
    let provider = provider_from_config(config)?;
    let geolocator = geolocator_from_config(config);

    println!("{}\n", render::LOADING);

    if !watch {
        let component = LocationWeather::new(provider, geolocator);
        if let Err(err) = component.refresh_now().await {
            if err.is_geolocation_unavailable() {
                TerminalAlerter::default().alert(GEOLOCATION_UNAVAILABLE_ALERT);
            }
            return Err(err).context("Failed to load weather for your location");
        }
        print_location(&component.state());
        return Ok(());
    }

    let alerter = Arc::new(TerminalAlerter::default());
    let component = LocationWeather::mount(
        provider,
        geolocator,
        alerter.clone(),
        config.refresh_interval(),
    );
    let mut updates = component.subscribe();

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                print_location(&state);
            }
            _ = alerter.raised.notified() => break,
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    component.unmount();
    Ok(())
}

fn print_location(state: &LocationWeatherState) {
    match state.snapshot() {
        Some(snapshot) => {
            println!("{}\n", render::snapshot_panel(snapshot, Local::now().date_naive()))
        }
        None => println!("{}", render::LOADING),
    }
}

async fn show(config: &Config, city: String) -> Result<()> {
    let provider = provider_from_config(config)?;
    let search = CityForecastSearch::new(provider, geolocator_from_config(config));

    search.search(SearchTrigger::Suggestion(city)).await;

    let state = search.state();
    if let Some(headline) = state.headline() {
        println!("{}", render::headline(headline));
    }
    println!("{}", render::search_display(state.display()));

    Ok(())
}

async fn suggest(config: &Config, query: String) -> Result<()> {
    let provider = provider_from_config(config)?;
    let search = CityForecastSearch::new(provider, geolocator_from_config(config));

    search.set_query(query).await;
    println!("{}", render::suggestions(search.state().suggestions()));

    Ok(())
}

async fn search(config: &Config, initial: Option<String>) -> Result<()> {
    let provider = provider_from_config(config)?;
    let search = CityForecastSearch::mount(provider, geolocator_from_config(config)).await;

    print_headline(&search);

    if let Some(query) = initial {
        run_query(&search, query.trim().to_string()).await?;
    }

    loop {
        let Some(query) = Text::new("Search any city:")
            .with_help_message("empty input shows your location, Esc quits")
            .prompt_skippable()?
        else {
            break;
        };
        run_query(&search, query.trim().to_string()).await?;
    }

    Ok(())
}

/// Type `query`, then let the user pick a suggestion or search it as typed.
async fn run_query(search: &CityForecastSearch, query: String) -> Result<()> {
    search.set_query(query.clone()).await;
    if query.is_empty() {
        print_headline(search);
        return Ok(());
    }

    let exact = format!("Search \"{query}\"");
    let mut options: Vec<String> = search.state().suggestions().iter().map(String::from).collect();
    options.push(exact.clone());

    match Select::new("Pick a city:", options).prompt_skippable()? {
        None => return Ok(()),
        Some(choice) if choice == exact => search.search(SearchTrigger::Click).await,
        Some(choice) => search.select_suggestion(&choice).await,
    }

    print_headline(search);
    println!("{}\n", render::search_display(search.state().display()));

    Ok(())
}

fn print_headline(search: &CityForecastSearch) {
    match search.state().headline() {
        Some(headline) => println!("{}\n", render::headline(headline)),
        None => println!("Local weather unavailable\n"),
    }
}
