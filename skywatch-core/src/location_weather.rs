//! Weather for the user's current position, refreshed on a fixed timer.
//!
//! The component starts in [`LocationWeatherState::Loading`] and moves to
//! [`LocationWeatherState::Loaded`] on the first successful fetch. Later
//! refreshes replace the snapshot in place; failures keep the old one.

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::{error, info, warn};

use crate::{
    error::WeatherError,
    geolocation::Geolocator,
    model::WeatherSnapshot,
    provider::WeatherProvider,
};

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(600);

pub const GEOLOCATION_UNAVAILABLE_ALERT: &str = "Geolocation not available";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum LocationWeatherState {
    #[default]
    Loading,
    Loaded(WeatherSnapshot),
}

impl LocationWeatherState {
    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        match self {
            LocationWeatherState::Loading => None,
            LocationWeatherState::Loaded(snapshot) => Some(snapshot),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LocationWeatherState::Loading)
    }

    /// The only transition: any state becomes `Loaded` with the new snapshot.
    pub fn set_snapshot(&mut self, snapshot: WeatherSnapshot) {
        *self = LocationWeatherState::Loaded(snapshot);
    }
}

/// Blocking user notification for conditions the component cannot recover from.
pub trait Alerter: Send + Sync {
    fn alert(&self, message: &str);
}

struct Refresher {
    provider: Arc<dyn WeatherProvider>,
    geolocator: Arc<dyn Geolocator>,
    state: watch::Sender<LocationWeatherState>,
}

impl Refresher {
    async fn refresh(&self) -> Result<(), WeatherError> {
        let coordinates = self.geolocator.locate().await?;
        let conditions = self.provider.weather_by_coords(coordinates).await?;
        let snapshot = WeatherSnapshot::from_conditions(&conditions, coordinates);

        info!(
            city = %snapshot.city,
            temperature_c = snapshot.temperature_c,
            icon = %snapshot.icon,
            "location weather updated"
        );
        self.state.send_modify(|state| state.set_snapshot(snapshot));

        Ok(())
    }

    fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }
}

pub struct LocationWeather {
    refresher: Arc<Refresher>,
    state: watch::Receiver<LocationWeatherState>,
    task: Option<JoinHandle<()>>,
}

impl LocationWeather {
    /// Build the component without starting its timer.
    pub fn new(provider: Arc<dyn WeatherProvider>, geolocator: Arc<dyn Geolocator>) -> Self {
        let (tx, rx) = watch::channel(LocationWeatherState::Loading);
        let refresher = Arc::new(Refresher {
            provider,
            geolocator,
            state: tx,
        });

        Self {
            refresher,
            state: rx,
            task: None,
        }
    }

    /// Build and start the component: fetch immediately, then every
    /// `refresh_every`.
    ///
    /// Must be called from within a tokio runtime. The refresh task stops when
    /// the component is dropped.
    pub fn mount(
        provider: Arc<dyn WeatherProvider>,
        geolocator: Arc<dyn Geolocator>,
        alerter: Arc<dyn Alerter>,
        refresh_every: Duration,
    ) -> Self {
        let mut component = Self::new(provider, geolocator);
        component.start(alerter, refresh_every);
        component
    }

    /// Spawn the refresh task. Does nothing if it is already running.
    pub fn start(&mut self, alerter: Arc<dyn Alerter>, refresh_every: Duration) {
        if self.task.is_some() {
            return;
        }

        let refresher = Arc::clone(&self.refresher);
        self.task = Some(tokio::spawn(refresh_loop(refresher, alerter, refresh_every)));
    }

    pub fn state(&self) -> LocationWeatherState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LocationWeatherState> {
        self.state.clone()
    }

    /// Run one fetch cycle now and report its outcome.
    pub async fn refresh_now(&self) -> Result<(), WeatherError> {
        self.refresher.refresh().await
    }

    /// Tear the component down, cancelling the refresh timer.
    pub fn unmount(self) {
        drop(self);
    }
}

impl Drop for LocationWeather {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn refresh_loop(refresher: Arc<Refresher>, alerter: Arc<dyn Alerter>, period: Duration) {
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        // First tick completes immediately.
        ticker.tick().await;

        match refresher.refresh().await {
            Ok(()) => {}
            Err(err) if err.is_geolocation_unavailable() && refresher.is_loading() => {
                error!(error = %err, "geolocation unavailable, location weather stopped");
                alerter.alert(GEOLOCATION_UNAVAILABLE_ALERT);
                return;
            }
            Err(err) => {
                warn!(error = %err, "location weather refresh failed, keeping previous data");
            }
        }
    }
}
