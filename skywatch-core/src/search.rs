//! City search with autocomplete suggestions.
//!
//! All state lives in [`SearchState`] and changes only through its
//! transition methods. Every request takes a fresh [`RequestToken`]; a
//! response is applied only while its token is still the latest one, so a
//! slow answer can never overwrite newer state.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::{
    error::WeatherError,
    geolocation::Geolocator,
    model::{CurrentConditions, SearchError, SuggestionList, WeatherDetail, WeatherHeadline},
    provider::WeatherProvider,
};

/// Sequence number of a request issued by one search component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RequestToken(u64);

/// What the result area shows. Detail and error are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchDisplay {
    #[default]
    Empty,
    Detail(WeatherDetail),
    Error(SearchError),
}

/// How a name lookup was started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchTrigger {
    /// A suggestion was picked; look up exactly this city.
    Suggestion(String),
    /// The search button; always uses the current query text.
    Click,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    query: String,
    suggestions: SuggestionList,
    headline: Option<WeatherHeadline>,
    display: SearchDisplay,
    latest: RequestToken,
}

impl SearchState {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn suggestions(&self) -> &SuggestionList {
        &self.suggestions
    }

    pub fn headline(&self) -> Option<&WeatherHeadline> {
        self.headline.as_ref()
    }

    pub fn display(&self) -> &SearchDisplay {
        &self.display
    }

    pub fn detail(&self) -> Option<&WeatherDetail> {
        match &self.display {
            SearchDisplay::Detail(detail) => Some(detail),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&SearchError> {
        match &self.display {
            SearchDisplay::Error(error) => Some(error),
            _ => None,
        }
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token == self.latest
    }

    fn next_token(&mut self) -> RequestToken {
        self.latest = RequestToken(self.latest.0 + 1);
        self.latest
    }

    /// Input change. Blanks the detail panel (an error stays visible) and
    /// narrows the existing suggestions to the new prefix.
    pub fn set_query(&mut self, query: impl Into<String>) -> RequestToken {
        self.query = query.into();

        if matches!(self.display, SearchDisplay::Detail(_)) {
            self.display = SearchDisplay::Empty;
        }

        if self.query.is_empty() {
            self.suggestions.clear();
        } else {
            self.suggestions.retain_prefix(&self.query);
        }

        self.next_token()
    }

    /// A suggestion was picked: it becomes the query and the list closes.
    pub fn choose_suggestion(&mut self, city: impl Into<String>) -> RequestToken {
        let token = self.set_query(city);
        self.suggestions.clear();
        token
    }

    /// New request without touching the query.
    pub fn begin_request(&mut self) -> RequestToken {
        self.next_token()
    }

    pub fn set_suggestions(&mut self, token: RequestToken, suggestions: SuggestionList) -> bool {
        if !self.is_current(token) {
            return false;
        }
        self.suggestions = suggestions;
        true
    }

    pub fn set_headline(&mut self, token: RequestToken, headline: WeatherHeadline) -> bool {
        if !self.is_current(token) {
            return false;
        }
        self.headline = Some(headline);
        true
    }

    /// Successful name lookup: show the detail and reset the search box.
    pub fn set_detail(&mut self, token: RequestToken, detail: WeatherDetail) -> bool {
        if !self.is_current(token) {
            return false;
        }
        self.headline = Some(detail.headline());
        self.display = SearchDisplay::Detail(detail);
        self.query.clear();
        self.suggestions.clear();
        true
    }

    /// Failed name lookup: show the error and reset the search box.
    pub fn set_error(&mut self, token: RequestToken, error: SearchError) -> bool {
        if !self.is_current(token) {
            return false;
        }
        self.display = SearchDisplay::Error(error);
        self.query.clear();
        self.suggestions.clear();
        true
    }
}

/// Search box, suggestion list and result panel for one view.
pub struct CityForecastSearch {
    provider: Arc<dyn WeatherProvider>,
    geolocator: Arc<dyn Geolocator>,
    state: Mutex<SearchState>,
}

impl CityForecastSearch {
    pub fn new(provider: Arc<dyn WeatherProvider>, geolocator: Arc<dyn Geolocator>) -> Self {
        Self {
            provider,
            geolocator,
            state: Mutex::new(SearchState::default()),
        }
    }

    /// Create the component and load the headline for the current location.
    pub async fn mount(
        provider: Arc<dyn WeatherProvider>,
        geolocator: Arc<dyn Geolocator>,
    ) -> Self {
        let search = Self::new(provider, geolocator);
        let token = search.state.lock().begin_request();
        search.load_headline(token).await;
        search
    }

    pub fn state(&self) -> SearchState {
        self.state.lock().clone()
    }

    /// Update the query and run the matching lookup: local weather when the
    /// query is empty, suggestions otherwise.
    pub async fn set_query(&self, query: impl Into<String>) {
        let query = query.into();
        let token = self.state.lock().set_query(query.clone());

        if query.is_empty() {
            self.load_headline(token).await;
        } else {
            self.load_suggestions(token, &query).await;
        }
    }

    pub async fn select_suggestion(&self, city: &str) {
        self.search(SearchTrigger::Suggestion(city.to_string())).await;
    }

    pub async fn search(&self, trigger: SearchTrigger) {
        let (token, city) = {
            let mut state = self.state.lock();
            match trigger {
                SearchTrigger::Suggestion(city) => (state.choose_suggestion(city.clone()), city),
                SearchTrigger::Click => (state.begin_request(), state.query().to_string()),
            }
        };

        let query_cleared = match self.provider.weather_by_city(&city).await {
            Ok(conditions) => {
                let mut state = self.state.lock();
                let had_query = !state.query().is_empty();
                if state.set_detail(token, WeatherDetail::from(&conditions)) {
                    info!(city = %conditions.name, "city weather loaded");
                    had_query
                } else {
                    debug!(city = %city, "discarding stale city weather");
                    false
                }
            }
            Err(err) => {
                warn!(city = %city, error = %err, "city weather lookup failed");
                let mut state = self.state.lock();
                let had_query = !state.query().is_empty();
                if state.set_error(token, SearchError::not_found(&city)) {
                    had_query
                } else {
                    debug!(city = %city, "discarding stale lookup failure");
                    false
                }
            }
        };

        // The box is empty again, so the local headline comes back.
        if query_cleared {
            let token = self.state.lock().begin_request();
            self.load_headline(token).await;
        }
    }

    async fn local_conditions(&self) -> Result<CurrentConditions, WeatherError> {
        let coordinates = self.geolocator.locate().await?;
        self.provider.weather_by_coords(coordinates).await
    }

    async fn load_headline(&self, token: RequestToken) {
        match self.local_conditions().await {
            Ok(conditions) => {
                if !self.state.lock().set_headline(token, WeatherHeadline::from(&conditions)) {
                    debug!("discarding stale local headline");
                }
            }
            Err(err) => warn!(error = %err, "failed to load local weather headline"),
        }
    }

    async fn load_suggestions(&self, token: RequestToken, query: &str) {
        match self.provider.suggest_cities(query).await {
            Ok(names) => {
                let suggestions = SuggestionList::from_names(names, query);
                debug!(query, count = suggestions.len(), "suggestions received");
                if !self.state.lock().set_suggestions(token, suggestions) {
                    debug!(query, "discarding stale suggestions");
                }
            }
            Err(err) => warn!(query, error = %err, "failed to fetch suggestions"),
        }
    }
}
