//! The weather widget: a query box, a one-shot location bootstrap and a
//! search action, all writing into one shared view state.
//!
//! Fetches are never cancelled or sequenced against each other. When the
//! bootstrap fetch and a search are in flight together, whichever response
//! resolves last decides what is shown.

use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::{
    Config,
    geolocation::{Geolocator, geolocator_from_config},
    model::Query,
    provider::{WeatherProvider, provider_from_config},
    render::{Rendered, render},
    view::{ViewError, ViewState},
};

#[derive(Debug, Clone)]
pub struct WeatherWidget {
    query: Arc<Mutex<String>>,
    state: Arc<Mutex<ViewState>>,
    /// Set by the first `mount`/`bootstrap`; the bootstrap never runs twice.
    mounted: Arc<AtomicBool>,
    provider: Arc<dyn WeatherProvider>,
    locator: Arc<dyn Geolocator>,
}

impl WeatherWidget {
    pub fn new(
        initial_query: impl Into<String>,
        provider: Arc<dyn WeatherProvider>,
        locator: Arc<dyn Geolocator>,
    ) -> Self {
        Self {
            query: Arc::new(Mutex::new(initial_query.into())),
            state: Arc::new(Mutex::new(ViewState::Empty)),
            mounted: Arc::new(AtomicBool::new(false)),
            provider,
            locator,
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let provider = provider_from_config(config)?;
        let locator = geolocator_from_config(&config.geolocation);
        Ok(Self::new(config.default_city.clone(), provider, locator))
    }

    pub fn query(&self) -> String {
        self.query.lock().clone()
    }

    /// Replace the query text, as one keystroke in the input box would.
    pub fn set_query(&self, text: impl Into<String>) {
        *self.query.lock() = text.into();
    }

    pub fn view(&self) -> ViewState {
        self.state.lock().clone()
    }

    pub fn render(&self) -> Rendered {
        render(&self.state.lock())
    }

    fn replace_state(&self, next: ViewState) {
        *self.state.lock() = next;
    }

    /// Fetch weather for the current query text and replace the view state.
    pub async fn search(&self) {
        let query = Query::Place(self.query());

        match self.provider.current(&query).await {
            Ok(snapshot) => self.replace_state(ViewState::Ready(snapshot)),
            Err(err) => {
                warn!(%query, error = %err, "weather search failed");
                self.replace_state(ViewState::from_fetch_error(&err));
            }
        }
    }

    /// True for the first caller only.
    fn claim_bootstrap(&self) -> bool {
        !self.mounted.swap(true, Ordering::SeqCst)
    }

    /// Start the location bootstrap. Only the first call does anything;
    /// later calls return `None`.
    ///
    /// Without a position source the state becomes `LocationUnavailable`
    /// before this returns and nothing is spawned. Otherwise the bootstrap
    /// runs on the current tokio runtime.
    pub fn mount(&self) -> Option<JoinHandle<()>> {
        if !self.claim_bootstrap() {
            debug!("widget already mounted, skipping bootstrap");
            return None;
        }

        if !self.locator.is_supported() {
            info!("geolocation is not available");
            self.replace_state(ViewState::failed(ViewError::LocationUnavailable));
            return None;
        }

        let widget = self.clone();
        Some(tokio::spawn(async move { widget.locate_and_fetch().await }))
    }

    /// Run the location bootstrap to completion on the caller's task.
    /// Does nothing if the widget was already mounted.
    pub async fn bootstrap(&self) {
        if !self.claim_bootstrap() {
            debug!("widget already mounted, skipping bootstrap");
            return;
        }

        if !self.locator.is_supported() {
            info!("geolocation is not available");
            self.replace_state(ViewState::failed(ViewError::LocationUnavailable));
            return;
        }

        self.locate_and_fetch().await;
    }

    async fn locate_and_fetch(&self) {
        let position = match self.locator.current_position().await {
            Ok(position) => position,
            Err(err) => {
                error!(error = %err, "error getting location");
                self.replace_state(ViewState::failed(ViewError::LocationUnavailable));
                return;
            }
        };

        match self.provider.current(&Query::Coordinates(position)).await {
            Ok(snapshot) => self.replace_state(ViewState::Ready(snapshot)),
            Err(err) => {
                error!(error = %err, "error fetching weather data for current location");
                self.replace_state(ViewState::failed(ViewError::LocationUnavailable));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        geolocation::{DisabledGeolocator, FixedGeolocator, LocationError},
        model::{Coordinates, WeatherSnapshot},
        provider::FetchError,
    };
    use async_trait::async_trait;
    use reqwest::StatusCode;

    /// Answers place queries by name and coordinate queries with "Here".
    #[derive(Debug, Default)]
    struct StubProvider {
        calls: Mutex<Vec<Query>>,
    }

    fn snapshot(name: &str) -> WeatherSnapshot {
        WeatherSnapshot {
            location_name: name.to_string(),
            description: "clear sky".into(),
            icon: "01d".into(),
            temperature_c: 20.0,
            feels_like_c: 20.0,
            temp_min_c: 18.0,
            temp_max_c: 22.0,
            humidity_pct: 50,
            wind_speed_mps: 1.0,
            observed_at: None,
        }
    }

    fn status_error(code: u16) -> FetchError {
        FetchError::Status {
            status: StatusCode::from_u16(code).unwrap(),
            body: String::new(),
        }
    }

    #[async_trait]
    impl WeatherProvider for StubProvider {
        async fn current(&self, query: &Query) -> Result<WeatherSnapshot, FetchError> {
            self.calls.lock().push(query.clone());
            match query {
                Query::Place(name) if name == "zzzznotacity" => Err(status_error(404)),
                Query::Place(name) if name == "boom" => Err(status_error(500)),
                Query::Place(name) => Ok(snapshot(name)),
                Query::Coordinates(c) if c.latitude > 80.0 => Err(status_error(503)),
                Query::Coordinates(_) => Ok(snapshot("Here")),
            }
        }
    }

    #[derive(Debug)]
    struct DeniedGeolocator;

    #[async_trait]
    impl Geolocator for DeniedGeolocator {
        async fn current_position(&self) -> Result<Coordinates, LocationError> {
            Err(LocationError::PermissionDenied)
        }
    }

    fn widget(locator: Arc<dyn Geolocator>) -> (WeatherWidget, Arc<StubProvider>) {
        let provider = Arc::new(StubProvider::default());
        let widget = WeatherWidget::new("kolkata", provider.clone(), locator);
        (widget, provider)
    }

    fn location_name(w: &WeatherWidget) -> Option<String> {
        w.view().snapshot().map(|s| s.location_name.clone())
    }

    #[tokio::test]
    async fn search_uses_current_query_text() {
        let (w, provider) = widget(Arc::new(DisabledGeolocator));
        w.set_query("lon");
        w.set_query("london");
        w.search().await;

        assert_eq!(location_name(&w).as_deref(), Some("london"));
        assert_eq!(*provider.calls.lock(), vec![Query::place("london")]);
    }

    #[tokio::test]
    async fn success_clears_error_and_error_clears_snapshot() {
        let (w, _) = widget(Arc::new(DisabledGeolocator));

        w.set_query("zzzznotacity");
        w.search().await;
        let expected = ViewState::Failed {
            error: ViewError::NotFound,
            status: Some(404),
        };
        assert_eq!(w.view(), expected);

        w.set_query("kolkata");
        w.search().await;
        assert!(w.view().error().is_none());
        assert!(w.view().snapshot().is_some());

        w.set_query("boom");
        w.search().await;
        assert!(w.view().snapshot().is_none());
        assert_eq!(w.view().error(), Some(ViewError::ServerError));
        assert_eq!(w.view().status(), Some(500));
    }

    #[tokio::test]
    async fn mount_without_geolocation_fails_synchronously() {
        let (w, provider) = widget(Arc::new(DisabledGeolocator));

        assert!(w.mount().is_none());
        assert_eq!(w.view().error(), Some(ViewError::LocationUnavailable));
        assert!(provider.calls.lock().is_empty());
    }

    #[tokio::test]
    async fn mount_fetches_by_coordinates() {
        let here = Coordinates::new(22.5, 88.3);
        let (w, provider) = widget(Arc::new(FixedGeolocator(here)));

        let bootstrap = w.mount().expect("bootstrap should be spawned");
        bootstrap.await.unwrap();

        assert_eq!(location_name(&w).as_deref(), Some("Here"));
        assert_eq!(*provider.calls.lock(), vec![Query::Coordinates(here)]);
        assert_eq!(w.query(), "kolkata");
    }

    #[tokio::test]
    async fn bootstrap_runs_only_once() {
        let here = Coordinates::new(22.5, 88.3);
        let (w, provider) = widget(Arc::new(FixedGeolocator(here)));

        let first = w.mount().expect("first mount spawns");
        assert!(w.mount().is_none());
        assert!(w.clone().mount().is_none());
        first.await.unwrap();

        w.bootstrap().await;
        assert_eq!(provider.calls.lock().len(), 1);
        assert_eq!(location_name(&w).as_deref(), Some("Here"));
    }

    #[tokio::test]
    async fn mount_after_bootstrap_is_a_no_op() {
        let (w, provider) = widget(Arc::new(DeniedGeolocator));
        w.bootstrap().await;

        w.set_query("london");
        w.search().await;
        assert!(w.mount().is_none());

        assert_eq!(location_name(&w).as_deref(), Some("london"));
        assert_eq!(provider.calls.lock().len(), 1);
    }

    #[tokio::test]
    async fn denied_permission_is_location_unavailable() {
        let (w, provider) = widget(Arc::new(DeniedGeolocator));
        w.bootstrap().await;

        assert_eq!(w.view().error(), Some(ViewError::LocationUnavailable));
        assert_eq!(w.render(), Rendered::Nothing);
        assert!(provider.calls.lock().is_empty());
    }

    #[tokio::test]
    async fn failed_coordinate_fetch_collapses_to_location_unavailable() {
        let polar = Coordinates::new(89.0, 0.0);
        let (w, _) = widget(Arc::new(FixedGeolocator(polar)));
        w.bootstrap().await;

        let expected = ViewState::failed(ViewError::LocationUnavailable);
        assert_eq!(w.view(), expected);
    }

    #[test]
    fn from_config_requires_api_key() {
        let cfg = Config::default();
        let err = WeatherWidget::from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No API key configured"));

        let cfg = Config {
            api_key: Some("K".into()),
            ..Config::default()
        };
        let w = WeatherWidget::from_config(&cfg).unwrap();
        assert_eq!(w.query(), "kolkata");
        assert_eq!(w.view(), ViewState::Empty);
    }
}
