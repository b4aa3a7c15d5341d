use async_trait::async_trait;
use chrono::DateTime;
use reqwest::{Client, Request, RequestBuilder};
use serde::Deserialize;
use tracing::{debug, info};

use crate::model::{Query, WeatherSnapshot};

use super::{FetchError, WeatherProvider};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Client for the OpenWeather "current weather" endpoint.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    base_url: String,
    api_key: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            base_url,
            api_key,
            http: Client::new(),
        }
    }

    /// Query parameters for `query`, always metric and keyed.
    pub fn query_params(&self, query: &Query) -> Vec<(&'static str, String)> {
        let mut params = match query {
            Query::Place(name) => vec![("q", name.clone())],
            Query::Coordinates(c) => vec![
                ("lat", c.latitude.to_string()),
                ("lon", c.longitude.to_string()),
            ],
        };
        params.push(("units", "metric".to_string()));
        params.push(("appid", self.api_key.clone()));
        params
    }

    fn request(&self, query: &Query) -> RequestBuilder {
        self.http
            .get(&self.base_url)
            .query(&self.query_params(query))
    }

    /// The GET request that would be sent for `query`.
    pub fn build_request(&self, query: &Query) -> Result<Request, FetchError> {
        Ok(self.request(query).build()?)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: Option<i64>,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

impl From<OwCurrentResponse> for WeatherSnapshot {
    fn from(parsed: OwCurrentResponse) -> Self {
        let (description, icon) = parsed
            .weather
            .into_iter()
            .next()
            .map(|w| (w.description, w.icon))
            .unwrap_or_else(|| ("Unknown".to_string(), String::new()));

        WeatherSnapshot {
            location_name: parsed.name,
            description,
            icon,
            temperature_c: parsed.main.temp,
            feels_like_c: parsed.main.feels_like,
            temp_min_c: parsed.main.temp_min,
            temp_max_c: parsed.main.temp_max,
            humidity_pct: parsed.main.humidity,
            wind_speed_mps: parsed.wind.speed,
            observed_at: parsed.dt.and_then(|ts| DateTime::from_timestamp(ts, 0)),
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, query: &Query) -> Result<WeatherSnapshot, FetchError> {
        debug!(%query, "requesting current weather");

        let res = self.request(query).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            debug!(%status, "weather request rejected");
            return Err(FetchError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        let parsed: OwCurrentResponse = serde_json::from_str(&body)?;
        let snapshot = WeatherSnapshot::from(parsed);

        info!(location = %snapshot.location_name, "fetched current weather");
        Ok(snapshot)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
