use crate::{Config, Query, WeatherSnapshot, provider::openweather::OpenWeatherProvider};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

/// Failure of a single weather fetch.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("weather request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to reach weather service: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to parse weather response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    /// Raw HTTP status, when the upstream answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(status.as_u16()),
            FetchError::Transport(err) => err.status().map(|s| s.as_u16()),
            FetchError::Decode(_) => None,
        }
    }
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, query: &Query) -> Result<WeatherSnapshot, FetchError>;
}

/// Construct the weather provider described by `config`.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let api_key = config.require_api_key()?;

    Ok(Arc::new(OpenWeatherProvider::new(
        config.base_url.clone(),
        api_key.to_owned(),
    )))
}
